//! Simulation observer trait for rendering and data collection.

use mt_core::{ActorId, Cell, PassengerId};
use mt_rendezvous::{Inspection, Sale};

use crate::JourneyReport;

/// Callbacks fired by the actor threads after each state-changing step.
///
/// Every method has a default no-op implementation so implementors only
/// override what they care about.  Hooks are called from many threads at
/// once, outside every monitor lock; they must not block for long and have no
/// effect on synchronization.
///
/// # Example: arrival counter
///
/// ```rust,ignore
/// struct Arrivals(AtomicUsize);
///
/// impl MetroObserver for Arrivals {
///     fn on_arrival(&self, _report: &JourneyReport) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
/// ```
pub trait MetroObserver: Send + Sync {
    /// An actor appeared on the board at `at`.
    fn on_draw(&self, _actor: ActorId, _at: Cell) {}

    /// An actor left the board (passenger boarding, passenger done).
    fn on_erase(&self, _actor: ActorId, _at: Cell) {}

    /// An actor moved one cell.
    fn on_move(&self, _actor: ActorId, _from: Cell, _to: Cell) {}

    fn on_ticket_sold(&self, _sale: &Sale) {}

    fn on_inspection(&self, _inspection: &Inspection) {}

    /// A passenger finished its journey.
    fn on_arrival(&self, _report: &JourneyReport) {}

    /// A passenger's navigator could not get any closer to `target`.
    fn on_passenger_stuck(&self, _passenger: PassengerId, _at: Cell, _target: Cell) {}
}

/// A [`MetroObserver`] that does nothing.
pub struct NoopObserver;

impl MetroObserver for NoopObserver {}
