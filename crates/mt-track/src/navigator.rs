//! Walking heuristics that bring a passenger to a station or destination.
//!
//! # Pluggability
//!
//! The passenger lifecycle calls movement via the [`Navigator`] trait so
//! applications can swap in obstacle-aware walkers without touching the
//! rendezvous logic.  The default [`GreedyNavigator`] ignores the map and
//! always converges on an unobstructed grid.

use mt_core::{Cell, Direction};

/// Pluggable one-step movement heuristic.
///
/// # Thread safety
///
/// One navigator is shared by every passenger thread, so implementations
/// must be `Send + Sync`.
pub trait Navigator: Send + Sync {
    /// The next cell on the way from `current` to `target`.
    ///
    /// Returns `None` when no step gets closer, which includes
    /// `current == target`.  Callers check for arrival first; `None` away from
    /// the target means the walker is stuck.
    fn step_toward(&self, current: Cell, target: Cell) -> Option<Cell>;
}

/// Greedy Euclidean walker.
///
/// Probes the four neighbours in the order down, right, up, left and takes the
/// one strictly closest to the target.
#[derive(Copy, Clone, Debug, Default)]
pub struct GreedyNavigator;

const PROBE_ORDER: [Direction; 4] = [Direction::Down, Direction::Right, Direction::Up, Direction::Left];

impl Navigator for GreedyNavigator {
    fn step_toward(&self, current: Cell, target: Cell) -> Option<Cell> {
        let mut best = current.distance(target);
        let mut next = None;
        for dir in PROBE_ORDER {
            let candidate = current.step(dir);
            let d = candidate.distance(target);
            if d < best {
                best = d;
                next = Some(candidate);
            }
        }
        next
    }
}
