//! The train monitor: alighting and ticket inspection.
//!
//! # Stop announcements
//!
//! At every station the conductor announces a stop (`let_passengers_off`).
//! Each announcement snapshots the onboard count as the number of riders to
//! wake and bumps an epoch.  Every rider acknowledges each epoch exactly once
//! through [`Ride::wait_for_stop`](crate::Ride::wait_for_stop); a rider whose
//! destination this is leaves in the same step.  The last acknowledgement
//! releases the conductor.  Announcements are skipped on an empty train.
//!
//! # Inspection
//!
//! The inspector opens the window (`inspect_next_ticket`), one rider presents
//! (`show_ticket`), and the ticket is consumed whatever the verdict.  A ticket
//! is valid iff its stamp equals this train's track symbol; otherwise the
//! configured fine is added to the rider's balance.

use std::sync::{Arc, Condvar, Mutex};

use tracing::{debug, info, warn};

use mt_core::{PassengerId, StationId, Ticket, TrackSymbol, TrainId};
use mt_track::Route;

use crate::monitor::{lock, wait_until};
use crate::{MonitorError, MonitorResult, Ride, Rider, Station, Stop, Wallet};

/// Outcome of checking one ticket.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    /// Invalid or missing ticket; carries the amount applied.
    Fined(i64),
}

/// One completed inspection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Inspection {
    pub train:     TrainId,
    pub passenger: PassengerId,
    pub ticket:    Ticket,
    pub verdict:   Verdict,
    /// Rider's balance after the verdict.
    pub balance:   i64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TrainStats {
    pub riders_onboard:  usize,
    pub stops_announced: u64,
    pub tickets_checked: u64,
    pub fines_issued:    u64,
}

/// A ticket handed over by a rider, awaiting the inspector.
struct Presentation {
    passenger: PassengerId,
    ticket:    Ticket,
    wallet:    Arc<Wallet>,
}

#[derive(Default)]
struct TrainState {
    riders_onboard:      usize,
    riders_to_wake:      usize,
    riders_woken:        usize,
    /// The station being announced; `Some` exactly while a stop is open.
    stop:                Option<Arc<Station>>,
    stop_epoch:          u64,
    last_waker_signaled: bool,

    can_show_ticket: bool,
    /// `Some` once a rider has presented and until the inspector rules.
    under_review:    Option<Presentation>,

    closed: bool,
    stats:  TrainStats,
}

pub struct Train {
    id:          TrainId,
    track:       TrackSymbol,
    route:       Arc<Route>,
    fine_amount: i64,

    state:            Mutex<TrainState>,
    /// Riders wait here for the inspector to open the window.
    show_ready:       Condvar,
    /// The inspector waits here for a rider to present.
    ticket_presented: Condvar,
    /// Riders wait here for the next stop.
    stop_announced:   Condvar,
    /// The conductor waits here for the last rider to acknowledge a stop.
    riders_settled:   Condvar,
}

impl Train {
    pub fn new(id: TrainId, track: TrackSymbol, route: Arc<Route>, fine_amount: i64) -> Self {
        Self {
            id,
            track,
            route,
            fine_amount,
            state:            Mutex::new(TrainState::default()),
            show_ready:       Condvar::new(),
            ticket_presented: Condvar::new(),
            stop_announced:   Condvar::new(),
            riders_settled:   Condvar::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> TrainId {
        self.id
    }

    #[inline]
    pub fn track(&self) -> TrackSymbol {
        self.track
    }

    #[inline]
    pub fn route(&self) -> &Arc<Route> {
        &self.route
    }

    #[inline]
    pub fn fine_amount(&self) -> i64 {
        self.fine_amount
    }

    // ── Boarding / alighting ──────────────────────────────────────────────────

    /// Count a rider onboard.  Called by the station with its lock held.
    pub(crate) fn board(self: &Arc<Self>, passenger: PassengerId) -> Ride {
        let mut s = lock(&self.state);
        s.riders_onboard += 1;
        Ride::new(Arc::clone(self), passenger, s.stop_epoch)
    }

    /// Announce a stop at `station` and block until every onboard rider has
    /// acknowledged it.  Returns the number of riders that alighted; `Ok(0)`
    /// without announcing when the train is empty.
    pub fn let_passengers_off(&self, station: &Arc<Station>) -> MonitorResult<usize> {
        let mut s = lock(&self.state);
        if s.closed {
            return Err(MonitorError::Closed);
        }
        if s.riders_onboard == 0 {
            return Ok(0);
        }

        let to_wake = s.riders_onboard;
        s.stop = Some(Arc::clone(station));
        s.riders_to_wake = to_wake;
        s.riders_woken = 0;
        s.stop_epoch += 1;
        s.stats.stops_announced += 1;
        debug!(train = %self.id, station = %station.id(), riders = to_wake, "stop announced");
        self.stop_announced.notify_all();

        s = wait_until(&self.riders_settled, s, |s| s.last_waker_signaled || s.closed);
        let completed = s.last_waker_signaled;
        let alighted = to_wake - s.riders_onboard.min(to_wake);
        s.stop = None;
        s.riders_to_wake = 0;
        s.riders_woken = 0;
        s.last_waker_signaled = false;

        if !completed {
            return Err(MonitorError::Closed);
        }
        Ok(alighted)
    }

    /// Block until a stop newer than `*seen_epoch` is announced, acknowledge
    /// it, and leave the train if the stop is `alight_at`.
    pub(crate) fn wait_for_stop(
        &self,
        passenger: PassengerId,
        seen_epoch: &mut u64,
        alight_at: StationId,
    ) -> MonitorResult<Stop> {
        let seen = *seen_epoch;
        let mut s = lock(&self.state);
        s = wait_until(&self.stop_announced, s, |s| {
            (s.stop.is_some() && s.stop_epoch != seen) || s.closed
        });
        let station = match (&s.stop, s.closed) {
            (Some(station), false) => Arc::clone(station),
            _ => return Err(MonitorError::Closed),
        };
        *seen_epoch = s.stop_epoch;

        let leaving = station.id() == alight_at;
        if leaving {
            s.riders_onboard -= 1;
            debug!(passenger = %passenger, train = %self.id, station = %station.id(), "alighted");
        }

        s.riders_woken += 1;
        if s.riders_woken == s.riders_to_wake {
            s.last_waker_signaled = true;
            self.riders_settled.notify_one();
        }

        Ok(if leaving { Stop::Alighted(station) } else { Stop::Passing(station) })
    }

    // ── Inspection ────────────────────────────────────────────────────────────

    /// Block until the inspector opens the window, then hand over the rider's
    /// ticket.  The rider's ticket is `Ticket::None` afterwards.
    pub fn show_ticket(&self, rider: &mut Rider) -> MonitorResult<()> {
        let mut s = lock(&self.state);
        s = wait_until(&self.show_ready, s, |s| s.can_show_ticket || s.closed);
        if s.closed {
            return Err(MonitorError::Closed);
        }
        s.can_show_ticket = false;
        s.under_review = Some(Presentation {
            passenger: rider.id(),
            ticket:    rider.take_ticket(),
            wallet:    Arc::clone(rider.wallet()),
        });
        self.ticket_presented.notify_one();
        Ok(())
    }

    /// One inspector step: admit a single rider, check the ticket they
    /// present, and fine them if it is not stamped for this track.
    pub fn inspect_next_ticket(&self) -> MonitorResult<Inspection> {
        let mut s = lock(&self.state);
        if s.closed {
            return Err(MonitorError::Closed);
        }
        s.can_show_ticket = true;
        self.show_ready.notify_one();

        s = wait_until(&self.ticket_presented, s, |s| s.under_review.is_some() || s.closed);
        let Some(shown) = s.under_review.take() else {
            return Err(MonitorError::Closed);
        };
        s.stats.tickets_checked += 1;

        let (verdict, balance) = if shown.ticket.is_valid_for(self.track) {
            info!(train = %self.id, passenger = %shown.passenger, "ticket valid");
            (Verdict::Valid, shown.wallet.balance())
        } else {
            let balance = shown.wallet.adjust(self.fine_amount);
            s.stats.fines_issued += 1;
            warn!(
                train     = %self.id,
                passenger = %shown.passenger,
                ticket    = %shown.ticket,
                fine      = self.fine_amount,
                balance,
                "passenger fined"
            );
            (Verdict::Fined(self.fine_amount), balance)
        };

        Ok(Inspection {
            train: self.id,
            passenger: shown.passenger,
            ticket: shown.ticket,
            verdict,
            balance,
        })
    }

    pub fn stats(&self) -> TrainStats {
        let s = lock(&self.state);
        TrainStats { riders_onboard: s.riders_onboard, ..s.stats }
    }

    /// Wake every blocked caller with `MonitorError::Closed`.  Irreversible.
    pub fn close(&self) {
        let mut s = lock(&self.state);
        s.closed = true;
        s.stop = None;
        drop(s);
        self.show_ready.notify_all();
        self.ticket_presented.notify_all();
        self.stop_announced.notify_all();
        self.riders_settled.notify_all();
    }
}

impl std::fmt::Debug for Train {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Train")
            .field("id", &self.id)
            .field("track", &self.track)
            .finish_non_exhaustive()
    }
}
