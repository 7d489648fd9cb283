//! The station monitor: ticket sale and boarding.
//!
//! # Sale handshake
//!
//! The seller opens the counter (`serve_next_buyer`), exactly one buyer takes
//! it (`buy_ticket`), pays, receives a stamped ticket, and releases the seller.
//! Sales at one station are strictly serialized.
//!
//! # Boarding handshake
//!
//! Passengers register as waiting (`wait_for_train`).  A conductor docks its
//! train (`let_passengers_board`) only when someone is waiting; every waiter
//! then boards that train, and the last one to board releases the conductor.
//!
//! A station has a single docking slot.  While a train is docked, newcomers
//! wait at the gate and other conductors wait for the slot, so the set of
//! passengers a round will take is fixed at the moment the train docks.

use std::sync::{Arc, Condvar, Mutex};

use tracing::{debug, info};

use mt_core::{Cell, PassengerId, StationId, Ticket, TrackSymbol, TrainId};

use crate::monitor::{lock, wait_until};
use crate::{MonitorError, MonitorResult, Ride, Rider, Train};

/// A completed ticket sale.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Sale {
    pub passenger: PassengerId,
    pub station:   StationId,
    pub ticket:    Ticket,
    pub price:     i64,
    /// Buyer's balance after paying.
    pub balance:   i64,
}

/// Counters accumulated over the station's lifetime, plus the live queue.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StationStats {
    pub tickets_sold:       u64,
    pub boarding_rounds:    u64,
    pub passengers_boarded: u64,
    /// Passengers currently registered for the next train.
    pub waiting:            usize,
    /// Passengers held back because a train is docked.
    pub at_gate:            usize,
}

#[derive(Default)]
struct StationState {
    can_buy_ticket:        bool,
    next_buyer_ready:      bool,
    waiting:               usize,
    at_gate:               usize,
    /// The docked train; `Some` exactly while a boarding round is open.
    docked:                Option<Arc<Train>>,
    last_boarder_signaled: bool,
    closed:                bool,
    stats:                 StationStats,
}

pub struct Station {
    id:           StationId,
    location:     Cell,
    track:        TrackSymbol,
    ticket_price: i64,

    state:         Mutex<StationState>,
    /// Buyers wait here for the counter to open.
    sale_ready:    Condvar,
    /// The seller waits here for its buyer to finish.
    sale_done:     Condvar,
    /// Registered passengers wait here for a train.
    train_arrived: Condvar,
    /// A docked conductor waits here for the last boarder.
    boarding_done: Condvar,
    /// Newcomers and other conductors wait here for the slot to clear.
    dock_free:     Condvar,
}

impl Station {
    pub fn new(id: StationId, location: Cell, track: TrackSymbol, ticket_price: i64) -> Self {
        Self {
            id,
            location,
            track,
            ticket_price,
            state:         Mutex::new(StationState::default()),
            sale_ready:    Condvar::new(),
            sale_done:     Condvar::new(),
            train_arrived: Condvar::new(),
            boarding_done: Condvar::new(),
            dock_free:     Condvar::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> StationId {
        self.id
    }

    #[inline]
    pub fn location(&self) -> Cell {
        self.location
    }

    #[inline]
    pub fn track(&self) -> TrackSymbol {
        self.track
    }

    #[inline]
    pub fn ticket_price(&self) -> i64 {
        self.ticket_price
    }

    // ── Sale ──────────────────────────────────────────────────────────────────

    /// Block until the seller serves this rider, then pay and take a ticket
    /// stamped with this station's track.  Any ticket the rider already held
    /// is replaced.
    pub fn buy_ticket(&self, rider: &mut Rider) -> MonitorResult<Sale> {
        let mut s = lock(&self.state);
        s = wait_until(&self.sale_ready, s, |s| s.can_buy_ticket || s.closed);
        if s.closed {
            return Err(MonitorError::Closed);
        }
        s.can_buy_ticket = false;

        let balance = rider.wallet().adjust(-self.ticket_price);
        let ticket = Ticket::Stamped(self.track);
        rider.set_ticket(ticket);
        s.stats.tickets_sold += 1;

        info!(
            passenger = %rider.id(),
            station   = %self.id,
            track     = %self.track,
            balance,
            "ticket sold"
        );

        s.next_buyer_ready = true;
        self.sale_done.notify_one();

        Ok(Sale {
            passenger: rider.id(),
            station: self.id,
            ticket,
            price: self.ticket_price,
            balance,
        })
    }

    /// One seller step: open the counter to a single buyer and block until
    /// that sale completes.
    pub fn serve_next_buyer(&self) -> MonitorResult<()> {
        let mut s = lock(&self.state);
        if s.closed {
            return Err(MonitorError::Closed);
        }
        s.can_buy_ticket = true;
        self.sale_ready.notify_one();

        s = wait_until(&self.sale_done, s, |s| s.next_buyer_ready || s.closed);
        if !s.next_buyer_ready {
            return Err(MonitorError::Closed);
        }
        s.next_buyer_ready = false;
        Ok(())
    }

    // ── Boarding ──────────────────────────────────────────────────────────────

    /// Register for the next train and block until it docks, then board it.
    ///
    /// The rider is counted onboard before the station lock is released, so
    /// the train cannot announce a stop this rider would miss.
    pub fn wait_for_train(&self, rider: &Rider) -> MonitorResult<Ride> {
        let mut s = lock(&self.state);
        s.at_gate += 1;
        s = wait_until(&self.dock_free, s, |s| s.docked.is_none() || s.closed);
        s.at_gate -= 1;
        if s.closed {
            return Err(MonitorError::Closed);
        }
        s.waiting += 1;

        s = wait_until(&self.train_arrived, s, |s| s.docked.is_some() || s.closed);
        s.waiting -= 1;
        let train = match (&s.docked, s.closed) {
            (Some(train), false) => Arc::clone(train),
            _ => return Err(MonitorError::Closed),
        };

        let ride = train.board(rider.id());
        s.stats.passengers_boarded += 1;
        debug!(passenger = %rider.id(), station = %self.id, train = %train.id(), "boarded");

        if s.waiting == 0 {
            s.last_boarder_signaled = true;
            self.boarding_done.notify_one();
        }
        Ok(ride)
    }

    /// Dock `train` and let every waiting passenger board.
    ///
    /// Returns the number of passengers that boarded.  Returns `Ok(0)`
    /// immediately, without docking, when nobody is waiting.
    pub fn let_passengers_board(&self, train: &Arc<Train>) -> MonitorResult<usize> {
        match self.dock(train)? {
            Some(expected) => self.depart(train, expected),
            None => Ok(0),
        }
    }

    /// Take the docking slot and open a round for everyone now waiting.
    /// `None` when nobody is waiting; the slot is left free.
    pub(crate) fn dock(&self, train: &Arc<Train>) -> MonitorResult<Option<usize>> {
        let mut s = lock(&self.state);
        s = wait_until(&self.dock_free, s, |s| s.docked.is_none() || s.closed);
        if s.closed {
            return Err(MonitorError::Closed);
        }
        let expected = s.waiting;
        if expected == 0 {
            return Ok(None);
        }

        s.docked = Some(Arc::clone(train));
        s.stats.boarding_rounds += 1;
        debug!(station = %self.id, train = %train.id(), waiting = expected, "train docked");
        self.train_arrived.notify_all();
        Ok(Some(expected))
    }

    /// Wait for the last of `expected` boarders, then free the slot.
    pub(crate) fn depart(&self, train: &Arc<Train>, expected: usize) -> MonitorResult<usize> {
        let mut s = lock(&self.state);
        s = wait_until(&self.boarding_done, s, |s| s.last_boarder_signaled || s.closed);
        let completed = s.last_boarder_signaled;
        s.last_boarder_signaled = false;
        s.docked = None;
        self.dock_free.notify_all();

        if !completed {
            return Err(MonitorError::Closed);
        }
        debug!(station = %self.id, train = %train.id(), boarded = expected, "train departing");
        Ok(expected)
    }

    /// Id of the train currently docked, if any.
    pub fn docked_train(&self) -> Option<TrainId> {
        lock(&self.state).docked.as_ref().map(|t| t.id())
    }

    pub fn stats(&self) -> StationStats {
        let s = lock(&self.state);
        StationStats { waiting: s.waiting, at_gate: s.at_gate, ..s.stats }
    }

    /// Wake every blocked caller with `MonitorError::Closed`.  Irreversible.
    pub fn close(&self) {
        let mut s = lock(&self.state);
        s.closed = true;
        s.docked = None;
        drop(s);
        self.sale_ready.notify_all();
        self.sale_done.notify_all();
        self.train_arrived.notify_all();
        self.boarding_done.notify_all();
        self.dock_free.notify_all();
    }
}

impl std::fmt::Debug for Station {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Station")
            .field("id", &self.id)
            .field("location", &self.location)
            .field("track", &self.track)
            .finish_non_exhaustive()
    }
}
