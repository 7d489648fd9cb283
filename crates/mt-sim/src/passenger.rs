//! The passenger actor: one thread per journey.
//!
//! # Lifecycle
//!
//! ```text
//! walk to boarding station → buy ticket → wait for train → show ticket
//!   → ride (acknowledge each stop) → alight → walk to destination → done
//! ```
//!
//! When the nearest stations to the origin and the destination coincide the
//! ride is skipped and the passenger walks straight there.

use std::sync::Arc;

use tracing::{debug, error, info};

use mt_core::{ActorId, Cell, Pacing, PassengerId, StationId};
use mt_rendezvous::{MonitorError, Rider};

use crate::metro::Network;
use crate::{SimError, SimResult};

/// How a journey ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Rode a train from `board` to `alight`, then walked to the destination.
    Rode { board: StationId, alight: StationId },
    /// Walked the whole way.
    Walked,
    /// The navigator found no step toward the next target.
    Stuck { at: Cell },
    /// The run was shut down mid-journey.
    Cancelled,
}

impl Outcome {
    #[inline]
    pub fn is_arrived(self) -> bool {
        matches!(self, Outcome::Rode { .. } | Outcome::Walked)
    }
}

/// Summary of one passenger's journey.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct JourneyReport {
    pub passenger:     PassengerId,
    pub origin:        Cell,
    pub destination:   Cell,
    /// Balance when the journey ended.  A fine may still be applied after a
    /// passenger has left its train but before it reaches its destination.
    pub final_balance: i64,
    pub outcome:       Outcome,
}

pub(crate) struct Passenger {
    rider:       Rider,
    origin:      Cell,
    destination: Cell,
    at:          Cell,
    visible:     bool,
    net:         Arc<Network>,
}

impl Passenger {
    pub(crate) fn new(id: PassengerId, origin: Cell, destination: Cell, net: Arc<Network>) -> Self {
        Self {
            rider: Rider::new(id, net.config.initial_wallet),
            origin,
            destination,
            at: origin,
            visible: false,
            net,
        }
    }

    #[inline]
    fn actor(&self) -> ActorId {
        ActorId::Passenger(self.rider.id())
    }

    /// Run the journey to completion.  Getting stuck or being cancelled ends
    /// the journey normally; only unexpected errors are returned.
    pub(crate) fn run(mut self) -> SimResult<JourneyReport> {
        let id = self.rider.id();
        self.appear(self.origin);

        let outcome = match self.journey() {
            Ok(outcome) => outcome,
            Err(SimError::Stuck { passenger, at, target }) => {
                error!(passenger = %passenger, at = %at, target = %target, "passenger stuck");
                self.net.observer.on_passenger_stuck(passenger, at, target);
                Outcome::Stuck { at }
            }
            Err(SimError::Cancelled | SimError::Monitor(MonitorError::Closed)) => {
                debug!(passenger = %id, at = %self.at, "journey cancelled");
                Outcome::Cancelled
            }
            Err(e) => {
                self.vanish();
                return Err(e);
            }
        };

        let report = JourneyReport {
            passenger:     id,
            origin:        self.origin,
            destination:   self.destination,
            final_balance: self.rider.balance(),
            outcome,
        };
        if outcome.is_arrived() {
            info!(passenger = %id, at = %self.at, balance = report.final_balance, "arrived at destination");
            self.net.observer.on_arrival(&report);
        }
        self.vanish();
        Ok(report)
    }

    fn journey(&mut self) -> SimResult<Outcome> {
        let trip = self.net.map.plan_trip(self.origin, self.destination)?;
        if trip.is_walk_only() {
            self.walk_to(self.destination)?;
            return Ok(Outcome::Walked);
        }

        let net = Arc::clone(&self.net);
        let board = net.station(trip.board.id);
        self.walk_to(board.location())?;

        let sale = board.buy_ticket(&mut self.rider)?;
        net.observer.on_ticket_sold(&sale);

        let mut ride = board.wait_for_train(&self.rider)?;
        self.vanish();
        ride.show_ticket(&mut self.rider)?;
        let alighted_at = ride.ride_to(trip.alight.id)?;

        self.appear(alighted_at.location());
        self.walk_to(self.destination)?;
        Ok(Outcome::Rode { board: trip.board.id, alight: trip.alight.id })
    }

    fn walk_to(&mut self, target: Cell) -> SimResult<()> {
        while self.at != target {
            if self.net.cancel.is_cancelled() {
                return Err(SimError::Cancelled);
            }
            let next = self.net.navigator.step_toward(self.at, target).ok_or(SimError::Stuck {
                passenger: self.rider.id(),
                at:        self.at,
                target,
            })?;
            self.net.observer.on_move(self.actor(), self.at, next);
            self.at = next;
            Pacing::pause(self.net.config.pacing.walk_step);
        }
        Ok(())
    }

    fn appear(&mut self, at: Cell) {
        self.at = at;
        self.visible = true;
        self.net.observer.on_draw(self.actor(), at);
    }

    fn vanish(&mut self) {
        if self.visible {
            self.visible = false;
            self.net.observer.on_erase(self.actor(), self.at);
        }
    }
}
