//! A rider's handle on the train it boarded.

use std::sync::Arc;

use mt_core::{PassengerId, StationId};

use crate::{MonitorResult, Rider, Station, Train};

/// What a rider observed at one announced stop.
#[derive(Clone, Debug)]
pub enum Stop {
    /// The train stopped somewhere else; the rider is still aboard.
    Passing(Arc<Station>),
    /// The rider has left the train at this station.
    Alighted(Arc<Station>),
}

impl Stop {
    pub fn station(&self) -> &Arc<Station> {
        match self {
            Stop::Passing(s) | Stop::Alighted(s) => s,
        }
    }

    #[inline]
    pub fn is_alighted(&self) -> bool {
        matches!(self, Stop::Alighted(_))
    }
}

/// Returned by [`Station::wait_for_train`](crate::Station::wait_for_train).
///
/// Remembers the last stop announcement this rider acknowledged so each
/// announcement is counted once.
#[derive(Debug)]
pub struct Ride {
    train:      Arc<Train>,
    passenger:  PassengerId,
    seen_epoch: u64,
}

impl Ride {
    pub(crate) fn new(train: Arc<Train>, passenger: PassengerId, seen_epoch: u64) -> Self {
        Self { train, passenger, seen_epoch }
    }

    #[inline]
    pub fn train(&self) -> &Arc<Train> {
        &self.train
    }

    #[inline]
    pub fn passenger(&self) -> PassengerId {
        self.passenger
    }

    pub fn show_ticket(&self, rider: &mut Rider) -> MonitorResult<()> {
        self.train.show_ticket(rider)
    }

    /// Block until the next stop and acknowledge it.  When the stop is
    /// `alight_at` the rider is off the train once this returns.
    pub fn wait_for_stop(&mut self, alight_at: StationId) -> MonitorResult<Stop> {
        self.train.wait_for_stop(self.passenger, &mut self.seen_epoch, alight_at)
    }

    /// Ride until `alight_at`, returning the station left at.
    pub fn ride_to(&mut self, alight_at: StationId) -> MonitorResult<Arc<Station>> {
        loop {
            let stop = self.wait_for_stop(alight_at)?;
            if stop.is_alighted() {
                return Ok(Arc::clone(stop.station()));
            }
        }
    }
}
