//! Simulation configuration.
//!
//! # Pacing
//!
//! All sleeps in the simulation are cooperative throttling so a renderer can
//! keep up; none of them affects correctness.  Headless runs and tests use
//! [`Pacing::none`].

use std::time::Duration;

use crate::{CoreError, CoreResult};

// ── Pacing ────────────────────────────────────────────────────────────────────

/// Cooperative sleep durations for each kind of actor step.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pacing {
    /// Pause after each train move.  Default: 100 ms.
    pub train_move: Duration,
    /// Extra pause after a train has finished a station stop.  Default: 200 ms.
    pub train_stop: Duration,
    /// Pause after each passenger walking step.  Default: 100 ms.
    pub walk_step: Duration,
    /// Interval between passenger spawns in the demo driver.  Default: 500 ms.
    pub passenger_spawn: Duration,
}

impl Pacing {
    /// No sleeps at all; run as fast as the monitors allow.
    pub fn none() -> Self {
        Self {
            train_move:      Duration::ZERO,
            train_stop:      Duration::ZERO,
            walk_step:       Duration::ZERO,
            passenger_spawn: Duration::ZERO,
        }
    }

    /// Sleep for `d` unless it is zero.
    #[inline]
    pub fn pause(d: Duration) {
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            train_move:      Duration::from_millis(100),
            train_stop:      Duration::from_millis(200),
            walk_step:       Duration::from_millis(100),
            passenger_spawn: Duration::from_millis(500),
        }
    }
}

// ── MetroConfig ───────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Money is in whole currency units.  Wallets may go negative: ticket sales
/// never check the balance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetroConfig {
    /// Price debited for every ticket sold.  Default: 10.
    pub ticket_price: i64,

    /// Amount added to a wallet when an invalid ticket is presented.
    /// Default: 50.
    pub fine_amount: i64,

    /// Starting balance of every passenger.  Default: 100.
    pub initial_wallet: i64,

    /// Trains running on each track, spread evenly along its route.
    /// Default: 2.
    pub trains_per_track: u32,

    /// Passengers spawned by the demo driver.  Default: 1000.
    pub passenger_count: u32,

    /// Master RNG seed for spawn/destination picks.
    pub seed: u64,

    pub pacing: Pacing,
}

impl MetroConfig {
    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.ticket_price <= 0 {
            return Err(CoreError::Config(format!(
                "ticket price must be positive, got {}",
                self.ticket_price
            )));
        }
        if self.fine_amount < 0 {
            return Err(CoreError::Config(format!(
                "fine amount must not be negative, got {}",
                self.fine_amount
            )));
        }
        if self.trains_per_track == 0 {
            return Err(CoreError::Config("at least one train per track is required".into()));
        }
        Ok(())
    }

    /// Same config with all pacing sleeps disabled.
    pub fn headless(mut self) -> Self {
        self.pacing = Pacing::none();
        self
    }
}

impl Default for MetroConfig {
    fn default() -> Self {
        Self {
            ticket_price:     10,
            fine_amount:      50,
            initial_wallet:   100,
            trains_per_track: 2,
            passenger_count:  1000,
            seed:             42,
            pacing:           Pacing::default(),
        }
    }
}
