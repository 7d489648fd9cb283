//! `mt-rendezvous`: the monitors every metro actor synchronizes through.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`station`] | `Station`: ticket sale and boarding handshakes                |
//! | [`train`]   | `Train`: alighting and ticket inspection handshakes           |
//! | [`ride`]    | `Ride`, `Stop`: a rider's handle on the train it boarded      |
//! | [`rider`]   | `Rider`, `Wallet`: the passenger-owned state handshakes touch |
//! | [`error`]   | `MonitorError`, `MonitorResult<T>`                            |
//!
//! # Monitor discipline
//!
//! Each `Station` and `Train` owns exactly one `Mutex` around its state and
//! one `Condvar` per wait reason.  All counters that decide who wakes whom
//! are read and written only under that mutex, and every wait is a
//! `wait_while` loop, so spurious wake-ups are harmless.
//!
//! Lock order is **Station before Train**: boarding registers the rider on
//! the docked train while the station lock is held.  No code path takes a
//! station lock while holding a train lock.
//!
//! # Handshakes
//!
//! ```text
//! Seller     serve_next_buyer  ⇄ buy_ticket        Passenger
//! Conductor  let_passengers_board ⇄ wait_for_train Passenger   (Station)
//! Conductor  let_passengers_off   ⇄ wait_for_stop  Passenger   (Train)
//! Inspector  inspect_next_ticket  ⇄ show_ticket    Passenger   (Train)
//! ```
//!
//! Every blocking call returns [`MonitorError::Closed`] once the monitor is
//! closed, which is how a simulation is torn down.

mod monitor;

pub mod error;
pub mod ride;
pub mod rider;
pub mod station;
pub mod train;

#[cfg(test)]
mod tests;

pub use error::{MonitorError, MonitorResult};
pub use ride::{Ride, Stop};
pub use rider::{Rider, Wallet};
pub use station::{Sale, Station, StationStats};
pub use train::{Inspection, Train, TrainStats, Verdict};
