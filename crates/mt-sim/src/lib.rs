//! `mt-sim`: builds a metro network and runs it, one thread per actor.
//!
//! # Actors
//!
//! ```text
//! Conductor  (one per train)    move one cell → at a station: let_passengers_off,
//!                               then let_passengers_board → pause → repeat
//! Seller     (one per station)  serve_next_buyer → repeat
//! Inspector  (one per train)    inspect_next_ticket → report → repeat
//! Passenger  (one per journey)  walk to boarding station → buy ticket →
//!                               wait for train → show ticket → ride →
//!                               walk to destination → done
//! ```
//!
//! Service actors (conductors, sellers, inspectors) loop until the handle is
//! shut down.  Passengers end on their own when they arrive.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use mt_core::{Cell, MetroConfig};
//! use mt_sim::{MetroBuilder, TrackSpec};
//! use mt_track::SymbolGrid;
//!
//! let grid = SymbolGrid::parse(MAP);
//! let metro = MetroBuilder::new(grid, MetroConfig::default())
//!     .track(TrackSpec::new('G', 'g', Cell::new(1, 1)))
//!     .build()?;
//! let mut handle = metro.start()?;
//! handle.spawn_random_passenger()?;
//! let reports = handle.join_passengers()?;
//! handle.shutdown()?;
//! ```

pub mod builder;
pub mod error;
pub mod metro;
pub mod observer;
pub mod passenger;

mod conductor;
mod service;


pub use builder::{MetroBuilder, TrackSpec};
pub use error::{SimError, SimResult};
pub use metro::{Metro, MetroHandle};
pub use observer::{MetroObserver, NoopObserver};
pub use passenger::{JourneyReport, Outcome};
