//! `mt-core`: foundational types for the metro simulation.
//!
//! This crate is a dependency of every other `mt-*` crate.  It has no `mt-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`ids`]      | `PassengerId`, `StationId`, `TrainId`, `ActorId`         |
//! | [`grid`]     | `Cell`, `Direction`                                      |
//! | [`ticket`]   | `TrackSymbol`, `Ticket`                                  |
//! | [`config`]   | `MetroConfig`, `Pacing`                                  |
//! | [`rng`]      | `AgentRng` (per-passenger), `SimRng` (demo jitter)       |
//! | [`cancel`]   | `CancelToken`                                            |
//! | [`error`]    | `CoreError`, `CoreResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod cancel;
pub mod config;
pub mod error;
pub mod grid;
pub mod ids;
pub mod rng;
pub mod ticket;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cancel::CancelToken;
pub use config::{MetroConfig, Pacing};
pub use error::{CoreError, CoreResult};
pub use grid::{Cell, Direction};
pub use ids::{ActorId, PassengerId, StationId, TrainId};
pub use rng::{AgentRng, SimRng};
pub use ticket::{Ticket, TrackSymbol};
