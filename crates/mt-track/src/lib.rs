//! `mt-track`: track geometry, map grids, walking, and trip planning.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`grid`]      | `SymbolGrid`: the character map and symbol lookups          |
//! | [`route`]     | `build_route`, `Route`, `RouteShape`                        |
//! | [`navigator`] | `Navigator` trait, `GreedyNavigator`                        |
//! | [`map`]       | `MetroMap` (R-tree over stations), `StationSite`, `Trip`    |
//! | [`error`]     | `TrackError`, `TrackResult<T>`                              |
//!
//! Everything here is immutable once built and is shared between actor
//! threads without locking.

pub mod error;
pub mod grid;
pub mod map;
pub mod navigator;
pub mod route;


pub use error::{TrackError, TrackResult};
pub use grid::SymbolGrid;
pub use map::{MetroMap, StationSite, Trip};
pub use navigator::{GreedyNavigator, Navigator};
pub use route::{Route, RouteShape, build_route};
