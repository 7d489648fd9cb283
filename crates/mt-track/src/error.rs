//! Track-subsystem error type.
//!
//! Every variant is a configuration error: it is detected once while the
//! network is built and is never produced after actor threads start.

use thiserror::Error;

use mt_core::{Cell, CoreError};

/// Errors produced by `mt-track`.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("starting point {0} must be part of the track")]
    StartNotOnTrack(Cell),

    #[error("there's a break in the track at {0}")]
    Break(Cell),

    #[error("track branches at {0}; a track must be a single line or loop")]
    Branch(Cell),

    #[error("track has {0} cell(s); at least two are required")]
    TooShort(usize),

    #[error("the map has no stations")]
    NoStations,

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type TrackResult<T> = Result<T, TrackError>;
