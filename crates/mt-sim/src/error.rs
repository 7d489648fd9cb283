use thiserror::Error;

use mt_core::{Cell, CoreError, PassengerId};
use mt_rendezvous::MonitorError;
use mt_track::TrackError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] CoreError),

    #[error("track '{symbol}': {source}")]
    Track {
        symbol: char,
        #[source]
        source: TrackError,
    },

    #[error("track '{0}' is declared twice")]
    DuplicateTrack(char),

    #[error("no tracks declared")]
    NoTracks,

    #[error("the map has no free cell to spawn passengers on")]
    NoWalkableCells,

    #[error(transparent)]
    Map(#[from] TrackError),

    #[error(transparent)]
    Monitor(#[from] MonitorError),

    #[error("{passenger} stuck at {at}: no step gets closer to {target}")]
    Stuck {
        passenger: PassengerId,
        at:        Cell,
        target:    Cell,
    },

    #[error("simulation cancelled")]
    Cancelled,

    #[error("failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("thread '{0}' panicked")]
    ThreadPanic(String),
}

pub type SimResult<T> = Result<T, SimError>;
