use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MonitorError {
    #[error("monitor closed")]
    Closed,
}

pub type MonitorResult<T> = Result<T, MonitorError>;
