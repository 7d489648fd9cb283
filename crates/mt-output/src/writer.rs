//! The `OutputWriter` trait implemented by all backend writers.

use crate::{EventRow, OutputResult};

/// Trait implemented by journal backends.
///
/// Errors are stored by [`JournalObserver`](crate::JournalObserver) and
/// retrieved with its `take_error`.
pub trait OutputWriter: Send {
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
