//! `mt-output`: an event journal for metro runs.
//!
//! | Backend | Files created       |
//! |---------|---------------------|
//! | CSV     | `metro_events.csv`  |
//!
//! Backends implement [`OutputWriter`] and are driven by [`JournalObserver`],
//! which implements `mt_sim::MetroObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mt_output::{CsvWriter, JournalObserver};
//!
//! let journal = Arc::new(JournalObserver::new(CsvWriter::new(Path::new("./output"))?));
//! let metro = MetroBuilder::new(grid, config).observer(journal.clone()).build()?;
//! // … run …
//! journal.finish();
//! journal.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::JournalObserver;
pub use row::{EventKind, EventRow};
pub use writer::OutputWriter;
