//! CSV output backend.
//!
//! Creates `metro_events.csv` in the configured output directory.  Absent
//! optional fields are written as empty cells.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{EventRow, OutputResult};

pub const EVENTS_FILE: &str = "metro_events.csv";

pub struct CsvWriter {
    events:   Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the events file in `dir` and write the header row.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut events = Writer::from_path(dir.join(EVENTS_FILE))?;
        events.write_record(["seq", "kind", "passenger", "station", "train", "amount", "balance"])?;
        Ok(Self { events, finished: false })
    }
}

fn cell<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()> {
        self.events.write_record(&[
            row.seq.to_string(),
            row.kind.to_string(),
            row.actor.to_string(),
            cell(row.station),
            cell(row.train),
            cell(row.amount),
            cell(row.balance),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        Ok(())
    }
}
