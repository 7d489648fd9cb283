//! Integration tests for mt-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::{CsvWriter, EVENTS_FILE};
    use crate::row::{EventKind, EventRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn sold_row(seq: u64) -> EventRow {
        EventRow {
            seq,
            kind:    EventKind::TicketSold,
            actor:   7,
            station: Some(2),
            train:   None,
            amount:  Some(10),
            balance: Some(90),
        }
    }

    #[test]
    fn csv_file_created_with_header() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(EVENTS_FILE)).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["seq", "kind", "passenger", "station", "train", "amount", "balance"]);
        assert_eq!(rdr.records().count(), 0);
    }

    #[test]
    fn absent_fields_are_empty_cells() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_event(&sold_row(0)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(EVENTS_FILE)).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "ticket_sold");
        assert_eq!(&rows[0][2], "7");
        assert_eq!(&rows[0][3], "2");
        assert_eq!(&rows[0][4], ""); // train
        assert_eq!(&rows[0][6], "90");
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

#[cfg(test)]
mod observer_tests {
    use mt_core::{PassengerId, StationId, Ticket, TrainId};
    use mt_rendezvous::{Inspection, Sale, Verdict};
    use mt_sim::MetroObserver;

    use crate::row::{EventKind, EventRow};
    use crate::writer::OutputWriter;
    use crate::{JournalObserver, OutputError, OutputResult};

    /// Keeps rows in memory; optionally fails every write.
    #[derive(Default)]
    struct MemWriter {
        rows:     Vec<EventRow>,
        fail:     bool,
        finished: usize,
    }

    impl OutputWriter for MemWriter {
        fn write_event(&mut self, row: &EventRow) -> OutputResult<()> {
            if self.fail {
                return Err(OutputError::Io(std::io::Error::other("disk full")));
            }
            self.rows.push(*row);
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    fn sale(passenger: u32) -> Sale {
        Sale {
            passenger: PassengerId(passenger),
            station:   StationId(1),
            ticket:    Ticket::None,
            price:     10,
            balance:   90,
        }
    }

    fn fined(passenger: u32) -> Inspection {
        Inspection {
            train:     TrainId(3),
            passenger: PassengerId(passenger),
            ticket:    Ticket::None,
            verdict:   Verdict::Fined(50),
            balance:   140,
        }
    }

    #[test]
    fn events_are_sequenced_in_arrival_order() {
        let journal = JournalObserver::new(MemWriter::default());
        journal.on_ticket_sold(&sale(0));
        journal.on_inspection(&fined(0));
        assert_eq!(journal.len(), 2);

        let rows = journal.into_writer().rows;
        assert_eq!(rows[0].seq, 0);
        assert_eq!(rows[0].kind, EventKind::TicketSold);
        assert_eq!(rows[0].station, Some(1));
        assert_eq!(rows[1].seq, 1);
        assert_eq!(rows[1].kind, EventKind::Fined);
        assert_eq!(rows[1].train, Some(3));
        assert_eq!(rows[1].amount, Some(50));
        assert_eq!(rows[1].balance, Some(140));
    }

    #[test]
    fn first_write_error_is_kept() {
        let journal = JournalObserver::new(MemWriter { fail: true, ..MemWriter::default() });
        journal.on_ticket_sold(&sale(0));
        journal.on_ticket_sold(&sale(1));
        assert!(matches!(journal.take_error(), Some(OutputError::Io(_))));
        assert!(journal.take_error().is_none());
    }

    #[test]
    fn finish_reaches_the_writer() {
        let journal = JournalObserver::new(MemWriter::default());
        journal.finish();
        assert!(journal.is_empty());
        assert_eq!(journal.into_writer().finished, 1);
    }
}

#[cfg(test)]
mod run_tests {
    use std::sync::Arc;

    use mt_core::{Cell, MetroConfig};
    use mt_sim::{MetroBuilder, TrackSpec};
    use mt_track::SymbolGrid;

    use crate::csv::{CsvWriter, EVENTS_FILE};
    use crate::JournalObserver;

    #[test]
    fn metro_run_is_journaled() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Arc::new(JournalObserver::new(CsvWriter::new(dir.path()).unwrap()));

        let grid = SymbolGrid::parse("          \n gGGGGGg  \n          ");
        let config = MetroConfig { trains_per_track: 1, ..MetroConfig::default() }.headless();
        let metro = MetroBuilder::new(grid, config)
            .track(TrackSpec::new('G', 'g', Cell::new(1, 1)))
            .observer(journal.clone())
            .build()
            .unwrap();
        let mut handle = metro.start().unwrap();
        handle.spawn_passenger(Cell::new(0, 0), Cell::new(2, 8)).unwrap();
        handle.join_passengers().unwrap();
        handle.shutdown().unwrap();

        journal.finish();
        assert!(journal.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join(EVENTS_FILE)).unwrap();
        let mut kinds: Vec<String> = rdr.records().map(|r| r.unwrap()[1].to_owned()).collect();
        kinds.sort();
        assert_eq!(kinds, ["arrived", "ticket_sold", "ticket_valid"]);
    }
}
