//! `JournalObserver<W>`: bridges `MetroObserver` to an `OutputWriter`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use mt_core::{Cell, PassengerId};
use mt_rendezvous::{Inspection, Sale, Verdict};
use mt_sim::{JourneyReport, MetroObserver};

use crate::row::{EventKind, EventRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

struct Journal<W> {
    writer:     W,
    next_seq:   u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> Journal<W> {
    fn record(&mut self, mut row: EventRow) {
        row.seq = self.next_seq;
        self.next_seq += 1;
        let result = self.writer.write_event(&row);
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

/// A [`MetroObserver`] that journals ticket sales, inspections, arrivals and
/// stuck passengers to any [`OutputWriter`] backend.
///
/// Hooks fire from many actor threads; writes are serialized through one
/// mutex, so `seq` is the order in which events reached the journal.  Errors
/// are stored because observer hooks have no return value; check them with
/// [`take_error`][Self::take_error] after calling [`finish`][Self::finish].
pub struct JournalObserver<W: OutputWriter> {
    journal: Mutex<Journal<W>>,
}

impl<W: OutputWriter> JournalObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            journal: Mutex::new(Journal { writer, next_seq: 0, last_error: None }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Journal<W>> {
        self.journal.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of events recorded so far.
    pub fn len(&self) -> u64 {
        self.lock().next_seq
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flush the backend.  Call once the metro has shut down.
    pub fn finish(&self) {
        let mut journal = self.lock();
        let result = journal.writer.finish();
        journal.store_err(result);
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&self) -> Option<OutputError> {
        self.lock().last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.journal.into_inner().unwrap_or_else(PoisonError::into_inner).writer
    }
}

fn row(kind: EventKind, passenger: PassengerId) -> EventRow {
    EventRow {
        seq:     0,
        kind,
        actor:   passenger.0,
        station: None,
        train:   None,
        amount:  None,
        balance: None,
    }
}

impl<W: OutputWriter> MetroObserver for JournalObserver<W> {
    fn on_ticket_sold(&self, sale: &Sale) {
        self.lock().record(EventRow {
            station: Some(sale.station.0),
            amount:  Some(sale.price),
            balance: Some(sale.balance),
            ..row(EventKind::TicketSold, sale.passenger)
        });
    }

    fn on_inspection(&self, inspection: &Inspection) {
        let (kind, amount) = match inspection.verdict {
            Verdict::Valid       => (EventKind::TicketValid, None),
            Verdict::Fined(fine) => (EventKind::Fined, Some(fine)),
        };
        self.lock().record(EventRow {
            train:   Some(inspection.train.0),
            amount,
            balance: Some(inspection.balance),
            ..row(kind, inspection.passenger)
        });
    }

    fn on_arrival(&self, report: &JourneyReport) {
        self.lock().record(EventRow {
            balance: Some(report.final_balance),
            ..row(EventKind::Arrived, report.passenger)
        });
    }

    fn on_passenger_stuck(&self, passenger: PassengerId, _at: Cell, _target: Cell) {
        self.lock().record(row(EventKind::Stuck, passenger));
    }
}
