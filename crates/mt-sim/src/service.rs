//! Seller and inspector loops.  Both run until their monitor is closed.

use tracing::debug;

use mt_rendezvous::{MonitorResult, Station, Train};

use crate::MetroObserver;

pub(crate) fn run_seller(station: &Station) -> MonitorResult<()> {
    debug!(station = %station.id(), track = %station.track(), "seller open");
    loop {
        station.serve_next_buyer()?;
    }
}

pub(crate) fn run_inspector(train: &Train, observer: &dyn MetroObserver) -> MonitorResult<()> {
    debug!(train = %train.id(), track = %train.track(), "inspector on duty");
    loop {
        let inspection = train.inspect_next_ticket()?;
        observer.on_inspection(&inspection);
    }
}
