//! The conductor: drives one train around its route.

use tracing::debug;

use mt_core::{ActorId, Pacing};
use mt_rendezvous::MonitorResult;

use crate::metro::{Network, TrainPlacement};

/// Run the train until the metro shuts down.  The train is drawn at its
/// starting cell and erased wherever it stops.
pub(crate) fn run(net: &Network, placement: &TrainPlacement) -> MonitorResult<()> {
    let train = &placement.train;
    let actor = ActorId::Train(train.id());

    let mut index = placement.start;
    net.observer.on_draw(actor, train.route().cell_at(index));
    debug!(train = %train.id(), track = %train.track(), "conductor started");

    let result = drive(net, placement, &mut index);

    net.observer.on_erase(actor, train.route().cell_at(index));
    debug!(train = %train.id(), "conductor stopped");
    result
}

/// Move one cell at a time; at every station on the route, let riders off
/// and then let waiting passengers on.
fn drive(net: &Network, placement: &TrainPlacement, index: &mut usize) -> MonitorResult<()> {
    let train = &placement.train;
    let route = train.route();
    let pacing = &net.config.pacing;
    let actor = ActorId::Train(train.id());

    while !net.cancel.is_cancelled() {
        let from = route.cell_at(*index);
        *index = route.next_index(*index);
        net.observer.on_move(actor, from, route.cell_at(*index));
        Pacing::pause(pacing.train_move);

        let Some(station) = &placement.stops[*index] else {
            continue;
        };
        let alighted = train.let_passengers_off(station)?;
        let boarded = station.let_passengers_board(train)?;
        if alighted + boarded > 0 {
            debug!(train = %train.id(), station = %station.id(), alighted, boarded, "stop served");
        }
        Pacing::pause(pacing.train_stop);
    }
    Ok(())
}
