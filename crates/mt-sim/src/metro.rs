//! The built network and the handle to a running simulation.

use std::mem;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use mt_core::{AgentRng, CancelToken, Cell, MetroConfig, PassengerId, StationId};
use mt_rendezvous::{MonitorError, MonitorResult, Station, Train};
use mt_track::{MetroMap, Navigator, SymbolGrid};

use crate::passenger::Passenger;
use crate::{JourneyReport, MetroObserver, SimError, SimResult, conductor, service};

// ── Network ───────────────────────────────────────────────────────────────────

/// A train and where its conductor starts it.
pub(crate) struct TrainPlacement {
    pub train: Arc<Train>,
    /// Index into the train's route.
    pub start: usize,
    /// Station at each route index, if any.
    pub stops: Vec<Option<Arc<Station>>>,
}

/// Everything the actor threads share.  Immutable after build; all mutable
/// state lives inside the monitors.
pub(crate) struct Network {
    pub config:    MetroConfig,
    pub grid:      SymbolGrid,
    pub map:       MetroMap,
    /// Indexed by `StationId`.
    pub stations:  Vec<Arc<Station>>,
    /// Indexed by `TrainId`.
    pub trains:    Vec<TrainPlacement>,
    pub observer:  Arc<dyn MetroObserver>,
    pub navigator: Arc<dyn Navigator>,
    pub cancel:    CancelToken,
}

impl Network {
    #[inline]
    pub fn station(&self, id: StationId) -> &Arc<Station> {
        &self.stations[id.index()]
    }

    fn close_all(&self) {
        self.cancel.cancel();
        for station in &self.stations {
            station.close();
        }
        for placement in &self.trains {
            placement.train.close();
        }
    }
}

// ── Metro ─────────────────────────────────────────────────────────────────────

/// A fully built, not yet running metro.  Create via
/// [`MetroBuilder`][crate::MetroBuilder].
pub struct Metro {
    pub(crate) net: Network,
}

impl Metro {
    pub fn config(&self) -> &MetroConfig {
        &self.net.config
    }

    pub fn map(&self) -> &MetroMap {
        &self.net.map
    }

    pub fn stations(&self) -> &[Arc<Station>] {
        &self.net.stations
    }

    pub fn trains(&self) -> impl Iterator<Item = &Arc<Train>> {
        self.net.trains.iter().map(|p| &p.train)
    }

    /// Start one seller per station and one conductor and one inspector per
    /// train.
    pub fn start(self) -> SimResult<MetroHandle> {
        let net = Arc::new(self.net);
        let mut handle = MetroHandle {
            spawn_cells:       net.grid.spawn_cells(),
            destination_cells: net.grid.destination_cells(),
            net,
            services:          Vec::new(),
            passengers:        Vec::new(),
            next_passenger:    0,
        };

        for station in &handle.net.stations {
            let station = Arc::clone(station);
            let name = format!("seller-{}", station.id().0);
            handle.services.push(spawn_service(name, move || service::run_seller(&station))?);
        }
        for slot in 0..handle.net.trains.len() {
            let net = Arc::clone(&handle.net);
            let id = net.trains[slot].train.id();
            handle.services.push(spawn_service(format!("conductor-{}", id.0), move || {
                conductor::run(&net, &net.trains[slot])
            })?);

            let net = Arc::clone(&handle.net);
            handle.services.push(spawn_service(format!("inspector-{}", id.0), move || {
                service::run_inspector(&net.trains[slot].train, net.observer.as_ref())
            })?);
        }

        info!(
            stations = handle.net.stations.len(),
            trains   = handle.net.trains.len(),
            "metro running"
        );
        Ok(handle)
    }
}

fn spawn_service<F>(name: String, body: F) -> SimResult<Service>
where
    F: FnOnce() -> MonitorResult<()> + Send + 'static,
{
    let handle = thread::Builder::new().name(name.clone()).spawn(body)?;
    Ok(Service { name, handle })
}

// ── MetroHandle ───────────────────────────────────────────────────────────────

struct Service {
    name:   String,
    handle: JoinHandle<MonitorResult<()>>,
}

/// A running metro.
///
/// Dropping the handle without calling [`shutdown`](Self::shutdown) still
/// cancels the run and releases every blocked thread, but does not join them.
pub struct MetroHandle {
    net:               Arc<Network>,
    services:          Vec<Service>,
    passengers:        Vec<(PassengerId, JoinHandle<SimResult<JourneyReport>>)>,
    next_passenger:    u32,
    spawn_cells:       Vec<Cell>,
    destination_cells: Vec<Cell>,
}

impl MetroHandle {
    pub fn config(&self) -> &MetroConfig {
        &self.net.config
    }

    pub fn stations(&self) -> &[Arc<Station>] {
        &self.net.stations
    }

    pub fn station(&self, id: StationId) -> Option<&Arc<Station>> {
        self.net.stations.get(id.index())
    }

    pub fn trains(&self) -> impl Iterator<Item = &Arc<Train>> {
        self.net.trains.iter().map(|p| &p.train)
    }

    /// Passengers spawned and not yet joined.
    pub fn passengers_in_flight(&self) -> usize {
        self.passengers.iter().filter(|(_, h)| !h.is_finished()).count()
    }

    /// Start a passenger walking from `origin` to `destination`.
    pub fn spawn_passenger(&mut self, origin: Cell, destination: Cell) -> SimResult<PassengerId> {
        let id = PassengerId(self.next_passenger);
        let passenger = Passenger::new(id, origin, destination, Arc::clone(&self.net));
        let handle = thread::Builder::new()
            .name(format!("passenger-{}", id.0))
            .spawn(move || passenger.run())?;
        self.next_passenger += 1;
        self.passengers.push((id, handle));
        Ok(id)
    }

    /// Spawn a passenger on a random free cell headed for a random ground
    /// cell.  Picks depend only on the seed and the passenger id.
    pub fn spawn_random_passenger(&mut self) -> SimResult<PassengerId> {
        let mut rng = AgentRng::new(self.net.config.seed, PassengerId(self.next_passenger));
        let origin = *rng.choose(&self.spawn_cells).ok_or(SimError::NoWalkableCells)?;
        let destination = *rng.choose(&self.destination_cells).ok_or(SimError::NoWalkableCells)?;
        self.spawn_passenger(origin, destination)
    }

    /// Block until every spawned passenger has finished its journey.
    ///
    /// All passenger threads are joined even if one fails; the first error
    /// is returned.
    pub fn join_passengers(&mut self) -> SimResult<Vec<JourneyReport>> {
        let mut reports = Vec::with_capacity(self.passengers.len());
        let mut first_err = None;
        for (id, handle) in self.passengers.drain(..) {
            match handle.join() {
                Ok(Ok(report)) => reports.push(report),
                Ok(Err(e)) => {
                    first_err.get_or_insert(e);
                }
                Err(_) => {
                    first_err.get_or_insert(SimError::ThreadPanic(format!("passenger-{}", id.0)));
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(reports),
        }
    }

    /// Cancel the run, release every blocked thread, and join them all.
    ///
    /// Returns the reports of passengers still travelling at shutdown; their
    /// outcome is [`Outcome::Cancelled`](crate::Outcome::Cancelled) unless
    /// they finished first.
    pub fn shutdown(mut self) -> SimResult<Vec<JourneyReport>> {
        self.net.close_all();
        let reports = self.join_passengers();

        let mut first_err = None;
        for service in mem::take(&mut self.services) {
            match service.handle.join() {
                Ok(Ok(())) | Ok(Err(MonitorError::Closed)) => {}
                Err(_) => {
                    first_err.get_or_insert(SimError::ThreadPanic(service.name));
                }
            }
        }
        debug!("metro stopped");

        let reports = reports?;
        match first_err {
            Some(e) => Err(e),
            None => Ok(reports),
        }
    }
}

impl Drop for MetroHandle {
    fn drop(&mut self) {
        self.net.close_all();
    }
}
