//! Fluent builder for constructing a [`Metro`].

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::debug;

use mt_core::{CancelToken, Cell, MetroConfig, StationId, TrackSymbol, TrainId};
use mt_rendezvous::{Station, Train};
use mt_track::{GreedyNavigator, MetroMap, Navigator, StationSite, SymbolGrid, TrackError, build_route};

use crate::metro::{Network, TrainPlacement};
use crate::{Metro, MetroObserver, NoopObserver, SimError, SimResult};

/// One track to lay on the map.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TrackSpec {
    /// Map character of plain track cells.  Also the track's symbol.
    pub track:   char,
    /// Map character of this track's station cells.
    pub station: char,
    /// Where the first train starts; must be a track or station cell.
    pub start:   Cell,
}

impl TrackSpec {
    pub fn new(track: char, station: char, start: Cell) -> Self {
        Self { track, station, start }
    }
}

/// Fluent builder for [`Metro`].
///
/// # Optional inputs (have defaults)
///
/// | Method           | Default            |
/// |------------------|--------------------|
/// | `.observer(o)`   | `NoopObserver`     |
/// | `.navigator(n)`  | `GreedyNavigator`  |
///
/// # Example
///
/// ```rust,ignore
/// let metro = MetroBuilder::new(grid, config)
///     .track(TrackSpec::new('G', 'g', Cell::new(1, 1)))
///     .track(TrackSpec::new('R', 'r', Cell::new(7, 2)))
///     .observer(journal.clone())
///     .build()?;
/// ```
pub struct MetroBuilder {
    grid:      SymbolGrid,
    config:    MetroConfig,
    tracks:    Vec<TrackSpec>,
    observer:  Option<Arc<dyn MetroObserver>>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl MetroBuilder {
    pub fn new(grid: SymbolGrid, config: MetroConfig) -> Self {
        Self {
            grid,
            config,
            tracks:    Vec::new(),
            observer:  None,
            navigator: None,
        }
    }

    /// Add a track.  Station and train ids follow declaration order.
    pub fn track(mut self, spec: TrackSpec) -> Self {
        self.tracks.push(spec);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn MetroObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Replace the passengers' walking heuristic.
    pub fn navigator(mut self, navigator: impl Navigator + 'static) -> Self {
        self.navigator = Some(Arc::new(navigator));
        self
    }

    /// Validate the config, trace every route, and create all stations and
    /// trains.  Any error here is a configuration error; no thread has been
    /// started yet.
    pub fn build(self) -> SimResult<Metro> {
        self.config.validate()?;
        if self.tracks.is_empty() {
            return Err(SimError::NoTracks);
        }

        let mut seen = BTreeSet::new();
        let mut stations: Vec<Arc<Station>> = Vec::new();
        let mut sites = Vec::new();
        let mut trains = Vec::new();

        for spec in &self.tracks {
            if !seen.insert(spec.track) {
                return Err(SimError::DuplicateTrack(spec.track));
            }
            let on_track = |source: TrackError| SimError::Track { symbol: spec.track, source };

            let symbol = TrackSymbol::new(spec.track).map_err(|e| on_track(e.into()))?;
            let route = build_route(
                &self.grid.positions(spec.track),
                &self.grid.positions(spec.station),
                spec.start,
            )
            .map_err(on_track)?;
            if route.stations().is_empty() {
                return Err(on_track(TrackError::NoStations));
            }
            let route = Arc::new(route);

            // ── Stations ──────────────────────────────────────────────────
            let mut by_cell: HashMap<Cell, Arc<Station>> = HashMap::new();
            for &cell in route.stations() {
                let id = StationId::try_from(stations.len()).map_err(|_| {
                    SimError::Config(mt_core::CoreError::Config("too many stations".into()))
                })?;
                let station = Arc::new(Station::new(id, cell, symbol, self.config.ticket_price));
                sites.push(StationSite { id, cell, track: symbol });
                by_cell.insert(cell, Arc::clone(&station));
                stations.push(station);
            }

            // ── Trains ────────────────────────────────────────────────────
            let stops: Vec<Option<Arc<Station>>> =
                route.cells().iter().map(|c| by_cell.get(c).cloned()).collect();
            let n = self.config.trains_per_track;
            for k in 0..n {
                let id = TrainId::try_from(trains.len()).map_err(|_| {
                    SimError::Config(mt_core::CoreError::Config("too many trains".into()))
                })?;
                let train = Train::new(id, symbol, Arc::clone(&route), self.config.fine_amount);
                trains.push(TrainPlacement {
                    train: Arc::new(train),
                    start: route.spaced_start(k, n),
                    stops: stops.clone(),
                });
            }

            debug!(
                track    = %symbol,
                shape    = ?route.shape(),
                cells    = route.len(),
                stations = route.stations().len(),
                trains   = n,
                "track laid"
            );
        }

        Ok(Metro {
            net: Network {
                config:    self.config,
                grid:      self.grid,
                map:       MetroMap::new(sites),
                stations,
                trains,
                observer:  self.observer.unwrap_or_else(|| Arc::new(NoopObserver)),
                navigator: self.navigator.unwrap_or_else(|| Arc::new(GreedyNavigator)),
                cancel:    CancelToken::new(),
            },
        })
    }
}
