//! Station registry and trip planning.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over station cells answers "nearest station to
//! this cell" queries.  Distances are squared Euclidean in integer grid
//! units, so comparisons are exact; ties resolve to the lowest `StationId`.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use mt_core::{Cell, StationId, TrackSymbol};

use crate::{TrackError, TrackResult};

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct SiteEntry {
    point: [i32; 2], // [row, col]
    slot:  usize,
}

impl RTreeObject for SiteEntry {
    type Envelope = AABB<[i32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for SiteEntry {
    fn distance_2(&self, point: &[i32; 2]) -> i32 {
        let dr = self.point[0] - point[0];
        let dc = self.point[1] - point[1];
        dr * dr + dc * dc
    }
}

// ── MetroMap ──────────────────────────────────────────────────────────────────

/// Where a station is and which track it serves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StationSite {
    pub id:    StationId,
    pub cell:  Cell,
    pub track: TrackSymbol,
}

/// A planned ride: board at one station, alight at another on the same track.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Trip {
    pub board:  StationSite,
    pub alight: StationSite,
}

impl Trip {
    /// `true` if boarding and alighting at the same station; no ride needed.
    pub fn is_walk_only(&self) -> bool {
        self.board.id == self.alight.id
    }
}

/// The information centre passengers consult to plan a trip.
pub struct MetroMap {
    sites: Vec<StationSite>,
    index: RTree<SiteEntry>,
}

impl MetroMap {
    /// Index `sites`; slots in the tree refer back into this list.
    pub fn new(sites: Vec<StationSite>) -> Self {
        let entries = sites
            .iter()
            .enumerate()
            .map(|(slot, s)| SiteEntry { point: [s.cell.row, s.cell.col], slot })
            .collect();
        Self { sites, index: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Closest station on any track.
    pub fn nearest_station(&self, cell: Cell) -> Option<&StationSite> {
        self.nearest_where(cell, |_| true)
    }

    /// Closest station on `track`.
    pub fn nearest_on_track(&self, cell: Cell, track: TrackSymbol) -> Option<&StationSite> {
        self.nearest_where(cell, |s| s.track == track)
    }

    /// Plan a trip from `start` to `destination`.
    ///
    /// The alighting station is the one nearest `destination` over every
    /// track; the boarding station is the one nearest `start` on that same
    /// track, so a single ride suffices.
    pub fn plan_trip(&self, start: Cell, destination: Cell) -> TrackResult<Trip> {
        let alight = *self.nearest_station(destination).ok_or(TrackError::NoStations)?;
        let board = *self
            .nearest_on_track(start, alight.track)
            .ok_or(TrackError::NoStations)?;
        Ok(Trip { board, alight })
    }

    fn nearest_where<F>(&self, cell: Cell, pred: F) -> Option<&StationSite>
    where
        F: Fn(&StationSite) -> bool,
    {
        let mut best: Option<(i32, &StationSite)> = None;
        for (entry, d2) in self.index.nearest_neighbor_iter_with_distance_2(&[cell.row, cell.col]) {
            let site = &self.sites[entry.slot];
            if !pred(site) {
                continue;
            }
            match best {
                Some((best_d2, _)) if d2 > best_d2 => break,
                Some((best_d2, cur)) if d2 == best_d2 && site.id >= cur.id => {}
                _ => best = Some((d2, site)),
            }
        }
        best.map(|(_, s)| s)
    }
}
