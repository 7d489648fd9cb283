//! Track geometry: turn a set of track cells into the cyclic move sequence a
//! train repeats forever.
//!
//! # Shapes
//!
//! The union of track and station cells must form one 4-connected chain in
//! which no cell has more than two neighbours.  Two shapes are accepted:
//!
//! - **Loop**: every cell has exactly two neighbours.  The route is the loop
//!   traversal starting at `start`.
//! - **Line**: exactly two end cells.  The route is a shuttle: out to the far
//!   end and back again, so end cells appear once per cycle and every inner
//!   cell twice.
//!
//! The route is rotated so that index 0 is `start`.  Anything else is a
//! configuration error reported before any train moves.

use std::collections::{BTreeSet, HashSet, VecDeque};

use mt_core::Cell;

use crate::{TrackError, TrackResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// Whether the track closes on itself or is traversed back and forth.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RouteShape {
    Loop,
    Line,
}

/// The cyclic route of one track.
///
/// `cells()[i]` is where a train stands at cycle position `i`; its next move
/// leads to `cells()[(i + 1) % len]`.  Immutable after construction.
#[derive(Clone, Debug)]
pub struct Route {
    cells:    Vec<Cell>,
    stations: Vec<Cell>,
    shape:    RouteShape,
}

impl Route {
    /// Number of moves in one full cycle.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: construction rejects tracks shorter than two cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn shape(&self) -> RouteShape {
        self.shape
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cell at cycle position `index` (wraps).
    #[inline]
    pub fn cell_at(&self, index: usize) -> Cell {
        self.cells[index % self.cells.len()]
    }

    /// Cycle position following `index`.
    #[inline]
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.cells.len()
    }

    /// Station cells in the order a train starting at index 0 reaches them.
    pub fn stations(&self) -> &[Cell] {
        &self.stations
    }

    /// Starting index for the `k`-th of `n` trains sharing this route,
    /// spacing them evenly along the cycle.
    pub fn spaced_start(&self, k: u32, n: u32) -> usize {
        if n == 0 {
            return 0;
        }
        (self.len() * k as usize) / n as usize
    }
}

// ── build_route ───────────────────────────────────────────────────────────────

/// Derive the cyclic route for one track.
///
/// `track_cells` and `station_cells` together make up the track; stations are
/// ordinary track cells where trains stop.  Duplicates are ignored.
pub fn build_route(track_cells: &[Cell], station_cells: &[Cell], start: Cell) -> TrackResult<Route> {
    let cells: BTreeSet<Cell> = track_cells.iter().chain(station_cells).copied().collect();

    if cells.len() < 2 {
        return Err(TrackError::TooShort(cells.len()));
    }
    if !cells.contains(&start) {
        return Err(TrackError::StartNotOnTrack(start));
    }

    // ── Degree check ──────────────────────────────────────────────────────
    let mut ends = Vec::new();
    for &cell in &cells {
        match degree(&cells, cell) {
            0 => return Err(TrackError::Break(cell)),
            1 => ends.push(cell),
            2 => {}
            _ => return Err(TrackError::Branch(cell)),
        }
    }

    // ── Connectivity check ────────────────────────────────────────────────
    let reached = flood(&cells, start);
    if let Some(&missing) = cells.iter().find(|c| !reached.contains(c)) {
        return Err(TrackError::Break(missing));
    }

    // Connected, max degree 2, ≥ 2 cells → exactly 0 or 2 ends.
    let (mut cycle, shape) = match ends.as_slice() {
        [] => (walk(&cells, start), RouteShape::Loop),
        [from, _] => {
            let out = walk(&cells, *from);
            let back = out[1..out.len() - 1].iter().rev().copied();
            let cycle: Vec<Cell> = out.iter().copied().chain(back).collect();
            (cycle, RouteShape::Line)
        }
        _ => return Err(TrackError::Break(ends[0])),
    };

    let offset = cycle.iter().position(|&c| c == start).ok_or(TrackError::StartNotOnTrack(start))?;
    cycle.rotate_left(offset);

    for (i, &from) in cycle.iter().enumerate() {
        let to = cycle[(i + 1) % cycle.len()];
        if !from.is_adjacent(to) {
            return Err(TrackError::Break(to));
        }
    }

    let stops: BTreeSet<Cell> = station_cells.iter().copied().collect();
    let mut stations = Vec::with_capacity(stops.len());
    for &cell in &cycle {
        if stops.contains(&cell) && !stations.contains(&cell) {
            stations.push(cell);
        }
    }

    Ok(Route { cells: cycle, stations, shape })
}

// ── Internals ─────────────────────────────────────────────────────────────────

fn degree(cells: &BTreeSet<Cell>, cell: Cell) -> usize {
    cell.neighbors().iter().filter(|n| cells.contains(n)).count()
}

fn flood(cells: &BTreeSet<Cell>, start: Cell) -> HashSet<Cell> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        for n in cell.neighbors() {
            if cells.contains(&n) && seen.insert(n) {
                queue.push_back(n);
            }
        }
    }
    seen
}

/// Follow the chain from `from` until it ends or closes, visiting each cell
/// once.  At `from` the first neighbour in `Direction::ALL` order is taken (`Cell::neighbors`).
fn walk(cells: &BTreeSet<Cell>, from: Cell) -> Vec<Cell> {
    let mut path = vec![from];
    let mut prev: Option<Cell> = None;
    let mut cur = from;
    loop {
        let next = cur
            .neighbors()
            .into_iter()
            .find(|n| cells.contains(n) && Some(*n) != prev);
        match next {
            Some(n) if n != from && path.len() < cells.len() => {
                path.push(n);
                prev = Some(cur);
                cur = n;
            }
            _ => break,
        }
    }
    path
}
