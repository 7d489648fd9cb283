//! The character map every track, station, and walking cell is read from.
//!
//! ```text
//! GGGGg
//! G   G      'G' track cells, 'g' station cells of track G,
//! gGGGG      ' ' walkable ground, 'X' a walkable destination mark
//! ```
//!
//! Ragged lines are padded with `' '` to the widest row.

use mt_core::Cell;

/// Walkable ground.
pub const GROUND: char = ' ';

/// Destination marker; walkable and a valid spawn cell.
pub const DESTINATION: char = 'X';

/// A rectangular grid of map characters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolGrid {
    rows:  usize,
    cols:  usize,
    cells: Vec<char>,
}

impl SymbolGrid {
    /// Parse a multi-line string.  Trailing `\r` is ignored so Windows line
    /// endings parse identically.
    pub fn parse(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
        let rows = lines.len();
        let cols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        let mut cells = Vec::with_capacity(rows * cols);
        for line in &lines {
            let width = line.chars().count();
            cells.extend(line.chars());
            cells.extend(std::iter::repeat_n(GROUND, cols - width));
        }
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `true` if `cell` lies inside the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row >= 0
            && cell.col >= 0
            && (cell.row as usize) < self.rows
            && (cell.col as usize) < self.cols
    }

    /// The character at `cell`, or `None` outside the grid.
    pub fn get(&self, cell: Cell) -> Option<char> {
        if !self.contains(cell) {
            return None;
        }
        Some(self.cells[cell.row as usize * self.cols + cell.col as usize])
    }

    /// All cells holding `symbol`, in row-major order.
    pub fn positions(&self, symbol: char) -> Vec<Cell> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == symbol)
            .map(|(i, _)| Cell::new((i / self.cols) as i32, (i % self.cols) as i32))
            .collect()
    }

    /// Cells passengers may spawn on: ground and destination marks.
    pub fn spawn_cells(&self) -> Vec<Cell> {
        let mut cells = self.positions(GROUND);
        cells.extend(self.positions(DESTINATION));
        cells
    }

    /// Cells passengers may pick as a final destination: bare ground.
    pub fn destination_cells(&self) -> Vec<Cell> {
        self.positions(GROUND)
    }
}
