//! Terminal line representation
//!
//! A line is one row of cells plus the metadata the screen tracks per row:
//! whether it soft-wrapped into the next row and its DEC line size.

use serde::{Deserialize, Serialize};

use super::cell::{Cell, Color};

/// DECDHL / DECDWL / DECSWL line size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineSize {
    #[default]
    Single,
    DoubleWidth,
    DoubleHeightTop,
    DoubleHeightBottom,
}

/// A row of cells in the terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    cells: Vec<Cell>,
    /// Set when writing overflowed this line and continued onto the next one
    wrapped: bool,
    size: LineSize,
}

impl Line {
    /// Create a blank line with default colors
    pub fn new(cols: usize) -> Self {
        Self::blank(cols, Color::Default, Color::Default)
    }

    /// Create a blank line painted with the given erase colors
    pub fn blank(cols: usize, fg: Color, bg: Color) -> Self {
        Self {
            cells: vec![Cell::erased(fg, bg); cols],
            wrapped: false,
            size: LineSize::Single,
        }
    }

    pub fn from_cells(cells: Vec<Cell>, wrapped: bool) -> Self {
        Self {
            cells,
            wrapped,
            size: LineSize::Single,
        }
    }

    /// Get the number of columns in this line
    pub fn cols(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, col: usize) -> Option<&Cell> {
        self.cells.get(col)
    }

    pub fn cell_mut(&mut self, col: usize) -> Option<&mut Cell> {
        self.cells.get_mut(col)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn is_wrapped(&self) -> bool {
        self.wrapped
    }

    pub fn set_wrapped(&mut self, wrapped: bool) {
        self.wrapped = wrapped;
    }

    pub fn size(&self) -> LineSize {
        self.size
    }

    pub fn set_size(&mut self, size: LineSize) {
        self.size = size;
    }

    /// Pad or truncate to a new width; no reflow
    pub fn resize(&mut self, cols: usize, fill: Cell) {
        self.cells.resize(cols, fill);
    }

    /// Replace every cell with `fill` and drop the line metadata
    pub fn reset(&mut self, fill: Cell) {
        self.cells.fill(fill);
        self.wrapped = false;
        self.size = LineSize::Single;
    }

    /// Erase cells in `[start, end)`, keeping protected cells and, when
    /// `selective`, unerasable ones
    pub fn erase(&mut self, start: usize, end: usize, fill: Cell, selective: bool) {
        let end = end.min(self.cells.len());
        if start >= end {
            return;
        }
        for cell in &mut self.cells[start..end] {
            if cell.is_erasable(selective) {
                *cell = fill;
            }
        }
    }

    /// Shift `[col, end)` right by one, dropping the cell at `end - 1`, and
    /// put `fill` at `col`
    pub fn insert_cell(&mut self, col: usize, end: usize, fill: Cell) {
        let end = end.min(self.cells.len());
        if col >= end {
            return;
        }
        self.cells[col..end].rotate_right(1);
        self.cells[col] = fill;
    }

    /// Shift `[col + 1, end)` left by one and put `fill` at `end - 1`
    pub fn delete_cell(&mut self, col: usize, end: usize, fill: Cell) {
        let end = end.min(self.cells.len());
        if col >= end {
            return;
        }
        self.cells[col..end].rotate_left(1);
        self.cells[end - 1] = fill;
    }

    /// Text of the line with trailing blanks removed
    pub fn text(&self) -> String {
        let s: String = self.cells.iter().map(|c| c.ch).collect();
        s.trim_end_matches(' ').to_string()
    }

    /// Check if every cell holds a blank
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_blank())
    }
}
