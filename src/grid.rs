//! In-memory sheet grid
//!
//! The grid is addressed from the sheet origin (`A1` is `(0, 0)`), so row and
//! column indices match the fixed Recipes layout even when the used range of
//! the sheet starts further down or right.

use crate::types::Cell;

static EMPTY: Cell = Cell::Empty;

/// Rectangular, row-major cell grid
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid of blank cells
    pub fn with_size(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    /// Build a grid from ragged rows; short rows are padded with blanks
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut grid = Self::with_size(rows.len(), cols);
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                grid.set(r, c, cell);
            }
        }
        grid
    }

    /// Overwrite one cell. Writes outside the grid are ignored.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = cell;
        }
    }

    /// Cell at `(row, col)`; anything outside the grid reads as blank
    pub fn get(&self, row: usize, col: usize) -> &Cell {
        if row < self.rows && col < self.cols {
            &self.cells[row * self.cols + col]
        } else {
            &EMPTY
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn col_count(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: usize) -> impl Iterator<Item = &Cell> + '_ {
        (0..self.cols).map(move |col| self.get(row, col))
    }

    /// Forward-filled text of `row`, one entry per column
    pub fn filled_row(&self, row: usize) -> Vec<Option<String>> {
        forward_fill(self.row(row).map(|cell| {
            if cell.is_blank() {
                None
            } else {
                Some(cell.as_text())
            }
        }))
    }
}

/// Carry the last present value over gaps, left to right.
///
/// Leading gaps stay empty: there is nothing to carry yet.
pub fn forward_fill<T, I>(values: I) -> Vec<Option<T>>
where
    T: Clone,
    I: IntoIterator<Item = Option<T>>,
{
    values
        .into_iter()
        .scan(None, |last: &mut Option<T>, value| {
            if value.is_some() {
                *last = value;
            }
            Some(last.clone())
        })
        .collect()
}
