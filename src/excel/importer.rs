//! Excel importer implementation - workbook sheet → Grid

use crate::error::{PlannerError, PlannerResult};
use crate::grid::Grid;
use crate::types::Cell;
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Sheet the reaction planner keeps its recipes on
pub const DEFAULT_SHEET: &str = "Recipes";

/// Reads one sheet of a reaction planner workbook into memory
pub struct RecipeImporter {
    path: PathBuf,
    sheet: String,
}

impl RecipeImporter {
    /// Create an importer for the default `Recipes` sheet
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            sheet: DEFAULT_SHEET.to_string(),
        }
    }

    /// Read a different sheet
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = sheet.into();
        self
    }

    /// Names of all sheets in the workbook
    pub fn sheet_names(&self) -> PlannerResult<Vec<String>> {
        let workbook = self.open()?;
        Ok(workbook.sheet_names())
    }

    /// Read the configured sheet as a grid anchored at `A1`
    pub fn import(&self) -> PlannerResult<Grid> {
        let mut workbook = self.open()?;

        let available = workbook.sheet_names();
        if !available.iter().any(|name| name == &self.sheet) {
            return Err(PlannerError::SheetNotFound {
                sheet: self.sheet.clone(),
                available,
            });
        }

        let range = workbook.worksheet_range(&self.sheet).map_err(|e| {
            PlannerError::Workbook(format!("Failed to read sheet '{}': {}", self.sheet, e))
        })?;

        let grid = range_to_grid(&range);
        debug!(
            sheet = %self.sheet,
            rows = grid.row_count(),
            cols = grid.col_count(),
            "sheet loaded"
        );
        Ok(grid)
    }

    fn open(&self) -> PlannerResult<calamine::Sheets<std::io::BufReader<std::fs::File>>> {
        if !self.path.exists() {
            return Err(PlannerError::WorkbookNotFound(self.path.clone()));
        }
        open_workbook_auto(&self.path).map_err(|e| {
            PlannerError::Workbook(format!(
                "Failed to open workbook {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

/// Copy a calamine range into a grid addressed from the sheet origin
pub fn range_to_grid(range: &Range<Data>) -> Grid {
    let (start, end) = match (range.start(), range.end()) {
        (Some(start), Some(end)) => (start, end),
        _ => return Grid::default(),
    };

    let mut grid = Grid::with_size(end.0 as usize + 1, end.1 as usize + 1);
    for (row, col, value) in range.cells() {
        let cell = convert_cell(value);
        if cell != Cell::Empty {
            grid.set(start.0 as usize + row, start.1 as usize + col, cell);
        }
    }
    grid
}

/// Convert a calamine cell to the extractor's cell model
fn convert_cell(value: &Data) -> Cell {
    match value {
        Data::Empty => Cell::Empty,
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Other(other.to_string()),
    }
}
