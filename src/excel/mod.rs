//! Excel import/export for the reaction planner
//!
//! - Import: Recipes sheet (.xlsx/.xls/.ods) → Grid
//! - Export: reaction table → Excel (.xlsx)

mod exporter;
mod importer;

pub use exporter::{TableExporter, TABLE_SHEET};
pub use importer::{range_to_grid, RecipeImporter, DEFAULT_SHEET};
