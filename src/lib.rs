//! rxplan - reaction planner extractor
//!
//! Reads the fixed-layout `Recipes` sheet of a reaction planner workbook
//! (amines across the columns, 15-row aldehyde strides down each column),
//! flattens it into a reaction table and renders Supporting Information
//! documents from that table.
//!
//! # Features
//!
//! - Layout-driven extraction with forward-filled experiment blocks
//! - Missing or unparsable numbers kept as explicit `None`, never zero
//! - CSV or Excel (.xlsx) reaction table
//! - Word (.docx) SI with stock-solution recipes, volumes and NMR spectra
//!
//! # Example
//!
//! ```no_run
//! use rxplan::pipeline::{extract_workbook, ExtractOptions};
//! use rxplan::writer::write_table;
//! use std::path::Path;
//!
//! let report = extract_workbook(Path::new("planner.xlsx"), &ExtractOptions::default())?;
//! if !report.is_empty() {
//!     write_table(Path::new("reactions.csv"), &report.records)?;
//! }
//! # Ok::<(), rxplan::error::PlannerError>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod grid;
pub mod pipeline;
pub mod si;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use error::{PlannerError, PlannerResult};
pub use grid::Grid;
pub use types::{AldehydeRecord, AmineRecord, Cell, ReactionRecord};
