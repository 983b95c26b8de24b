//! Reaction table I/O
//!
//! The table is CSV or a single-sheet .xlsx workbook: one header row with the
//! schema's field names, one row per reaction, missing values as empty cells.

use crate::core::layout::field_names;
use crate::error::{PlannerError, PlannerResult};
use crate::excel::{RecipeImporter, TableExporter, TABLE_SHEET};
use crate::types::ReactionRecord;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Format of the reaction table, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Xlsx,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().map(|e| e.to_string_lossy().to_lowercase()) {
            Some(ext) if ext == "xlsx" => TableFormat::Xlsx,
            _ => TableFormat::Csv,
        }
    }
}

/// Write the table to `path` in the format its extension asks for
pub fn write_table(path: &Path, records: &[ReactionRecord]) -> PlannerResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    match TableFormat::from_path(path) {
        TableFormat::Xlsx => TableExporter::new(records).export(path),
        TableFormat::Csv => {
            let file = File::create(path)?;
            write_csv(file, records)
        }
    }
}

/// Write the table as CSV, header first
pub fn write_csv<W: Write>(writer: W, records: &[ReactionRecord]) -> PlannerResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(field_names())?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Read a reaction table written by [`write_table`] (or any table with the
/// same header), CSV or .xlsx by extension. Empty fields and `nan` read back
/// as missing.
pub fn read_table(path: &Path) -> PlannerResult<Vec<ReactionRecord>> {
    match TableFormat::from_path(path) {
        TableFormat::Xlsx => read_xlsx(path),
        TableFormat::Csv => {
            let file = File::open(path)?;
            read_csv(file)
        }
    }
}

pub fn read_csv<R: Read>(reader: R) -> PlannerResult<Vec<ReactionRecord>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    check_columns(&headers)?;

    let mut records = Vec::new();
    for result in csv_reader.deserialize() {
        let record: ReactionRecord = result?;
        records.push(record);
    }
    Ok(records)
}

/// Read the `Reactions` sheet of a table workbook written by [`write_table`]
fn read_xlsx(path: &Path) -> PlannerResult<Vec<ReactionRecord>> {
    let grid = RecipeImporter::new(path).with_sheet(TABLE_SHEET).import()?;

    let headers = csv::StringRecord::from(grid.row(0).map(|c| c.as_text()).collect::<Vec<_>>());
    check_columns(&headers)?;

    let mut records = Vec::new();
    for row in 1..grid.row_count() {
        if grid.row(row).all(|cell| cell.is_blank()) {
            continue;
        }
        let fields = csv::StringRecord::from(grid.row(row).map(|c| c.as_text()).collect::<Vec<_>>());
        let record: ReactionRecord = fields.deserialize(Some(&headers))?;
        records.push(record);
    }
    Ok(records)
}

fn check_columns(headers: &csv::StringRecord) -> PlannerResult<()> {
    let missing: Vec<&str> = field_names()
        .into_iter()
        .filter(|name| !headers.iter().any(|h| h == *name))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PlannerError::Validation(format!(
            "Reaction table is missing columns: {}",
            missing.join(", ")
        )))
    }
}
