//! Excel exporter implementation - reaction table → .xlsx

use crate::core::layout::field_names;
use crate::error::PlannerResult;
use crate::types::ReactionRecord;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

/// Worksheet name used for the reaction table
pub const TABLE_SHEET: &str = "Reactions";

/// Writes the reaction table as a single worksheet, one record per row
pub struct TableExporter<'a> {
    records: &'a [ReactionRecord],
}

impl<'a> TableExporter<'a> {
    pub fn new(records: &'a [ReactionRecord]) -> Self {
        Self { records }
    }

    /// Save the workbook. Missing values are left as blank cells.
    pub fn export(&self, output_path: &Path) -> PlannerResult<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(TABLE_SHEET)?;

        let header_format = Format::new().set_bold();
        for (col, name) in field_names().iter().enumerate() {
            worksheet.write_with_format(0, col as u16, *name, &header_format)?;
            worksheet.set_column_width(col as u16, (name.len() + 2) as f64)?;
        }
        worksheet.set_freeze_panes(1, 0)?;

        for (idx, record) in self.records.iter().enumerate() {
            let row = (idx + 1) as u32;

            if let Some(block) = &record.experiment_block {
                worksheet.write_string(row, 0, block)?;
            }
            worksheet.write_string(row, 1, &record.amine_name)?;

            // Column 7 is the aldehyde name; numeric fields fill the rest in order
            let numeric_columns = (2u16..7).chain(8u16..18);
            for (col, (_, value)) in numeric_columns.zip(record.numeric_fields()) {
                if let Some(value) = value {
                    worksheet.write_number(row, col, value)?;
                }
            }
            worksheet.write_string(row, 7, &record.aldehyde_name)?;
        }

        workbook.save(output_path)?;
        Ok(())
    }
}
