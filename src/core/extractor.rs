//! Block extractor - Recipes grid → reaction table
//!
//! Walks the data columns left to right. Each qualifying column yields one
//! amine record, joined with every qualifying aldehyde stride below it.

use crate::core::layout::{is_header_row, is_solvent_column, Layout, MISSING_SENTINEL};
use crate::grid::Grid;
use crate::types::{AldehydeRecord, AmineRecord, ReactionRecord};
use serde::Serialize;
use tracing::debug;

/// Why a column did or did not contribute records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnVerdict {
    Qualified,
    BlankName,
    SolventMarker,
    MissingSentinel,
}

impl ColumnVerdict {
    pub fn describe(&self) -> &'static str {
        match self {
            ColumnVerdict::Qualified => "amine",
            ColumnVerdict::BlankName => "blank",
            ColumnVerdict::SolventMarker => "solvent/control",
            ColumnVerdict::MissingSentinel => "missing",
        }
    }
}

/// Scan result for a single column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnScan {
    pub column: usize,
    pub block: Option<String>,
    pub amine: String,
    pub verdict: ColumnVerdict,
    /// Qualifying aldehyde strides (always 0 for skipped columns)
    pub strides: usize,
}

/// Everything one extraction pass produced
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractionReport {
    pub records: Vec<ReactionRecord>,
    pub columns: Vec<ColumnScan>,
}

impl ExtractionReport {
    /// True when the sheet was read but held no reactions
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn qualifying_columns(&self) -> usize {
        self.columns
            .iter()
            .filter(|c| c.verdict == ColumnVerdict::Qualified)
            .count()
    }

    pub fn into_records(self) -> Vec<ReactionRecord> {
        self.records
    }
}

/// Layout-driven extractor for the Recipes sheet
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockExtractor {
    layout: Layout,
}

impl BlockExtractor {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Extract every (amine, aldehyde) pair present in `grid`
    pub fn extract(&self, grid: &Grid) -> ExtractionReport {
        let blocks = grid.filled_row(self.layout.amine.block);
        let mut report = ExtractionReport::default();

        for col in self.layout.first_column..grid.col_count() {
            let block = blocks.get(col).cloned().flatten();
            let name_cell = grid.get(self.layout.amine.name, col);
            let amine_name = name_cell.as_text();

            let verdict = if name_cell.is_blank() {
                ColumnVerdict::BlankName
            } else if is_solvent_column(&amine_name) {
                ColumnVerdict::SolventMarker
            } else if amine_name == MISSING_SENTINEL {
                ColumnVerdict::MissingSentinel
            } else {
                ColumnVerdict::Qualified
            };

            if verdict != ColumnVerdict::Qualified {
                debug!(column = col, name = %amine_name, reason = verdict.describe(), "skipping column");
                report.columns.push(ColumnScan {
                    column: col,
                    block,
                    amine: amine_name,
                    verdict,
                    strides: 0,
                });
                continue;
            }

            let amine = self.read_amine(grid, col, block.clone(), amine_name.clone());
            let before = report.records.len();
            for aldehyde in self.read_aldehydes(grid, col) {
                report.records.push(ReactionRecord::join(&amine, aldehyde));
            }

            report.columns.push(ColumnScan {
                column: col,
                block,
                amine: amine_name,
                verdict,
                strides: report.records.len() - before,
            });
        }

        report
    }

    fn read_amine(
        &self,
        grid: &Grid,
        col: usize,
        experiment_block: Option<String>,
        name: String,
    ) -> AmineRecord {
        let rows = &self.layout.amine;
        let number = |row: usize| grid.get(row, col).to_number();

        AmineRecord {
            experiment_block,
            name,
            mw_g_mol: number(rows.mw),
            actual_mass_g: number(rows.actual_mass),
            actual_conc_mm: number(rows.actual_conc),
            hmdso_mass_mg: number(rows.hmdso_mass),
            hmdso_conc_mm: number(rows.hmdso_conc),
        }
    }

    /// Qualifying strides of one column, top to bottom
    fn read_aldehydes(&self, grid: &Grid, col: usize) -> Vec<AldehydeRecord> {
        let mut aldehydes = Vec::new();

        for index in 0..self.layout.max_strides {
            let base = self.layout.stride_row(index);
            if base >= grid.row_count() {
                break;
            }

            let offsets = &self.layout.aldehyde;
            let name_cell = grid.get(base + offsets.name, col);
            let name = name_cell.as_text();
            if name_cell.is_blank() || is_header_row(&name) {
                debug!(column = col, row = base, "skipping stride");
                continue;
            }

            let number = |offset: usize| grid.get(base + offset, col).to_number();
            aldehydes.push(AldehydeRecord {
                name,
                mw_g_mol: number(offsets.mw),
                actual_mass_mg: number(offsets.actual_mass),
                vol_required_ul: number(offsets.vol_required),
                actual_conc_mm: number(offsets.actual_conc),
                vol_amine_sol_ul: number(offsets.vol_amine_sol),
                amount_amine_mmol: number(offsets.amount_amine),
                vol_aldehyde_sol_ul: number(offsets.vol_aldehyde_sol),
                total_volume_ul: number(offsets.total_volume),
                amount_aldehyde_mmol: number(offsets.amount_aldehyde),
                amount_hmdso_mmol: number(offsets.amount_hmdso),
            });
        }

        aldehydes
    }
}

/// Extract with the Recipes layout
pub fn extract_reactions(grid: &Grid) -> ExtractionReport {
    BlockExtractor::default().extract(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn planner(rows: usize, cols: usize) -> Grid {
        let mut grid = Grid::with_size(rows, cols);
        grid.set(0, 0, text("Experiment Block #"));
        grid.set(1, 0, text("Amine"));
        grid
    }

    #[test]
    fn test_single_reaction() {
        let mut grid = planner(28, 2);
        grid.set(0, 1, Cell::Number(1.0));
        grid.set(1, 1, text("Benzylamine"));
        grid.set(3, 1, Cell::Number(107.15));
        grid.set(13, 1, text("Benzaldehyde"));
        grid.set(15, 1, Cell::Number(106.12));
        grid.set(27, 1, Cell::Number(0.25));

        let report = extract_reactions(&grid);
        assert_eq!(report.records.len(), 1);
        let record = &report.records[0];
        assert_eq!(record.experiment_block.as_deref(), Some("1"));
        assert_eq!(record.amine_name, "Benzylamine");
        assert_eq!(record.amine_mw_g_mol, Some(107.15));
        assert_eq!(record.aldehyde_name, "Benzaldehyde");
        assert_eq!(record.aldehyde_mw_g_mol, Some(106.12));
        assert_eq!(record.amount_hmdso_mmol, Some(0.25));
        assert_eq!(record.actual_mass_amine_g, None);
    }

    #[test]
    fn test_header_stride_skipped() {
        let mut grid = planner(43, 2);
        grid.set(1, 1, text("Aniline"));
        grid.set(13, 1, text("Molecular wt (g/mol)"));
        grid.set(28, 1, text("Anisaldehyde"));

        let report = extract_reactions(&grid);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].aldehyde_name, "Anisaldehyde");
        assert_eq!(report.columns[0].strides, 1);
    }

    #[test]
    fn test_column_verdicts() {
        let mut grid = planner(14, 5);
        grid.set(1, 1, text("MeCN"));
        grid.set(1, 2, text("nan"));
        grid.set(1, 4, text("Aniline"));

        let report = extract_reactions(&grid);
        let verdicts: Vec<ColumnVerdict> = report.columns.iter().map(|c| c.verdict).collect();
        assert_eq!(
            verdicts,
            vec![
                ColumnVerdict::SolventMarker,
                ColumnVerdict::MissingSentinel,
                ColumnVerdict::BlankName,
                ColumnVerdict::Qualified,
            ]
        );
        assert!(report.is_empty());
        assert_eq!(report.qualifying_columns(), 1);
    }

    #[test]
    fn test_stride_fields_past_grid_end_are_missing() {
        let mut grid = planner(16, 2);
        grid.set(1, 1, text("Aniline"));
        grid.set(13, 1, text("Benzaldehyde"));
        grid.set(15, 1, Cell::Number(106.12));

        let report = extract_reactions(&grid);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].aldehyde_mw_g_mol, Some(106.12));
        assert_eq!(report.records[0].amount_hmdso_mmol, None);
    }

    #[test]
    fn test_numeric_aldehyde_name_uses_text_form() {
        let mut grid = planner(14, 2);
        grid.set(1, 1, text("Aniline"));
        grid.set(13, 1, Cell::Number(42.0));

        let report = extract_reactions(&grid);
        assert_eq!(report.records[0].aldehyde_name, "42");
    }
}
