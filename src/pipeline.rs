//! Workbook → reaction table → SI document

use crate::core::{BlockExtractor, ExtractionReport, Layout};
use crate::error::PlannerResult;
use crate::excel::{RecipeImporter, DEFAULT_SHEET};
use crate::si::{SiGenerator, SiOptions, SiSummary};
use crate::writer::write_table;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File names the pipeline writes into its output directory
pub const TABLE_FILE: &str = "extracted_reaction_data.csv";
pub const SI_FILE: &str = "SI_Stock_Solutions.docx";

/// Extraction settings
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub sheet: String,
    pub layout: Layout,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            sheet: DEFAULT_SHEET.to_string(),
            layout: Layout::RECIPES,
        }
    }
}

/// Read the recipe sheet of `workbook` and extract its reactions
pub fn extract_workbook(workbook: &Path, options: &ExtractOptions) -> PlannerResult<ExtractionReport> {
    let grid = RecipeImporter::new(workbook)
        .with_sheet(options.sheet.clone())
        .import()?;

    let report = BlockExtractor::new(options.layout).extract(&grid);
    info!(
        workbook = %workbook.display(),
        columns = report.qualifying_columns(),
        reactions = report.records.len(),
        "extraction finished"
    );
    Ok(report)
}

/// Outcome of a full pipeline run
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Table and SI document were written
    Written {
        table: PathBuf,
        document: PathBuf,
        reactions: usize,
        si: SiSummary,
    },
    /// The sheet held no reactions; nothing was written
    Empty,
}

/// Extract, write the table and generate the SI document into `out_dir`.
///
/// The document is rendered before anything touches the disk, and the table
/// is removed again if saving the document fails, so an error leaves no
/// partial output behind.
pub fn run(
    workbook: &Path,
    out_dir: &Path,
    extract: &ExtractOptions,
    si: SiOptions,
) -> PlannerResult<PipelineOutcome> {
    let report = extract_workbook(workbook, extract)?;
    if report.is_empty() {
        warn!(workbook = %workbook.display(), "no reactions found, nothing written");
        return Ok(PipelineOutcome::Empty);
    }

    let (doc, summary) = SiGenerator::new(si).build(&report.records)?;

    std::fs::create_dir_all(out_dir)?;
    let table = out_dir.join(TABLE_FILE);
    let document = out_dir.join(SI_FILE);

    write_table(&table, &report.records)?;
    if let Err(e) = doc.save(&document) {
        if let Err(cleanup) = std::fs::remove_file(&table) {
            warn!(table = %table.display(), error = %cleanup, "could not remove table after failed run");
        }
        return Err(e);
    }
    info!(
        table = %table.display(),
        document = %document.display(),
        blocks = summary.blocks,
        "pipeline outputs written"
    );

    Ok(PipelineOutcome::Written {
        table,
        document,
        reactions: report.records.len(),
        si: summary,
    })
}
