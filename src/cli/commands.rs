use crate::core::{BlockExtractor, ColumnScan, ColumnVerdict};
use crate::error::PlannerResult;
use crate::excel::RecipeImporter;
use crate::pipeline::{self, ExtractOptions, PipelineOutcome};
use crate::si::{SiGenerator, SiOptions, SiSummary};
use crate::writer::{read_table, write_table};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Execute the extract command
pub fn extract(input: PathBuf, output: PathBuf, sheet: String, verbose: bool) -> PlannerResult<()> {
    println!("{}", "🧪 rxplan - Extracting reactions".bold().green());
    println!("   Workbook: {}", input.display());
    println!("   Sheet:    {}", sheet);
    println!("   Output:   {}\n", output.display());

    let options = ExtractOptions {
        sheet,
        ..Default::default()
    };
    let report = pipeline::extract_workbook(&input, &options)?;

    if verbose {
        print_columns(&report.columns);
    }

    if report.is_empty() {
        println!(
            "{}",
            "⚠️  No reactions were extracted. Check the sheet structure.".yellow()
        );
        println!("   Nothing written to {}", output.display());
        return Ok(());
    }

    write_table(&output, &report.records)?;

    println!("{}", "✅ Extraction Complete!".bold().green());
    println!(
        "   {} reactions from {} amine columns → {}\n",
        report.records.len().to_string().bold(),
        report.qualifying_columns(),
        output.display()
    );
    Ok(())
}

/// Execute the si command
pub fn si(input: PathBuf, output: PathBuf, options: SiOptions, verbose: bool) -> PlannerResult<()> {
    println!("{}", "🧪 rxplan - Supporting Information".bold().green());
    println!("   Table:  {}", input.display());
    println!("   Output: {}\n", output.display());

    if verbose {
        println!("{}", "📖 Reading reaction table...".cyan());
    }
    let records = read_table(&input)?;
    if verbose {
        println!("   Found {} reactions\n", records.len());
    }

    if records.is_empty() {
        println!("{}", "⚠️  Reaction table is empty, no document written.".yellow());
        return Ok(());
    }

    let summary = SiGenerator::new(options).generate(&records, &output)?;
    print_si_summary(&summary, &output);
    Ok(())
}

/// Execute the run command (extract + si)
pub fn run(
    input: PathBuf,
    out_dir: PathBuf,
    sheet: String,
    options: SiOptions,
) -> PlannerResult<()> {
    println!("{}", "🧪 rxplan - Full pipeline".bold().green());
    println!("   Workbook: {}", input.display());
    println!("   Out dir:  {}\n", out_dir.display());

    let extract = ExtractOptions {
        sheet,
        ..Default::default()
    };
    match pipeline::run(&input, &out_dir, &extract, options)? {
        PipelineOutcome::Empty => {
            println!(
                "{}",
                "⚠️  No reactions were extracted. Check the sheet structure.".yellow()
            );
        }
        PipelineOutcome::Written {
            table,
            document,
            reactions,
            si,
        } => {
            println!("{}", "✅ Extraction Complete!".bold().green());
            println!("   {} reactions → {}\n", reactions.to_string().bold(), table.display());
            print_si_summary(&si, &document);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct InspectReport {
    workbook: String,
    sheet: String,
    sheets: Vec<String>,
    rows: usize,
    columns: usize,
    reactions: usize,
    scan: Vec<ColumnScan>,
}

/// Execute the inspect command - show how the sheet is read
pub fn inspect(input: PathBuf, sheet: String, json: bool) -> PlannerResult<()> {
    let importer = RecipeImporter::new(&input).with_sheet(sheet.clone());
    let sheets = importer.sheet_names()?;
    let grid = importer.import()?;
    let report = BlockExtractor::default().extract(&grid);

    let inspect = InspectReport {
        workbook: input.display().to_string(),
        sheet,
        sheets,
        rows: grid.row_count(),
        columns: grid.col_count(),
        reactions: report.records.len(),
        scan: report.columns,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&inspect)?);
        return Ok(());
    }

    println!("{}", "🔍 rxplan - Inspect".bold().green());
    println!("   Workbook: {}", inspect.workbook);
    println!("   Sheets:   {}", inspect.sheets.join(", "));
    println!(
        "   Sheet '{}': {} rows × {} columns\n",
        inspect.sheet.bright_blue(),
        inspect.rows,
        inspect.columns
    );
    print_columns(&inspect.scan);
    println!("   Reactions: {}", inspect.reactions.to_string().bold());
    Ok(())
}

fn print_columns(columns: &[ColumnScan]) {
    println!("{}", "📋 Columns:".bold().cyan());
    for scan in columns {
        let block = scan.block.as_deref().unwrap_or("-");
        let line = format!(
            "   {:>4}  {:<10} {:<30} {:<16} {}",
            column_letter(scan.column),
            block,
            truncate(&scan.amine, 30),
            scan.verdict.describe(),
            scan.strides
        );
        if scan.verdict == ColumnVerdict::Qualified {
            println!("{}", line);
        } else {
            println!("{}", line.dimmed());
        }
    }
    println!();
}

fn print_si_summary(summary: &SiSummary, output: &Path) {
    println!("{}", "✅ SI Document Complete!".bold().green());
    println!("   Blocks:    {}", summary.blocks);
    println!("   Amines:    {}", summary.amines);
    println!("   Aldehydes: {}", summary.aldehydes);
    println!("   Reactions: {}", summary.reactions);
    if summary.spectra_embedded + summary.spectra_missing > 0 {
        println!(
            "   Spectra:   {} embedded, {} not found",
            summary.spectra_embedded, summary.spectra_missing
        );
    }
    if summary.unassigned > 0 {
        println!(
            "   {}",
            format!("⚠️  {} reactions without a block were left out", summary.unassigned).yellow()
        );
    }
    println!("   Document:  {}\n", output.display());
}

/// Convert column index to Excel column letter (0→A, 1→B, 25→Z, 26→AA, etc.)
fn column_letter(n: usize) -> String {
    let mut result = String::new();
    let mut num = n;

    loop {
        let remainder = num % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if num < 26 {
            break;
        }
        num = num / 26 - 1;
    }

    result
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(1), "B");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(52), "BA");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Aniline", 30), "Aniline");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }

    #[test]
    fn test_extract_missing_workbook_fails() {
        let result = extract(
            PathBuf::from("no/such/planner.xlsx"),
            PathBuf::from("out.csv"),
            "Recipes".to_string(),
            false,
        );
        assert!(result.is_err());
    }
}
