use clap::{Parser, Subcommand};
use rxplan::cli;
use rxplan::si::{AmineMassUnit, SiOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rxplan")]
#[command(about = "Reaction planner extractor: Recipes sheet → reaction table → SI document")]
#[command(long_about = "rxplan - Reaction planner extractor

Reads the fixed-layout Recipes sheet of a reaction planner workbook
(amines across the columns, one 15-row aldehyde block per reaction
down each column) and flattens it into one row per amine × aldehyde.

COMMANDS:
  extract  - Workbook → reaction table (.csv or .xlsx)
  si       - Reaction table → Supporting Information (.docx)
  run      - extract + si into one output directory
  inspect  - Show how each column of the sheet is read

EXAMPLES:
  rxplan extract planner.xlsx -o data/output/extracted_reaction_data.csv
  rxplan si data/output/extracted_reaction_data.csv -o SI.docx --spectra-dir nmr/
  rxplan run planner.xlsx --out-dir data/output
  rxplan inspect planner.xlsx --json

Logging goes to stderr; set RUST_LOG (e.g. RUST_LOG=rxplan=debug) or use -v.")]
#[command(version)]
struct Cli {
    /// Debug logging (per skipped column and stride)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Extract the reaction table from a reaction planner workbook.

Columns whose amine name is blank, 'nan' or contains 'MeCN' are skipped, as
are aldehyde blocks whose name cell is blank or a repeated 'Molecular wt'
label. Numbers that cannot be read are written as empty fields.

If no reactions are found a warning is printed and no file is written.")]
    /// Extract the reaction table from a workbook
    Extract {
        /// Reaction planner workbook (.xlsx, .xlsm, .xls, .ods)
        input: PathBuf,

        /// Output table (.csv, or .xlsx for an Excel worksheet)
        #[arg(short, long, default_value = "extracted_reaction_data.csv")]
        output: PathBuf,

        /// Sheet holding the recipes
        #[arg(short, long, default_value = "Recipes", env = "RXPLAN_SHEET")]
        sheet: String,
    },

    #[command(long_about = "Generate the Supporting Information document.

One section per experiment block with stock-solution recipes for every
amine and aldehyde, a reaction-volume table and, with --spectra-dir, the
NMR spectrum of each reaction (image named {amine}_{aldehyde}.png/.jpg).

AMINE MASS UNIT:
  The planner's amine mass cell is labelled grams but is often filled in
  milligrams. 'mg' (default) uses the value as recorded; 'g' multiplies
  it by 1000.")]
    /// Generate the SI document from a reaction table
    Si {
        /// Reaction table written by 'extract' (.csv or .xlsx)
        input: PathBuf,

        /// Output Word document
        #[arg(short, long, default_value = "SI_Stock_Solutions.docx")]
        output: PathBuf,

        #[command(flatten)]
        si: SiArgs,
    },

    /// Extract and generate the SI document in one go
    Run {
        /// Reaction planner workbook
        input: PathBuf,

        /// Directory for extracted_reaction_data.csv and SI_Stock_Solutions.docx
        #[arg(long, default_value = "output")]
        out_dir: PathBuf,

        /// Sheet holding the recipes
        #[arg(short, long, default_value = "Recipes", env = "RXPLAN_SHEET")]
        sheet: String,

        #[command(flatten)]
        si: SiArgs,
    },

    /// Show how each column of the recipe sheet is read
    Inspect {
        /// Reaction planner workbook
        input: PathBuf,

        /// Sheet holding the recipes
        #[arg(short, long, default_value = "Recipes", env = "RXPLAN_SHEET")]
        sheet: String,

        /// Print the scan as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
struct SiArgs {
    /// Unit the amine mass cell is recorded in
    #[arg(long, value_enum, default_value = "mg", env = "RXPLAN_AMINE_MASS_UNIT")]
    amine_mass_unit: AmineMassUnit,

    /// Directory with NMR spectrum images
    #[arg(long, env = "RXPLAN_SPECTRA_DIR")]
    spectra_dir: Option<PathBuf>,
}

impl From<SiArgs> for SiOptions {
    fn from(args: SiArgs) -> Self {
        SiOptions {
            amine_mass_unit: args.amine_mass_unit,
            spectra_dir: args.spectra_dir,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "rxplan=debug" } else { "rxplan=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Extract {
            input,
            output,
            sheet,
        } => cli::extract(input, output, sheet, cli.verbose)?,

        Commands::Si { input, output, si } => cli::si(input, output, si.into(), cli.verbose)?,

        Commands::Run {
            input,
            out_dir,
            sheet,
            si,
        } => cli::run(input, out_dir, sheet, si.into())?,

        Commands::Inspect { input, sheet, json } => cli::inspect(input, sheet, json)?,
    }

    Ok(())
}
