//! Supporting Information document - reaction table → .docx
//!
//! One section per experiment block: stock-solution recipes for every amine
//! and aldehyde in the block, a reaction-volume table and, when a spectra
//! directory is configured, the NMR spectrum of each reaction.

use crate::error::{PlannerError, PlannerResult};
use crate::si::docx::{Document, Paragraph, Run, Table};
use crate::si::format::{fixed, ratio, sig_figs};
use crate::si::spectra::{spectrum_key, SpectraIndex};
use crate::types::{parse_number, ReactionRecord};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Molecular weight of hexamethyldisiloxane (g/mol)
pub const HMDSO_MW_G_MOL: f64 = 162.38;

const SPECTRUM_WIDTH_IN: f64 = 6.0;

/// Unit the planner's amine mass cell is recorded in.
///
/// The column is labelled grams, but planners in circulation hold
/// milligrams in it as often as grams, so the unit is never guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum AmineMassUnit {
    /// Value is already in mg and is used as recorded
    #[default]
    Mg,
    /// Value is in g and is multiplied by 1000 for the mg figures
    G,
}

impl AmineMassUnit {
    pub fn to_mg(self, value: Option<f64>) -> Option<f64> {
        match self {
            AmineMassUnit::Mg => value,
            AmineMassUnit::G => value.map(|v| v * 1000.0),
        }
    }
}

/// SI generation settings
#[derive(Debug, Clone, Default)]
pub struct SiOptions {
    pub amine_mass_unit: AmineMassUnit,
    /// Directory searched for `{amine}_{aldehyde}` spectrum images
    pub spectra_dir: Option<PathBuf>,
}

/// What went into a generated document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiSummary {
    pub blocks: usize,
    pub amines: usize,
    pub aldehydes: usize,
    pub reactions: usize,
    pub spectra_embedded: usize,
    /// Spectra not found, or found but not a readable image
    pub spectra_missing: usize,
    /// Records dropped because they carry no block id
    pub unassigned: usize,
}

/// Records of one experiment block, in table order
#[derive(Debug)]
pub struct Block<'a> {
    pub id: String,
    pub records: Vec<&'a ReactionRecord>,
}

impl Block<'_> {
    /// First record of each distinct amine, in order of appearance
    pub fn amines(&self) -> Vec<&ReactionRecord> {
        unique_by(&self.records, |r| r.amine_name.as_str())
    }

    /// First record of each distinct aldehyde, in order of appearance
    pub fn aldehydes(&self) -> Vec<&ReactionRecord> {
        unique_by(&self.records, |r| r.aldehyde_name.as_str())
    }
}

fn unique_by<'a, F>(records: &[&'a ReactionRecord], key: F) -> Vec<&'a ReactionRecord>
where
    F: Fn(&ReactionRecord) -> &str,
{
    let mut seen: Vec<&str> = Vec::new();
    let mut unique = Vec::new();
    for record in records {
        let k = key(*record);
        if !seen.contains(&k) {
            seen.push(k);
            unique.push(*record);
        }
    }
    unique
}

/// Group records by block id, blocks in natural order (numeric ids by value,
/// then text ids alphabetically). Returns the groups and the number of records
/// without a block id.
pub fn group_blocks(records: &[ReactionRecord]) -> (Vec<Block<'_>>, usize) {
    let mut blocks: Vec<Block> = Vec::new();
    let mut unassigned = 0;

    for record in records {
        let id = match &record.experiment_block {
            Some(id) => id,
            None => {
                unassigned += 1;
                continue;
            }
        };
        match blocks.iter_mut().find(|b| &b.id == id) {
            Some(block) => block.records.push(record),
            None => blocks.push(Block {
                id: id.clone(),
                records: vec![record],
            }),
        }
    }

    blocks.sort_by(|a, b| block_order(&a.id, &b.id));
    (blocks, unassigned)
}

fn block_order(a: &str, b: &str) -> Ordering {
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Builds the SI document
pub struct SiGenerator {
    options: SiOptions,
    spectra: Option<SpectraIndex>,
}

impl SiGenerator {
    pub fn new(options: SiOptions) -> Self {
        let spectra = options.spectra_dir.as_deref().map(SpectraIndex::scan);
        Self { options, spectra }
    }

    /// Render the document for `records` and save it to `output`
    pub fn generate(&self, records: &[ReactionRecord], output: &Path) -> PlannerResult<SiSummary> {
        let (doc, summary) = self.build(records)?;
        doc.save(output)?;
        info!(
            output = %output.display(),
            blocks = summary.blocks,
            reactions = summary.reactions,
            "SI document written"
        );
        Ok(summary)
    }

    /// Render the document in memory
    pub fn build(&self, records: &[ReactionRecord]) -> PlannerResult<(Document, SiSummary)> {
        info!(
            unit = ?self.options.amine_mass_unit,
            "amine mass column read as {}",
            match self.options.amine_mass_unit {
                AmineMassUnit::Mg => "mg (used as recorded)",
                AmineMassUnit::G => "g (converted to mg)",
            }
        );

        let (blocks, unassigned) = group_blocks(records);
        if unassigned > 0 {
            warn!(count = unassigned, "records without an experiment block were left out");
        }

        let mut doc = Document::new("Supporting Information: Stock Solutions");
        let mut summary = SiSummary {
            blocks: blocks.len(),
            unassigned,
            ..Default::default()
        };

        for block in &blocks {
            self.write_block(&mut doc, block, &mut summary)?;
        }

        Ok((doc, summary))
    }

    fn write_block(
        &self,
        doc: &mut Document,
        block: &Block,
        summary: &mut SiSummary,
    ) -> PlannerResult<()> {
        let amines = block.amines();
        let aldehydes = block.aldehydes();
        summary.amines += amines.len();
        summary.aldehydes += aldehydes.len();
        summary.reactions += block.records.len();

        let amine_list = amines
            .iter()
            .map(|r| r.amine_name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        doc.add_paragraph(
            Paragraph::new()
                .run(
                    Run::new(format!(
                        "Imine formation reactions block {}: Amines {} with {} aldehydes",
                        block.id,
                        amine_list,
                        aldehydes.len()
                    ))
                    .bold()
                    .size(14.0),
                )
                .space_after(0.0),
        );
        doc.add_paragraph(section_heading("Stock Solution Recipes"));

        for record in &amines {
            doc.add_paragraph(self.amine_paragraph(record));
        }
        for record in &aldehydes {
            doc.add_paragraph(aldehyde_paragraph(record));
        }

        doc.add_paragraph(section_heading("Reaction Volumes"));
        doc.add_table(&volume_table(&block.records));

        if let Some(spectra) = &self.spectra {
            doc.add_paragraph(section_heading("NMR Spectra"));
            for record in &block.records {
                let caption = format!("{} + {}", record.amine_name, record.aldehyde_name);
                match spectra.lookup(&record.amine_name, &record.aldehyde_name) {
                    Some(path) => match doc.add_image(path, SPECTRUM_WIDTH_IN) {
                        Ok(()) => {
                            doc.add_paragraph(
                                Paragraph::new()
                                    .run(Run::new(format!("Figure: 1H NMR spectrum of {}", caption)).size(10.0))
                                    .space_after(12.0),
                            );
                            summary.spectra_embedded += 1;
                        }
                        // A bad image costs its figure, not the document
                        Err(PlannerError::Image(reason)) => {
                            warn!(spectrum = %path.display(), %reason, "spectrum image unreadable");
                            doc.add_paragraph(Paragraph::new().text(format!(
                                "Spectrum unreadable for {} ({})",
                                caption,
                                path.display()
                            )));
                            summary.spectra_missing += 1;
                        }
                        Err(e) => return Err(e),
                    },
                    None => {
                        doc.add_paragraph(Paragraph::new().text(format!(
                            "Spectrum not found for {} (expected {}.png)",
                            caption,
                            spectrum_key(&record.amine_name, &record.aldehyde_name)
                        )));
                        summary.spectra_missing += 1;
                    }
                }
            }
        }

        doc.add_page_break();
        Ok(())
    }

    /// `{amine} stock solution: ...` recipe paragraph
    pub fn amine_paragraph(&self, record: &ReactionRecord) -> Paragraph {
        let name = &record.amine_name;
        let mass_mg = self.options.amine_mass_unit.to_mg(record.actual_mass_amine_g);
        let amine_mmol = ratio(mass_mg, record.amine_mw_g_mol);
        let hmdso_mmol = ratio(record.actual_mass_hmdso_mg, Some(HMDSO_MW_G_MOL));

        Paragraph::new()
            .run(Run::new(format!("{} stock solution: ", name)).bold())
            .text(format!(
                "{} ({} mg, {} mmol) and ",
                name,
                fixed(mass_mg, 2),
                fixed(amine_mmol, 3)
            ))
            .text(format!(
                "hexamethyldisiloxane ({} mg, {} mmol) ",
                fixed(record.actual_mass_hmdso_mg, 2),
                fixed(hmdso_mmol, 3)
            ))
            .text(
                "was added to a 10 mL volumetric flask and filled up to the mark with 15% MeCN-d3 in MeCN ",
            )
            .text(format!(
                "dried over molecular sieves to give 10 mL of {} mM ",
                sig_figs(record.actual_amine_conc_mm, 3)
            ))
            .text(format!(
                "{} and {} mM hexamethyldisiloxane stock solution.",
                name,
                sig_figs(record.actual_conc_hmdso_mm, 3)
            ))
    }
}

/// `{aldehyde} stock solution: ...` recipe paragraph
pub fn aldehyde_paragraph(record: &ReactionRecord) -> Paragraph {
    let name = &record.aldehyde_name;
    let mmol = ratio(record.aldehyde_actual_mass_mg, record.aldehyde_mw_g_mol);

    Paragraph::new()
        .run(Run::new(format!("{} stock solution: ", name)).bold())
        .text(format!(
            "{} ({} mg, {} mmol) ",
            name,
            fixed(record.aldehyde_actual_mass_mg, 2),
            fixed(mmol, 3)
        ))
        .text(format!(
            "was added to a sample vial, {} uL was dispensed into ",
            fixed(record.aldehyde_vol_required_ul, 1)
        ))
        .text("the sample vial by the Hamilton liquid handler using 1000 uL disposable tips to create a ")
        .text(format!(
            "{} mM {} stock solution.",
            sig_figs(record.actual_aldehyde_conc_mm, 4),
            name
        ))
}

fn section_heading(text: &str) -> Paragraph {
    Paragraph::new()
        .run(Run::new(text).bold().underline().size(12.0))
        .space_after(12.0)
}

/// Per-reaction dispensing volumes and amounts
pub fn volume_table(records: &[&ReactionRecord]) -> Table {
    let mut table = Table::new([
        "Amine",
        "Aldehyde",
        "Amine sol. (uL)",
        "Aldehyde sol. (uL)",
        "Total (uL)",
        "Amine (mmol)",
        "Aldehyde (mmol)",
        "HMDSO (mmol)",
    ]);
    for r in records {
        table.add_row([
            r.amine_name.clone(),
            r.aldehyde_name.clone(),
            fixed(r.vol_amine_sol_ul, 1),
            fixed(r.vol_aldehyde_sol_ul, 1),
            fixed(r.total_volume_ul, 1),
            fixed(r.amount_amine_mmol, 4),
            fixed(r.amount_aldehyde_mmol, 4),
            fixed(r.amount_hmdso_mmol, 4),
        ]);
    }
    table
}
