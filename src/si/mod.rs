//! Supporting Information documents
//!
//! Turns the reaction table into a Word document with stock-solution
//! recipes, reaction volumes and NMR spectra per experiment block.

pub mod docx;
pub mod format;
mod generator;
pub mod spectra;

pub use generator::{
    aldehyde_paragraph, group_blocks, volume_table, AmineMassUnit, Block, SiGenerator, SiOptions,
    SiSummary, HMDSO_MW_G_MOL,
};
pub use spectra::SpectraIndex;
