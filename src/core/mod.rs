//! Positional extraction of the reaction table

pub mod extractor;
pub mod layout;

pub use extractor::{extract_reactions, BlockExtractor, ColumnScan, ColumnVerdict, ExtractionReport};
pub use layout::{Layout, RECORD_FIELDS};
