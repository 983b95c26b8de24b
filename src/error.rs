use std::path::PathBuf;
use thiserror::Error;

pub type PlannerResult<T> = Result<T, PlannerError>;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook not found: {}", .0.display())]
    WorkbookNotFound(PathBuf),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Sheet '{sheet}' not found (available: {})", available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Excel export error: {0}")]
    Export(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<zip::result::ZipError> for PlannerError {
    fn from(e: zip::result::ZipError) -> Self {
        PlannerError::Document(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for PlannerError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        PlannerError::Export(e.to_string())
    }
}
