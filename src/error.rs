use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Input source not found or unreadable: {}", path.display())]
    MissingSource { path: PathBuf },

    #[error("Column '{column}' is missing from the input table")]
    MissingColumn { column: String },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl ProcessingError {
    pub fn missing_column(column: impl Into<String>) -> Self {
        ProcessingError::MissingColumn {
            column: column.into(),
        }
    }

    /// Whole-table failures halt the run; column failures degrade.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ProcessingError::MissingColumn { .. })
    }
}
