//! Export error types.

use thiserror::Error;

/// Errors that can occur while rendering an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing the CSV buffer failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Rendered bytes were not valid UTF-8.
    #[error("encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// HTML template rendering failed.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    /// The report category is not on the export allow-list.
    #[error("report category does not support export: {category}")]
    NotExportable { category: String },
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
