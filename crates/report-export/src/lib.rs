//! Export rendering for admin financial reporting.
//!
//! Turns ledger summaries and stored narrative reports into downloadable
//! artifacts:
//!
//! - [`summary`] - financial, orders and reconciliation CSV exports
//! - [`narrative`] - narrative report CSV and the printable HTML page
//! - [`filename`] - filesystem-safe download names
//! - [`eligibility`] - which report categories may be exported

pub mod document;
pub mod eligibility;
mod error;
pub mod filename;
pub mod markdown;
pub mod narrative;
pub mod summary;

pub use document::CsvDocument;
pub use eligibility::{check_exportable, EXPORTABLE_CATEGORIES};
pub use error::{ExportError, Result};
pub use narrative::ReportFormat;
pub use summary::{Export, ExportType};

/// A rendered download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub body: String,
    pub content_type: &'static str,
    pub filename: String,
}

/// Content type of every CSV artifact.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Content type of the printable HTML artifact.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
