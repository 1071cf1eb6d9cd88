//! Error types for the export service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::{DatabaseError, ValidationError};
use ledger_core::WindowError;
use report_export::{ExportError, EXPORTABLE_CATEGORIES};
use serde_json::json;
use thiserror::Error;

/// Errors that can occur while serving an export.
#[derive(Debug, Error)]
pub enum AdminError {
    /// A required query parameter is absent.
    #[error("{0} is required")]
    MissingParam(&'static str),

    /// Unsupported report download format.
    #[error("format must be csv or pdf")]
    InvalidFormat(String),

    /// Unknown summary export type.
    #[error("Invalid export type")]
    InvalidExportType(Option<String>),

    /// Malformed report identifier.
    #[error("Invalid reportId format")]
    InvalidReportId(#[from] ValidationError),

    /// Malformed date range bound.
    #[error("{0}")]
    InvalidDateRange(#[from] WindowError),

    /// Report category is not on the export allow-list.
    #[error("This report type does not support export")]
    NotExportable { category: String },

    /// One or more record store queries failed.
    #[error("record store failed for: {}", .0.join(", "))]
    Sources(Vec<&'static str>),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Rendering error.
    #[error("Export error: {0}")]
    Export(ExportError),
}

impl From<ExportError> for AdminError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::NotExportable { category } => AdminError::NotExportable { category },
            other => AdminError::Export(other),
        }
    }
}

impl AdminError {
    /// Whether this is a server-side failure rather than a bad request.
    pub fn is_internal(&self) -> bool {
        self.status() == StatusCode::INTERNAL_SERVER_ERROR
    }

    fn status(&self) -> StatusCode {
        match self {
            AdminError::MissingParam(_)
            | AdminError::InvalidFormat(_)
            | AdminError::InvalidExportType(_)
            | AdminError::InvalidReportId(_)
            | AdminError::InvalidDateRange(_)
            | AdminError::NotExportable { .. } => StatusCode::BAD_REQUEST,
            AdminError::Database(DatabaseError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AdminError::Database(DatabaseError::InvalidReportId(_)) => StatusCode::BAD_REQUEST,
            AdminError::Sources(_) | AdminError::Database(_) | AdminError::Export(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AdminError::NotExportable { .. } => json!({
                "error": self.to_string(),
                "supportedTypes": EXPORTABLE_CATEGORIES,
            }),
            AdminError::Database(DatabaseError::NotFound { .. }) => json!({
                "error": "Report not found"
            }),
            AdminError::Database(DatabaseError::InvalidReportId(_)) => json!({
                "error": "Invalid reportId format"
            }),
            AdminError::Sources(sources) => json!({
                "error": "Server error",
                "sources": sources,
            }),
            _ if status == StatusCode::INTERNAL_SERVER_ERROR => json!({
                "error": "Server error"
            }),
            _ => json!({
                "error": self.to_string()
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for admin operations.
pub type Result<T> = std::result::Result<T, AdminError>;
