//! Database error types.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLx error (connection, query, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Record not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Record already exists
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    /// Malformed report identifier
    #[error("invalid report id: {0}")]
    InvalidReportId(#[from] ValidationError),

    /// A stored timestamp that does not parse
    #[error("invalid timestamp in {entity} {id}: {value}")]
    InvalidTimestamp {
        entity: &'static str,
        id: String,
        value: String,
    },

    /// A JSON column that does not decode
    #[error("invalid JSON column: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
