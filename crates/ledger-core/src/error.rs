//! Error types for ledger-core.

use thiserror::Error;

/// A date-range bound that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// The bound is neither an RFC 3339 timestamp nor a `YYYY-MM-DD` date.
    #[error("invalid {bound} date: {value}")]
    InvalidBound { bound: &'static str, value: String },
}
