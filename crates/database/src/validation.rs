//! Input validation for report identifiers.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty value where one is required.
    Empty(String),
    /// Wrong number of characters.
    WrongLength { field: String, expected: usize, actual: usize },
    /// A character outside the allowed set.
    InvalidCharacter { field: String, found: char },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::WrongLength {
                field,
                expected,
                actual,
            } => {
                write!(f, "{} must be {} characters ({} given)", field, expected, actual)
            }
            ValidationError::InvalidCharacter { field, found } => {
                write!(f, "{} contains invalid character {:?}", field, found)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Length of a report identifier in hex digits.
pub const REPORT_ID_LENGTH: usize = 24;

/// A well-formed report identifier: 24 lowercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportId(String);

impl ReportId {
    /// Validate and normalize a report identifier.
    ///
    /// Surrounding whitespace is ignored and hex digits are lowercased.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();

        if value.is_empty() {
            return Err(ValidationError::Empty("reportId".to_string()));
        }

        if let Some(found) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidCharacter {
                field: "reportId".to_string(),
                found,
            });
        }

        if value.len() != REPORT_ID_LENGTH {
            return Err(ValidationError::WrongLength {
                field: "reportId".to_string(),
                expected: REPORT_ID_LENGTH,
                actual: value.len(),
            });
        }

        Ok(Self(value.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
