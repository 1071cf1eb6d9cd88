//! Stored narrative reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Check counts attached to a narrative report.
///
/// Missing and `null` values read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportStats {
    #[serde(deserialize_with = "null_as_default")]
    pub total_checks: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub passed: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub failed: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub warnings: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A table recorded in structured form when the report was generated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportTable {
    pub title: Option<String>,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A previously generated report. Read-only to the export path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeReport {
    /// Document identifier (24 hex digits).
    pub id: String,
    /// Human-facing reference, e.g. `RPT-2024-0042`.
    pub report_ref: Option<String>,
    pub title: String,
    pub report_type: String,
    pub category: String,
    pub summary: String,
    pub stats: Option<ReportStats>,
    /// Free-form decision data; key order is preserved.
    pub decision: Option<Map<String, Value>>,
    /// Markdown body.
    pub content: String,
    #[serde(default)]
    pub tables: Vec<ReportTable>,
    #[serde(default)]
    pub is_enterprise: bool,
    pub created_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NarrativeReport {
    /// Reference shown to readers: the report ref when set, else the id.
    pub fn reference(&self) -> &str {
        self.report_ref.as_deref().unwrap_or(&self.id)
    }

    /// Author name, `Admin` when unknown.
    pub fn author(&self) -> &str {
        self.created_by_name.as_deref().unwrap_or("Admin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_null_and_missing_read_as_zero() {
        let stats: ReportStats =
            serde_json::from_str(r#"{"totalChecks":4,"passed":null,"score":90}"#).unwrap();
        assert_eq!(
            stats,
            ReportStats {
                total_checks: 4,
                passed: 0,
                failed: 0,
                warnings: 0,
                score: 90.0,
            }
        );

        let stats: ReportStats = serde_json::from_str(r#"{"score":null}"#).unwrap();
        assert_eq!(stats, ReportStats::default());
    }

    #[test]
    fn test_stats_wrong_type_rejected() {
        assert!(serde_json::from_str::<ReportStats>(r#"{"passed":"many"}"#).is_err());
    }
}
