//! Database row models.
//!
//! Rows mirror the SQLite columns; timestamps and JSON documents stay as TEXT
//! until converted into the `ledger_core` types.

use ledger_core::{NarrativeReport, Order, ReportStats, ReportTable, Transaction, WithdrawalRequest};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

use crate::error::{DatabaseError, Result};
use crate::timestamp;

/// A row of the `orders` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OrderRow {
    pub id: String,
    pub status: String,
    pub total_amount: f64,
    pub customer_email: Option<String>,
    pub user_id: Option<String>,
    pub agent_id: Option<String>,
    pub created_at: String,
}

impl TryFrom<OrderRow> for Order {
    type Error = DatabaseError;

    fn try_from(row: OrderRow) -> Result<Self> {
        let created_at = timestamp::from_sql("Order", &row.id, &row.created_at)?;
        Ok(Order {
            id: row.id,
            status: row.status,
            total_amount: row.total_amount,
            customer_email: row.customer_email,
            user_id: row.user_id,
            agent_id: row.agent_id,
            created_at,
        })
    }
}

/// A row of the `transactions` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TransactionRow {
    pub id: String,
    pub order_id: Option<String>,
    pub amount: f64,
    pub created_at: String,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = DatabaseError;

    fn try_from(row: TransactionRow) -> Result<Self> {
        let created_at = timestamp::from_sql("Transaction", &row.id, &row.created_at)?;
        Ok(Transaction {
            id: row.id,
            order_id: row.order_id,
            amount: row.amount,
            created_at,
        })
    }
}

/// A row of the `withdrawal_requests` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct WithdrawalRow {
    pub id: String,
    pub status: String,
    pub amount: f64,
    pub created_at: String,
}

impl TryFrom<WithdrawalRow> for WithdrawalRequest {
    type Error = DatabaseError;

    fn try_from(row: WithdrawalRow) -> Result<Self> {
        let created_at = timestamp::from_sql("WithdrawalRequest", &row.id, &row.created_at)?;
        Ok(WithdrawalRequest {
            id: row.id,
            status: row.status,
            amount: row.amount,
            created_at,
        })
    }
}

/// A row of the `system_reports` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ReportRow {
    pub id: String,
    pub report_ref: Option<String>,
    pub title: String,
    pub report_type: String,
    pub category: String,
    pub summary: String,
    /// JSON object of check counts.
    pub stats: Option<String>,
    /// JSON object of decision data.
    pub decision: Option<String>,
    pub content: String,
    /// JSON array of structured tables.
    pub tables: Option<String>,
    pub is_enterprise: bool,
    pub created_by_name: Option<String>,
    pub created_at: String,
}

impl TryFrom<ReportRow> for NarrativeReport {
    type Error = DatabaseError;

    fn try_from(row: ReportRow) -> Result<Self> {
        let created_at = timestamp::from_sql("Report", &row.id, &row.created_at)?;
        let stats: Option<ReportStats> = decode(row.stats.as_deref())?;
        let decision: Option<Map<String, Value>> = decode(row.decision.as_deref())?;
        let tables: Option<Vec<ReportTable>> = decode(row.tables.as_deref())?;

        Ok(NarrativeReport {
            id: row.id,
            report_ref: row.report_ref,
            title: row.title,
            report_type: row.report_type,
            category: row.category,
            summary: row.summary,
            stats,
            decision,
            content: row.content,
            tables: tables.unwrap_or_default(),
            is_enterprise: row.is_enterprise,
            created_by_name: row.created_by_name,
            created_at,
        })
    }
}

impl TryFrom<&NarrativeReport> for ReportRow {
    type Error = DatabaseError;

    fn try_from(report: &NarrativeReport) -> Result<Self> {
        let tables = if report.tables.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&report.tables)?)
        };

        Ok(ReportRow {
            id: report.id.clone(),
            report_ref: report.report_ref.clone(),
            title: report.title.clone(),
            report_type: report.report_type.clone(),
            category: report.category.clone(),
            summary: report.summary.clone(),
            stats: report.stats.as_ref().map(serde_json::to_string).transpose()?,
            decision: report.decision.as_ref().map(serde_json::to_string).transpose()?,
            content: report.content.clone(),
            tables,
            is_enterprise: report.is_enterprise,
            created_by_name: report.created_by_name.clone(),
            created_at: timestamp::to_sql(report.created_at),
        })
    }
}

/// Decode an optional JSON column. SQL `NULL` and JSON `null` are both absent.
fn decode<T: serde::de::DeserializeOwned>(column: Option<&str>) -> Result<Option<T>> {
    match column {
        Some(text) => Ok(serde_json::from_str::<Option<T>>(text)?),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_row() -> ReportRow {
        ReportRow {
            id: "65a1f0c2b3d4e5f601234567".to_string(),
            report_ref: None,
            title: "Weekly".to_string(),
            report_type: "scan".to_string(),
            category: "financial_payments".to_string(),
            summary: String::new(),
            stats: Some(r#"{"totalChecks":4,"passed":3,"failed":1}"#.to_string()),
            decision: Some(r#"{"z":1,"a":"two"}"#.to_string()),
            content: String::new(),
            tables: None,
            is_enterprise: false,
            created_by_name: None,
            created_at: "2024-03-01T12:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_report_row_decodes_json_columns() {
        let report = NarrativeReport::try_from(report_row()).unwrap();

        let stats = report.stats.unwrap();
        assert_eq!(stats.total_checks, 4);
        assert_eq!(stats.warnings, 0);

        let keys: Vec<_> = report.decision.unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
        assert!(report.tables.is_empty());
    }

    #[test]
    fn test_json_null_is_absent() {
        let mut row = report_row();
        row.stats = Some("null".to_string());
        let report = NarrativeReport::try_from(row).unwrap();
        assert!(report.stats.is_none());
    }

    #[test]
    fn test_null_stat_counts_read_as_zero() {
        let mut row = report_row();
        row.stats = Some(r#"{"totalChecks":4,"passed":null,"score":90}"#.to_string());

        let stats = NarrativeReport::try_from(row).unwrap().stats.unwrap();
        assert_eq!(stats.total_checks, 4);
        assert_eq!(stats.passed, 0);
        assert_eq!(stats.score, 90.0);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let mut row = report_row();
        row.tables = Some("[{".to_string());
        assert!(matches!(
            NarrativeReport::try_from(row),
            Err(DatabaseError::Json(_))
        ));
    }

    #[test]
    fn test_bad_timestamp_is_error() {
        let row = OrderRow {
            id: "o1".to_string(),
            status: "paid".to_string(),
            total_amount: 10.0,
            customer_email: None,
            user_id: None,
            agent_id: None,
            created_at: "not a date".to_string(),
        };
        assert!(matches!(
            Order::try_from(row),
            Err(DatabaseError::InvalidTimestamp { entity: "Order", .. })
        ));
    }
}
