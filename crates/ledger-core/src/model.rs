//! Ledger records and reconciliation output types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order statuses that take part in financial reconciliation.
pub const SETTLED_ORDER_STATUSES: [&str; 2] = ["paid", "completed"];

/// Withdrawal status awaiting payout.
pub const WITHDRAWAL_PENDING: &str = "pending";

/// Withdrawal status that has been paid out.
pub const WITHDRAWAL_COMPLETED: &str = "completed";

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

/// A confirmed purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub status: String,
    pub total_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create an order with no customer or agent attribution.
    pub fn new(
        id: impl Into<String>,
        status: impl Into<String>,
        total_amount: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            total_amount,
            customer_email: None,
            user_id: None,
            agent_id: None,
            created_at,
        }
    }

    /// Whether the order is `paid` or `completed`.
    pub fn is_settled(&self) -> bool {
        SETTLED_ORDER_STATUSES.contains(&self.status.as_str())
    }

    /// Customer reference: email, then user id, then empty.
    pub fn customer(&self) -> &str {
        self.customer_email
            .as_deref()
            .or(self.user_id.as_deref())
            .unwrap_or("")
    }
}

/// A captured payment event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    /// The order this payment belongs to. `None` cannot be reconciled.
    pub order_id: Option<String>,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        order_id: Option<&str>,
        amount: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            order_id: order_id.map(str::to_string),
            amount,
            created_at,
        }
    }
}

/// An agent or tenant payout request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    pub id: String,
    pub status: String,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Reconciliation output
// ---------------------------------------------------------------------------

/// Classification of a reconciliation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowStatus {
    /// Order and transaction amounts agree within tolerance.
    Matched,
    /// Both sides exist but the amounts differ.
    Mismatch,
    /// A settled order with no transaction.
    MissingTx,
    /// A transaction naming an order outside the settled order set.
    OrphanTx,
}

impl RowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matched => "MATCHED",
            Self::Mismatch => "MISMATCH",
            Self::MissingTx => "MISSING_TX",
            Self::OrphanTx => "ORPHAN_TX",
        }
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the reconciliation audit trail.
///
/// Built fresh for every export and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationRow {
    pub order_id: String,
    pub order_amount: f64,
    pub tx_amount: f64,
    pub diff: f64,
    pub status: RowStatus,
    pub order_date: Option<DateTime<Utc>>,
    pub tx_date: Option<DateTime<Utc>>,
    /// Number of transactions referencing the order.
    pub tx_count: usize,
}

/// Row counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub matched: usize,
    pub mismatched: usize,
    pub missing_tx: usize,
    pub orphan_tx: usize,
    pub total: usize,
}

impl StatusCounts {
    /// Tally the status of every row.
    pub fn tally(rows: &[ReconciliationRow]) -> Self {
        rows.iter().fold(Self::default(), |mut counts, row| {
            match row.status {
                RowStatus::Matched => counts.matched += 1,
                RowStatus::Mismatch => counts.mismatched += 1,
                RowStatus::MissingTx => counts.missing_tx += 1,
                RowStatus::OrphanTx => counts.orphan_tx += 1,
            }
            counts.total += 1;
            counts
        })
    }
}

/// Rows plus their status counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationReport {
    pub rows: Vec<ReconciliationRow>,
    pub counts: StatusCounts,
}

impl ReconciliationReport {
    pub fn new(rows: Vec<ReconciliationRow>) -> Self {
        let counts = StatusCounts::tally(&rows);
        Self { rows, counts }
    }

    /// Reorder rows by order id, keeping emission order among equal ids.
    pub fn sort_by_order_id(&mut self) {
        self.rows.sort_by(|a, b| a.order_id.cmp(&b.order_id));
    }
}
