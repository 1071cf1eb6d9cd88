//! Domain records and the pure reconciliation engine.
//!
//! This crate receives pre-loaded records and returns classified results. It
//! performs no IO; the record store and the HTTP layer live elsewhere. It
//! provides:
//!
//! - [`Order`], [`Transaction`], [`WithdrawalRequest`] - the ledger records
//! - [`NarrativeReport`] - a stored, human-authored report
//! - [`DateWindow`] - an optional inclusive `createdAt` range
//! - [`reconcile`] - order/transaction matching into [`ReconciliationRow`]s
//! - [`summary`] - the financial, orders and reconciliation aggregators
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use ledger_core::{reconcile, DuplicatePolicy, Order, RowStatus, Transaction};
//!
//! let now = Utc::now();
//! let orders = vec![Order::new("1", "paid", 100.0, now)];
//! let transactions = vec![Transaction::new("t1", Some("1"), 100.0, now)];
//!
//! let report = reconcile(&orders, &transactions, DuplicatePolicy::LastSeen);
//! assert_eq!(report.rows[0].status, RowStatus::Matched);
//! assert_eq!(report.counts.total, 1);
//! ```

mod error;
pub mod matcher;
pub mod model;
pub mod report;
pub mod summary;
pub mod window;

pub use error::WindowError;
pub use matcher::{reconcile, DuplicatePolicy, TransactionIndex, MATCH_TOLERANCE};
pub use model::{
    Order, ReconciliationReport, ReconciliationRow, RowStatus, StatusCounts, Transaction,
    WithdrawalRequest,
};
pub use report::{NarrativeReport, ReportStats, ReportTable};
pub use summary::{FinancialSummary, OrdersSummary};
pub use window::DateWindow;
