//! CSV exports of the ledger summaries.
//!
//! Each export runs one aggregator and renders its result, so a caller can
//! serve the summary as JSON or the CSV as a download from the same pass.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use ledger_core::summary::{financial_summary, orders_summary, reconciliation_summary};
use ledger_core::{
    DateWindow, DuplicatePolicy, FinancialSummary, Order, OrdersSummary, ReconciliationReport,
    Transaction, WithdrawalRequest,
};
use serde::Serialize;

use crate::document::{format_amount, format_timestamp, CsvDocument};
use crate::error::Result;
use crate::filename::dated_filename;
use crate::{Artifact, CSV_CONTENT_TYPE};

/// The ad-hoc summary exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportType {
    FinancialSummary,
    OrdersSummary,
    Reconciliation,
}

impl ExportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FinancialSummary => "financial_summary",
            Self::OrdersSummary => "orders_summary",
            Self::Reconciliation => "reconciliation",
        }
    }
}

impl FromStr for ExportType {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "financial_summary" => Ok(Self::FinancialSummary),
            "orders_summary" => Ok(Self::OrdersSummary),
            "reconciliation" => Ok(Self::Reconciliation),
            _ => Err(()),
        }
    }
}

/// A summary together with its CSV rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Export<S> {
    pub kind: ExportType,
    pub summary: S,
    pub csv: String,
}

impl<S> Export<S> {
    /// Replace the summary, keeping the rendered CSV.
    pub fn map_summary<T>(self, f: impl FnOnce(S) -> T) -> Export<T> {
        Export {
            kind: self.kind,
            summary: f(self.summary),
            csv: self.csv,
        }
    }

    /// The CSV as a download named `<type>_<date>.csv`.
    pub fn into_artifact(self, today: NaiveDate) -> Artifact {
        Artifact {
            filename: dated_filename(self.kind.as_str(), today, "csv"),
            content_type: CSV_CONTENT_TYPE,
            body: self.csv,
        }
    }
}

/// Financial totals and settled-order detail.
pub fn financial_summary_export(
    orders: &[Order],
    transactions: &[Transaction],
    withdrawals: &[WithdrawalRequest],
    window: &DateWindow,
    generated_at: DateTime<Utc>,
) -> Result<Export<FinancialSummary>> {
    let summary = financial_summary(orders, transactions, withdrawals, window);

    let mut doc = preamble("Financial Summary Export", window, generated_at)?;
    doc.record(["Metric", "Amount (₪)"])?;
    doc.record(["Total Revenue", &format_amount(summary.total_revenue)])?;
    doc.record(["Total Transactions", &format_amount(summary.total_transactions)])?;
    doc.record(["Pending Withdrawals", &format_amount(summary.pending_withdrawals)])?;
    doc.record(["Completed Withdrawals", &format_amount(summary.completed_withdrawals)])?;
    doc.blank()?;
    doc.record(["Orders Detail"])?;
    doc.record(["Order ID", "Status", "Amount", "Date"])?;
    for order in &summary.orders {
        doc.record([
            order.id.clone(),
            order.status.clone(),
            format_amount(order.total_amount),
            format_timestamp(order.created_at),
        ])?;
    }

    Ok(Export {
        kind: ExportType::FinancialSummary,
        csv: doc.finish()?,
        summary,
    })
}

/// Status histogram and full order detail, newest first.
pub fn orders_summary_export(
    orders: &[Order],
    window: &DateWindow,
    generated_at: DateTime<Utc>,
) -> Result<Export<OrdersSummary>> {
    let summary = orders_summary(orders, window);

    let mut doc = preamble("Orders Summary Export", window, generated_at)?;
    doc.record(["Status Summary"])?;
    doc.record(["Status", "Count"])?;
    for (status, count) in &summary.by_status {
        doc.record([status.clone(), count.to_string()])?;
    }
    doc.blank()?;
    doc.record(["Orders Detail"])?;
    doc.record(["Order ID", "Status", "Amount", "Customer", "Agent", "Date"])?;
    for order in &summary.orders {
        doc.record([
            order.id.clone(),
            order.status.clone(),
            format_amount(order.total_amount),
            order.customer().to_string(),
            order.agent_id.clone().unwrap_or_default(),
            format_timestamp(order.created_at),
        ])?;
    }

    Ok(Export {
        kind: ExportType::OrdersSummary,
        csv: doc.finish()?,
        summary,
    })
}

/// Order/transaction reconciliation counts and audit rows.
pub fn reconciliation_export(
    orders: &[Order],
    transactions: &[Transaction],
    window: &DateWindow,
    policy: DuplicatePolicy,
    generated_at: DateTime<Utc>,
) -> Result<Export<ReconciliationReport>> {
    let report = reconciliation_summary(orders, transactions, window, policy);
    let counts = report.counts;

    let mut doc = preamble("Financial Reconciliation Export", window, generated_at)?;
    doc.record(["Summary"])?;
    doc.record(["Status", "Count"])?;
    doc.record(["Matched".to_string(), counts.matched.to_string()])?;
    doc.record(["Mismatched".to_string(), counts.mismatched.to_string()])?;
    doc.record(["Missing Transaction".to_string(), counts.missing_tx.to_string()])?;
    doc.record(["Orphan Transaction".to_string(), counts.orphan_tx.to_string()])?;
    doc.blank()?;
    doc.record(["Reconciliation Detail"])?;
    doc.record([
        "Order ID",
        "Order Amount",
        "Transaction Amount",
        "Difference",
        "Status",
        "Order Date",
        "Transaction Date",
    ])?;
    for row in &report.rows {
        doc.record([
            row.order_id.clone(),
            format_amount(row.order_amount),
            format_amount(row.tx_amount),
            format!("{:.2}", row.diff),
            row.status.to_string(),
            row.order_date.map(format_timestamp).unwrap_or_default(),
            row.tx_date.map(format_timestamp).unwrap_or_default(),
        ])?;
    }

    Ok(Export {
        kind: ExportType::Reconciliation,
        csv: doc.finish()?,
        summary: report,
    })
}

fn preamble(title: &str, window: &DateWindow, generated_at: DateTime<Utc>) -> Result<CsvDocument> {
    let mut doc = CsvDocument::new();
    doc.record([title])?;
    doc.record(["Date Range".to_string(), window.label()])?;
    doc.record(["Generated".to_string(), format_timestamp(generated_at)])?;
    doc.blank()?;
    Ok(doc)
}
