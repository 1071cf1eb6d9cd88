//! Summary aggregators.
//!
//! Each aggregator reduces explicit record collections, restricted to a
//! [`DateWindow`], into totals plus a detail list. Inputs may be wider than the
//! window; records outside it are dropped here so the result does not depend
//! on how the caller queried its store.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::matcher::{reconcile, DuplicatePolicy};
use crate::model::{
    Order, ReconciliationReport, Transaction, WithdrawalRequest, WITHDRAWAL_COMPLETED,
    WITHDRAWAL_PENDING,
};
use crate::window::DateWindow;

/// Revenue, captured payments and payouts for a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_revenue: f64,
    pub total_transactions: f64,
    pub pending_withdrawals: f64,
    pub completed_withdrawals: f64,
    pub orders_count: usize,
    /// Settled orders in the window.
    pub orders: Vec<Order>,
}

/// Order volume by status for a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersSummary {
    pub total_orders: usize,
    pub by_status: BTreeMap<String, usize>,
    /// All orders in the window, newest first.
    pub orders: Vec<Order>,
}

/// Reduce settled orders, transactions and withdrawals into a financial summary.
pub fn financial_summary(
    orders: &[Order],
    transactions: &[Transaction],
    withdrawals: &[WithdrawalRequest],
    window: &DateWindow,
) -> FinancialSummary {
    let orders = settled_in_window(orders, window);
    let total_revenue = orders.iter().map(|o| o.total_amount).sum();

    let total_transactions = transactions
        .iter()
        .filter(|t| window.contains(t.created_at))
        .map(|t| t.amount)
        .sum();

    let withdrawal_total = |status: &str| -> f64 {
        withdrawals
            .iter()
            .filter(|w| w.status == status && window.contains(w.created_at))
            .map(|w| w.amount)
            .sum()
    };

    FinancialSummary {
        total_revenue,
        total_transactions,
        pending_withdrawals: withdrawal_total(WITHDRAWAL_PENDING),
        completed_withdrawals: withdrawal_total(WITHDRAWAL_COMPLETED),
        orders_count: orders.len(),
        orders,
    }
}

/// Count orders of every status and list them newest first.
pub fn orders_summary(orders: &[Order], window: &DateWindow) -> OrdersSummary {
    let mut orders: Vec<Order> = orders
        .iter()
        .filter(|o| window.contains(o.created_at))
        .cloned()
        .collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut by_status = BTreeMap::new();
    for order in &orders {
        *by_status.entry(order.status.clone()).or_insert(0) += 1;
    }

    OrdersSummary {
        total_orders: orders.len(),
        by_status,
        orders,
    }
}

/// Reconcile settled orders in the window against transactions in the window.
pub fn reconciliation_summary(
    orders: &[Order],
    transactions: &[Transaction],
    window: &DateWindow,
    policy: DuplicatePolicy,
) -> ReconciliationReport {
    let orders = settled_in_window(orders, window);
    let transactions: Vec<Transaction> = transactions
        .iter()
        .filter(|t| window.contains(t.created_at))
        .cloned()
        .collect();
    reconcile(&orders, &transactions, policy)
}

fn settled_in_window(orders: &[Order], window: &DateWindow) -> Vec<Order> {
    orders
        .iter()
        .filter(|o| o.is_settled() && window.contains(o.created_at))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, d, 12, 0, 0).unwrap()
    }

    fn withdrawal(id: &str, status: &str, amount: f64, d: u32) -> WithdrawalRequest {
        WithdrawalRequest {
            id: id.to_string(),
            status: status.to_string(),
            amount,
            created_at: day(d),
        }
    }

    #[test]
    fn test_financial_summary_totals() {
        let orders = vec![
            Order::new("1", "paid", 100.0, day(1)),
            Order::new("2", "completed", 50.5, day(2)),
            Order::new("3", "pending", 999.0, day(2)),
        ];
        let transactions = vec![
            Transaction::new("t1", Some("1"), 100.0, day(1)),
            Transaction::new("t2", None, 7.0, day(3)),
        ];
        let withdrawals = vec![
            withdrawal("w1", "pending", 20.0, 1),
            withdrawal("w2", "pending", 5.0, 2),
            withdrawal("w3", "completed", 30.0, 3),
            withdrawal("w4", "rejected", 1000.0, 3),
        ];

        let summary = financial_summary(&orders, &transactions, &withdrawals, &DateWindow::all());

        assert_eq!(summary.total_revenue, 150.5);
        assert_eq!(summary.total_transactions, 107.0);
        assert_eq!(summary.pending_withdrawals, 25.0);
        assert_eq!(summary.completed_withdrawals, 30.0);
        assert_eq!(summary.orders_count, 2);
        assert_eq!(summary.orders.len(), 2);
    }

    #[test]
    fn test_financial_summary_respects_window() {
        let orders = vec![
            Order::new("1", "paid", 100.0, day(1)),
            Order::new("2", "paid", 40.0, day(10)),
        ];
        let transactions = vec![
            Transaction::new("t1", Some("1"), 100.0, day(1)),
            Transaction::new("t2", Some("2"), 40.0, day(10)),
        ];
        let window = DateWindow::parse(Some("2024-05-05"), None).unwrap();

        let summary = financial_summary(&orders, &transactions, &[], &window);

        assert_eq!(summary.total_revenue, 40.0);
        assert_eq!(summary.total_transactions, 40.0);
        assert_eq!(summary.orders_count, 1);
    }

    #[test]
    fn test_orders_summary_histogram_and_order() {
        let orders = vec![
            Order::new("old", "paid", 1.0, day(1)),
            Order::new("new", "pending", 2.0, day(9)),
            Order::new("mid", "paid", 3.0, day(5)),
        ];

        let summary = orders_summary(&orders, &DateWindow::all());

        assert_eq!(summary.total_orders, 3);
        assert_eq!(summary.by_status.get("paid"), Some(&2));
        assert_eq!(summary.by_status.get("pending"), Some(&1));
        let ids: Vec<&str> = summary.orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_orders_summary_empty() {
        let summary = orders_summary(&[], &DateWindow::all());
        assert_eq!(summary.total_orders, 0);
        assert!(summary.by_status.is_empty());
    }

    #[test]
    fn test_reconciliation_summary_filters_unsettled() {
        let orders = vec![
            Order::new("1", "paid", 10.0, day(1)),
            Order::new("2", "cancelled", 10.0, day(1)),
        ];
        let transactions = vec![Transaction::new("t1", Some("2"), 10.0, day(1))];

        let report =
            reconciliation_summary(&orders, &transactions, &DateWindow::all(), DuplicatePolicy::LastSeen);

        // The cancelled order is not settled, so its payment is an orphan.
        assert_eq!(report.counts.missing_tx, 1);
        assert_eq!(report.counts.orphan_tx, 1);
        assert_eq!(report.counts.total, 2);
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = orders_summary(&[Order::new("1", "paid", 1.0, day(1))], &DateWindow::all());
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["totalOrders"], 1);
        assert_eq!(value["byStatus"]["paid"], 1);
        assert_eq!(value["orders"][0]["totalAmount"], 1.0);
    }
}
