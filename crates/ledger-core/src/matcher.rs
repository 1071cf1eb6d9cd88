//! Order/transaction matching.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Order, ReconciliationReport, ReconciliationRow, RowStatus, Transaction};

/// Largest absolute amount difference, exclusive, still classified as a match.
pub const MATCH_TOLERANCE: f64 = 0.01;

/// How several transactions referencing one order collapse into one amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The last transaction in input order wins.
    #[default]
    LastSeen,
    /// Amounts are summed; the date is taken from the last transaction.
    Sum,
}

/// Transactions grouped by the order they reference, in input order.
///
/// Transactions without an order id are not indexed.
#[derive(Debug, Default)]
pub struct TransactionIndex<'a> {
    by_order: HashMap<&'a str, Vec<&'a Transaction>>,
}

impl<'a> TransactionIndex<'a> {
    pub fn build(transactions: &'a [Transaction]) -> Self {
        let mut by_order: HashMap<&'a str, Vec<&'a Transaction>> = HashMap::new();
        for tx in transactions {
            if let Some(order_id) = tx.order_id.as_deref() {
                by_order.entry(order_id).or_default().push(tx);
            }
        }
        Self { by_order }
    }

    /// All transactions referencing `order_id`.
    pub fn get(&self, order_id: &str) -> Option<&[&'a Transaction]> {
        self.by_order.get(order_id).map(Vec::as_slice)
    }

    /// Order ids referenced by more than one transaction.
    pub fn duplicated_order_ids(&self) -> Vec<&'a str> {
        let mut ids: Vec<&str> = self
            .by_order
            .iter()
            .filter(|(_, txs)| txs.len() > 1)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn resolve(&self, order_id: &str, policy: DuplicatePolicy) -> Option<Resolved> {
        let txs = self.get(order_id)?;
        let last = txs.last()?;
        let amount = match policy {
            DuplicatePolicy::LastSeen => last.amount,
            DuplicatePolicy::Sum => txs.iter().map(|tx| tx.amount).sum(),
        };
        Some(Resolved {
            amount,
            date: last.created_at,
            count: txs.len(),
        })
    }
}

/// The transaction side of one order, after applying the duplicate policy.
struct Resolved {
    amount: f64,
    date: DateTime<Utc>,
    count: usize,
}

/// Classify an order amount against its transaction amount.
pub fn classify(order_amount: f64, tx_amount: f64) -> RowStatus {
    if (tx_amount - order_amount).abs() < MATCH_TOLERANCE {
        RowStatus::Matched
    } else {
        RowStatus::Mismatch
    }
}

/// Reconcile settled orders against transactions.
///
/// Emits one row per order, in order, followed by one `ORPHAN_TX` row per
/// transaction whose order id names no order in `orders`. Transactions with
/// no order id produce nothing.
pub fn reconcile(
    orders: &[Order],
    transactions: &[Transaction],
    policy: DuplicatePolicy,
) -> ReconciliationReport {
    let index = TransactionIndex::build(transactions);
    let order_ids: HashSet<&str> = orders.iter().map(|o| o.id.as_str()).collect();

    let duplicated = index.duplicated_order_ids();
    if !duplicated.is_empty() {
        tracing::debug!(
            count = duplicated.len(),
            policy = ?policy,
            "Orders referenced by several transactions"
        );
    }

    let mut rows = Vec::with_capacity(orders.len());

    for order in orders {
        let row = match index.resolve(&order.id, policy) {
            Some(tx) => ReconciliationRow {
                order_id: order.id.clone(),
                order_amount: order.total_amount,
                tx_amount: tx.amount,
                diff: (order.total_amount - tx.amount).abs(),
                status: classify(order.total_amount, tx.amount),
                order_date: Some(order.created_at),
                tx_date: Some(tx.date),
                tx_count: tx.count,
            },
            None => ReconciliationRow {
                order_id: order.id.clone(),
                order_amount: order.total_amount,
                tx_amount: 0.0,
                diff: order.total_amount.abs(),
                status: RowStatus::MissingTx,
                order_date: Some(order.created_at),
                tx_date: None,
                tx_count: 0,
            },
        };
        rows.push(row);
    }

    for tx in transactions {
        let Some(order_id) = tx.order_id.as_deref() else {
            continue;
        };
        if order_ids.contains(order_id) {
            continue;
        }
        rows.push(ReconciliationRow {
            order_id: order_id.to_string(),
            order_amount: 0.0,
            tx_amount: tx.amount,
            diff: tx.amount,
            status: RowStatus::OrphanTx,
            order_date: None,
            tx_date: Some(tx.created_at),
            tx_count: 1,
        });
    }

    ReconciliationReport::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StatusCounts;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn order(id: &str, amount: f64) -> Order {
        Order::new(id, "paid", amount, at(0))
    }

    fn tx(id: &str, order_id: Option<&str>, amount: f64) -> Transaction {
        Transaction::new(id, order_id, amount, at(60))
    }

    #[test]
    fn test_scenario_single_match() {
        let report = reconcile(
            &[order("1", 100.0)],
            &[tx("t1", Some("1"), 100.0)],
            DuplicatePolicy::LastSeen,
        );

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].status, RowStatus::Matched);
        assert_eq!(
            report.counts,
            StatusCounts {
                matched: 1,
                mismatched: 0,
                missing_tx: 0,
                orphan_tx: 0,
                total: 1
            }
        );
    }

    #[test]
    fn test_scenario_missing_transaction() {
        let orders = vec![Order::new("2", "completed", 50.0, at(0))];
        let report = reconcile(&orders, &[], DuplicatePolicy::LastSeen);

        let row = &report.rows[0];
        assert_eq!(row.status, RowStatus::MissingTx);
        assert_eq!(row.tx_amount, 0.0);
        assert_eq!(row.diff, 50.0);
        assert_eq!(row.tx_date, None);
        assert_eq!(row.tx_count, 0);
    }

    #[test]
    fn test_scenario_orphan_transaction() {
        let report = reconcile(&[], &[tx("t2", Some("99"), 30.0)], DuplicatePolicy::LastSeen);

        let row = &report.rows[0];
        assert_eq!(row.status, RowStatus::OrphanTx);
        assert_eq!(row.order_id, "99");
        assert_eq!(row.order_amount, 0.0);
        assert_eq!(row.diff, 30.0);
        assert_eq!(row.order_date, None);
        assert_eq!(
            report.counts,
            StatusCounts {
                orphan_tx: 1,
                total: 1,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_threshold_is_strict() {
        assert_eq!(classify(0.0, 0.009999), RowStatus::Matched);
        assert_eq!(classify(100.0, 100.009999), RowStatus::Matched);
        assert_eq!(classify(0.0, 0.01), RowStatus::Mismatch);
        assert_eq!(classify(0.01, 0.0), RowStatus::Mismatch);
    }

    #[test]
    fn test_mismatch_diff_is_absolute() {
        let report = reconcile(
            &[order("1", 80.0)],
            &[tx("t1", Some("1"), 100.0)],
            DuplicatePolicy::LastSeen,
        );
        assert_eq!(report.rows[0].status, RowStatus::Mismatch);
        assert_eq!(report.rows[0].diff, 20.0);
    }

    #[test]
    fn test_orphan_not_counted_against_missing() {
        let report = reconcile(
            &[order("1", 10.0)],
            &[tx("t1", Some("2"), 10.0)],
            DuplicatePolicy::LastSeen,
        );

        assert_eq!(report.counts.missing_tx, 1);
        assert_eq!(report.counts.orphan_tx, 1);
        assert_eq!(report.counts.total, 2);
        assert_eq!(report.rows[0].order_id, "1");
        assert_eq!(report.rows[1].order_id, "2");
    }

    #[test]
    fn test_transactions_without_order_are_ignored() {
        let report = reconcile(&[], &[tx("t1", None, 12.0)], DuplicatePolicy::LastSeen);
        assert!(report.rows.is_empty());
        assert_eq!(report.counts, StatusCounts::default());
    }

    #[test]
    fn test_row_count_completeness() {
        let orders = vec![order("a", 1.0), order("b", 2.0), order("c", 3.0)];
        let transactions = vec![
            tx("t1", Some("a"), 1.0),
            tx("t2", Some("x"), 5.0),
            tx("t3", None, 5.0),
            tx("t4", Some("y"), 6.0),
            tx("t5", Some("b"), 2.5),
        ];

        let report = reconcile(&orders, &transactions, DuplicatePolicy::LastSeen);

        let orphans = transactions
            .iter()
            .filter(|t| matches!(t.order_id.as_deref(), Some(id) if !["a", "b", "c"].contains(&id)))
            .count();
        assert_eq!(report.rows.len(), orders.len() + orphans);
        assert_eq!(report.counts.total, report.rows.len());
        assert_eq!(
            report.counts.matched
                + report.counts.mismatched
                + report.counts.missing_tx
                + report.counts.orphan_tx,
            report.counts.total
        );

        let statuses: Vec<RowStatus> = report.rows.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                RowStatus::Matched,
                RowStatus::Mismatch,
                RowStatus::MissingTx,
                RowStatus::OrphanTx,
                RowStatus::OrphanTx,
            ]
        );
    }

    #[test]
    fn test_duplicates_last_seen_wins() {
        let transactions = vec![tx("capture", Some("1"), 100.0), tx("refund", Some("1"), -40.0)];
        let report = reconcile(&[order("1", 100.0)], &transactions, DuplicatePolicy::LastSeen);

        let row = &report.rows[0];
        assert_eq!(row.tx_amount, -40.0);
        assert_eq!(row.status, RowStatus::Mismatch);
        assert_eq!(row.tx_count, 2);
    }

    #[test]
    fn test_duplicates_summed() {
        let transactions = vec![tx("part-1", Some("1"), 60.0), tx("part-2", Some("1"), 40.0)];
        let report = reconcile(&[order("1", 100.0)], &transactions, DuplicatePolicy::Sum);

        let row = &report.rows[0];
        assert_eq!(row.tx_amount, 100.0);
        assert_eq!(row.status, RowStatus::Matched);
        assert_eq!(row.tx_count, 2);
    }

    #[test]
    fn test_duplicate_orphans_each_emit_a_row() {
        let transactions = vec![tx("t1", Some("9"), 5.0), tx("t2", Some("9"), 5.0)];
        let report = reconcile(&[], &transactions, DuplicatePolicy::Sum);
        assert_eq!(report.counts.orphan_tx, 2);
    }

    #[test]
    fn test_index_reports_duplicates() {
        let transactions = vec![
            tx("t1", Some("b"), 1.0),
            tx("t2", Some("a"), 1.0),
            tx("t3", Some("b"), 1.0),
            tx("t4", Some("a"), 1.0),
            tx("t5", Some("c"), 1.0),
        ];
        let index = TransactionIndex::build(&transactions);
        assert_eq!(index.duplicated_order_ids(), vec!["a", "b"]);
        assert_eq!(index.get("c").map(|txs| txs.len()), Some(1));
        assert!(index.get("zzz").is_none());
    }

    #[test]
    fn test_sort_by_order_id() {
        let mut report = reconcile(
            &[order("b", 1.0), order("a", 1.0)],
            &[tx("t1", Some("0"), 1.0)],
            DuplicatePolicy::LastSeen,
        );
        report.sort_by_order_id();
        let ids: Vec<&str> = report.rows.iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, vec!["0", "a", "b"]);
    }
}
