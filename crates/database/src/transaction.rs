//! Payment transaction queries.

use ledger_core::{DateWindow, Transaction};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::TransactionRow;
use crate::timestamp;

/// Insert a transaction.
pub async fn create_transaction(pool: &SqlitePool, tx: &Transaction) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO transactions (id, order_id, amount, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&tx.id)
    .bind(&tx.order_id)
    .bind(tx.amount)
    .bind(timestamp::to_sql(tx.created_at))
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Transaction",
                    id: tx.id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Transactions created inside `window`, oldest first.
///
/// Transactions without an order reference are included; reconciliation
/// skips them.
pub async fn list_transactions(pool: &SqlitePool, window: &DateWindow) -> Result<Vec<Transaction>> {
    let (from, to) = timestamp::bounds(window);

    let rows = sqlx::query_as::<_, TransactionRow>(
        r#"
        SELECT id, order_id, amount, created_at
        FROM transactions
        WHERE (?1 IS NULL OR created_at >= ?1)
          AND (?2 IS NULL OR created_at <= ?2)
        ORDER BY created_at, id
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Transaction::try_from).collect()
}
