//! Withdrawal request queries.

use ledger_core::{DateWindow, WithdrawalRequest};
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::WithdrawalRow;
use crate::timestamp;

/// Insert a withdrawal request.
pub async fn create_withdrawal(pool: &SqlitePool, request: &WithdrawalRequest) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO withdrawal_requests (id, status, amount, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&request.id)
    .bind(&request.status)
    .bind(request.amount)
    .bind(timestamp::to_sql(request.created_at))
    .execute(pool)
    .await?;

    Ok(())
}

/// Withdrawal requests created inside `window`, oldest first.
pub async fn list_withdrawals(
    pool: &SqlitePool,
    window: &DateWindow,
) -> Result<Vec<WithdrawalRequest>> {
    let (from, to) = timestamp::bounds(window);

    let rows = sqlx::query_as::<_, WithdrawalRow>(
        r#"
        SELECT id, status, amount, created_at
        FROM withdrawal_requests
        WHERE (?1 IS NULL OR created_at >= ?1)
          AND (?2 IS NULL OR created_at <= ?2)
        ORDER BY created_at, id
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(WithdrawalRequest::try_from).collect()
}
