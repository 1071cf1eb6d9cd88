//! Order queries.

use ledger_core::{DateWindow, Order};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::OrderRow;
use crate::timestamp;

/// Insert an order.
pub async fn create_order(pool: &SqlitePool, order: &Order) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO orders (id, status, total_amount, customer_email, user_id, agent_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&order.id)
    .bind(&order.status)
    .bind(order.total_amount)
    .bind(&order.customer_email)
    .bind(&order.user_id)
    .bind(&order.agent_id)
    .bind(timestamp::to_sql(order.created_at))
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Order",
                    id: order.id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Orders with status `paid` or `completed` created inside `window`.
pub async fn list_settled_orders(pool: &SqlitePool, window: &DateWindow) -> Result<Vec<Order>> {
    let (from, to) = timestamp::bounds(window);

    let rows = sqlx::query_as::<_, OrderRow>(
        r#"
        SELECT id, status, total_amount, customer_email, user_id, agent_id, created_at
        FROM orders
        WHERE status IN ('paid', 'completed')
          AND (?1 IS NULL OR created_at >= ?1)
          AND (?2 IS NULL OR created_at <= ?2)
        ORDER BY created_at, id
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Order::try_from).collect()
}

/// Orders of any status created inside `window`.
pub async fn list_orders(pool: &SqlitePool, window: &DateWindow) -> Result<Vec<Order>> {
    let (from, to) = timestamp::bounds(window);

    let rows = sqlx::query_as::<_, OrderRow>(
        r#"
        SELECT id, status, total_amount, customer_email, user_id, agent_id, created_at
        FROM orders
        WHERE (?1 IS NULL OR created_at >= ?1)
          AND (?2 IS NULL OR created_at <= ?2)
        ORDER BY created_at, id
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Order::try_from).collect()
}
