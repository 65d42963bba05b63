//! Postgres-backed order ledger.
//!
//! Order lines are stored as a JSONB array of `OrderLine` (camelCase keys);
//! status is the lowercase enum name, constrained by a CHECK.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::{Span, instrument};

use stockline_core::{OrderId, UserId};
use stockline_sales::{NewOrder, Order, OrderLine, OrderStatus};

use super::{OrderLedger, OrderLedgerError};

#[derive(Debug, Clone)]
pub struct PostgresOrderLedger {
    pool: Arc<PgPool>,
}

impl PostgresOrderLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }
}

const ORDER_COLUMNS: &str =
    "order_id, user_id, items, total_price, status, shipping_address, contact_info, created_at";

#[async_trait]
impl OrderLedger for PostgresOrderLedger {
    #[instrument(skip(self, order), fields(user_id = %order.user_id(), order_id = tracing::field::Empty), err)]
    async fn create(&self, order: NewOrder) -> Result<Order, OrderLedgerError> {
        let order = order.into_order(OrderId::new(), Utc::now());
        Span::current().record("order_id", tracing::field::display(order.id));

        let items = serde_json::to_value(&order.items)
            .map_err(|e| OrderLedgerError::Storage(format!("failed to encode order lines: {e}")))?;
        let total = i64::try_from(order.total_price)
            .map_err(|_| OrderLedgerError::Storage(format!("total out of range for order {}", order.id)))?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                order_id,
                user_id,
                items,
                total_price,
                status,
                shipping_address,
                contact_info,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(*order.id.as_uuid())
        .bind(*order.user_id.as_uuid())
        .bind(&items)
        .bind(total)
        .bind(order.status.as_str())
        .bind(&order.shipping_address)
        .bind(&order.contact_info)
        .bind(order.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_order", e))?;

        Ok(order)
    }

    #[instrument(skip(self), fields(order_id = %id), err)]
    async fn get(&self, id: OrderId) -> Result<Order, OrderLedgerError> {
        let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1"))
            .bind(*id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_order", e))?;

        match row {
            Some(row) => order_from_row(&row),
            None => Err(OrderLedgerError::NotFound(id)),
        }
    }

    #[instrument(skip(self), err)]
    async fn list(&self, limit: usize) -> Result<Vec<Order>, OrderLedgerError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, order_id DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_orders", e))?;

        rows.iter().map(order_from_row).collect()
    }

    #[instrument(skip(self), fields(order_id = %id, status = %status), err)]
    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, OrderLedgerError> {
        let row = sqlx::query(&format!(
            "UPDATE orders SET status = $2 WHERE order_id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(*id.as_uuid())
        .bind(status.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_order_status", e))?;

        match row {
            Some(row) => order_from_row(&row),
            None => Err(OrderLedgerError::NotFound(id)),
        }
    }

    #[instrument(skip(self), fields(order_id = %id), err)]
    async fn delete(&self, id: OrderId) -> Result<(), OrderLedgerError> {
        let result = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(*id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_order", e))?;

        if result.rows_affected() == 0 {
            return Err(OrderLedgerError::NotFound(id));
        }
        Ok(())
    }
}

fn order_from_row(row: &sqlx::postgres::PgRow) -> Result<Order, OrderLedgerError> {
    let read = |e: sqlx::Error| map_sqlx_error("decode_order", e);

    let id = OrderId::from_uuid(row.try_get("order_id").map_err(read)?);
    let items: serde_json::Value = row.try_get("items").map_err(read)?;
    let items: Vec<OrderLine> = serde_json::from_value(items)
        .map_err(|e| OrderLedgerError::Storage(format!("failed to decode lines of order {id}: {e}")))?;
    let total: i64 = row.try_get("total_price").map_err(read)?;
    let status: String = row.try_get("status").map_err(read)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(read)?;

    Ok(Order {
        id,
        user_id: UserId::from_uuid(row.try_get("user_id").map_err(read)?),
        items,
        total_price: u64::try_from(total)
            .map_err(|_| OrderLedgerError::Storage(format!("negative total stored for order {id}")))?,
        status: status
            .parse::<OrderStatus>()
            .map_err(|e: stockline_core::DomainError| OrderLedgerError::Storage(e.to_string()))?,
        shipping_address: row.try_get("shipping_address").map_err(read)?,
        contact_info: row.try_get("contact_info").map_err(read)?,
        created_at,
    })
}

/// Map SQLx errors to `OrderLedgerError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> OrderLedgerError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                // order ids are fresh v7 uuids; a collision means a broken id source
                Some("23505") => OrderLedgerError::Storage(format!("duplicate order id: {msg}")),
                Some("23514") => OrderLedgerError::Storage(format!("check constraint violated: {msg}")),
                _ => OrderLedgerError::Storage(msg),
            }
        }
        sqlx::Error::PoolClosed => OrderLedgerError::Storage(format!("connection pool closed in {}", operation)),
        _ => OrderLedgerError::Storage(format!("sqlx error in {}: {}", operation, err)),
    }
}
