//! Postgres-backed alert store (`low_stock_alerts` table).

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use stockline_core::{AlertId, Sku};
use stockline_inventory::LowStockAlert;

use super::store::{AlertStore, AlertStoreError};

#[derive(Debug, Clone)]
pub struct PostgresAlertStore {
    pool: Arc<PgPool>,
}

impl PostgresAlertStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }
}

#[async_trait]
impl AlertStore for PostgresAlertStore {
    #[instrument(skip(self, alert), fields(alert_id = %alert.id, sku = %alert.sku), err)]
    async fn insert_alert(&self, alert: &LowStockAlert) -> Result<(), AlertStoreError> {
        sqlx::query(
            r#"
            INSERT INTO low_stock_alerts (alert_id, sku, name, quantity_at_alert, alerted_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (alert_id) DO NOTHING
            "#,
        )
        .bind(*alert.id.as_uuid())
        .bind(alert.sku.as_str())
        .bind(&alert.name)
        .bind(alert.quantity_at_alert)
        .bind(alert.timestamp)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_alert", e))?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn list_alerts(&self, limit: usize) -> Result<Vec<LowStockAlert>, AlertStoreError> {
        // LIMIT NULL is "no limit" in Postgres
        let limit: Option<i64> = match limit {
            0 => None,
            n => Some(i64::try_from(n).unwrap_or(i64::MAX)),
        };

        let rows = sqlx::query(
            r#"
            SELECT alert_id, sku, name, quantity_at_alert, alerted_at
            FROM low_stock_alerts
            ORDER BY alerted_at DESC, alert_id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_alerts", e))?;

        rows.iter()
            .map(|row| -> Result<LowStockAlert, AlertStoreError> {
                let read = |e: sqlx::Error| map_sqlx_error("decode_alert", e);
                let sku: String = row.try_get("sku").map_err(read)?;
                Ok(LowStockAlert {
                    id: AlertId::from_uuid(row.try_get("alert_id").map_err(read)?),
                    sku: Sku::parse(&sku).map_err(|e| AlertStoreError::Storage(e.to_string()))?,
                    name: row.try_get("name").map_err(read)?,
                    quantity_at_alert: row.try_get("quantity_at_alert").map_err(read)?,
                    timestamp: row.try_get("alerted_at").map_err(read)?,
                })
            })
            .collect()
    }
}

/// Map SQLx errors to `AlertStoreError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> AlertStoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            AlertStoreError::Storage(format!("database error in {}: {}", operation, db_err.message()))
        }
        sqlx::Error::PoolClosed => AlertStoreError::Storage(format!("connection pool closed in {}", operation)),
        _ => AlertStoreError::Storage(format!("sqlx error in {}: {}", operation, err)),
    }
}
