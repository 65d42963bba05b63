//! Postgres-backed stock store.
//!
//! The conditional decrement is a single guarded `UPDATE ... WHERE
//! quantity_available >= $2 RETURNING quantity_available`; Postgres row locking
//! makes check and subtract one indivisible step, so no explicit transaction is
//! needed.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StockStoreError |
//! |------------|----------------------|-----------------|
//! | Database (check constraint violation) | `23514` | `Storage` (negative stock or price) |
//! | Database (other) | Any other | `Storage` |
//! | PoolClosed | N/A | `Storage` |
//! | Other | N/A | `Storage` |

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::{Span, instrument};

use stockline_core::Sku;
use stockline_inventory::{DecrementOutcome, StockRecord};

use super::{StockStore, StockStoreError, ensure_positive};

#[derive(Debug, Clone)]
pub struct PostgresStockStore {
    pool: Arc<PgPool>,
}

impl PostgresStockStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }

    /// Catalog ingestion: insert or replace a record.
    #[instrument(skip(self, record), fields(sku = %record.sku), err)]
    pub async fn upsert(&self, record: &StockRecord) -> Result<(), StockStoreError> {
        record
            .validate()
            .map_err(|e| StockStoreError::Storage(e.to_string()))?;
        let unit_price = i64::try_from(record.unit_price)
            .map_err(|_| StockStoreError::Storage(format!("unit price out of range for {}", record.sku)))?;

        sqlx::query(
            r#"
            INSERT INTO stock_records (sku, name, unit_price, quantity_available, visible)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (sku)
            DO UPDATE SET
                name = EXCLUDED.name,
                unit_price = EXCLUDED.unit_price,
                quantity_available = EXCLUDED.quantity_available,
                visible = EXCLUDED.visible,
                updated_at = now()
            "#,
        )
        .bind(record.sku.as_str())
        .bind(&record.name)
        .bind(unit_price)
        .bind(record.quantity_available)
        .bind(record.visible)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("upsert_stock_record", e))?;

        Ok(())
    }
}

#[async_trait]
impl StockStore for PostgresStockStore {
    #[instrument(skip(self, skus), fields(sku_count = skus.len(), found = tracing::field::Empty), err)]
    async fn batch_get(&self, skus: &[Sku]) -> Result<Vec<StockRecord>, StockStoreError> {
        let keys: Vec<String> = skus.iter().map(|s| s.as_str().to_string()).collect();

        let rows = sqlx::query(
            r#"
            SELECT sku, name, unit_price, quantity_available, visible
            FROM stock_records
            WHERE sku = ANY($1)
            "#,
        )
        .bind(&keys)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("batch_get_stock", e))?;

        let records = rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Span::current().record("found", records.len());
        Ok(records)
    }

    #[instrument(skip(self), fields(sku = %sku), err)]
    async fn get(&self, sku: &Sku) -> Result<Option<StockRecord>, StockStoreError> {
        let row = sqlx::query(
            r#"
            SELECT sku, name, unit_price, quantity_available, visible
            FROM stock_records
            WHERE sku = $1
            "#,
        )
        .bind(sku.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_stock", e))?;

        row.as_ref().map(record_from_row).transpose()
    }

    #[instrument(skip(self), fields(sku = %sku, qty), err)]
    async fn conditional_decrement(&self, sku: &Sku, qty: i64) -> Result<DecrementOutcome, StockStoreError> {
        ensure_positive(qty)?;

        let row = sqlx::query(
            r#"
            UPDATE stock_records
            SET quantity_available = quantity_available - $2,
                updated_at = now()
            WHERE sku = $1 AND visible AND quantity_available >= $2
            RETURNING quantity_available
            "#,
        )
        .bind(sku.as_str())
        .bind(qty)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("conditional_decrement", e))?;

        match row {
            Some(row) => {
                let remaining: i64 = row
                    .try_get("quantity_available")
                    .map_err(|e| map_sqlx_error("conditional_decrement", e))?;
                Ok(DecrementOutcome::Applied { remaining })
            }
            None => Ok(DecrementOutcome::Insufficient),
        }
    }

    #[instrument(skip(self), fields(sku = %sku, qty), err)]
    async fn increment(&self, sku: &Sku, qty: i64) -> Result<(), StockStoreError> {
        ensure_positive(qty)?;

        let result = sqlx::query(
            r#"
            UPDATE stock_records
            SET quantity_available = quantity_available + $2,
                updated_at = now()
            WHERE sku = $1
            "#,
        )
        .bind(sku.as_str())
        .bind(qty)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("increment", e))?;

        if result.rows_affected() == 0 {
            return Err(StockStoreError::UnknownSku(sku.clone()));
        }
        Ok(())
    }
}

fn record_from_row(row: &sqlx::postgres::PgRow) -> Result<StockRecord, StockStoreError> {
    let read = |e: sqlx::Error| map_sqlx_error("decode_stock_record", e);

    let sku: String = row.try_get("sku").map_err(read)?;
    let unit_price: i64 = row.try_get("unit_price").map_err(read)?;

    Ok(StockRecord {
        sku: Sku::parse(&sku).map_err(|e| StockStoreError::Storage(e.to_string()))?,
        name: row.try_get("name").map_err(read)?,
        unit_price: u64::try_from(unit_price)
            .map_err(|_| StockStoreError::Storage(format!("negative unit price stored for {sku}")))?,
        quantity_available: row.try_get("quantity_available").map_err(read)?,
        visible: row.try_get("visible").map_err(read)?,
    })
}

/// Map SQLx errors to `StockStoreError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StockStoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23514") => StockStoreError::Storage(format!("check constraint violated: {msg}")),
                _ => StockStoreError::Storage(msg),
            }
        }
        sqlx::Error::PoolClosed => StockStoreError::Storage(format!("connection pool closed in {}", operation)),
        _ => StockStoreError::Storage(format!("sqlx error in {}: {}", operation, err)),
    }
}
