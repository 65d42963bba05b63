//! Postgres schema bootstrap.

use sqlx::PgPool;
use tracing::info;

/// Idempotent DDL for stock records, orders and low-stock alerts.
pub const SCHEMA_SQL: &str = include_str!("../migrations/0001_stockline.sql");

/// Apply the schema; safe to run on every startup.
pub async fn apply_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    info!("database schema applied");
    Ok(())
}
