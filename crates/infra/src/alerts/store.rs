use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use stockline_inventory::LowStockAlert;

#[derive(Debug, Clone, Error)]
pub enum AlertStoreError {
    #[error("storage error: {0}")]
    Storage(String),
}

/// Append-only alert persistence.
#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn insert_alert(&self, alert: &LowStockAlert) -> Result<(), AlertStoreError>;

    /// Most recent first. `limit == 0` means no limit.
    async fn list_alerts(&self, limit: usize) -> Result<Vec<LowStockAlert>, AlertStoreError>;
}

#[async_trait]
impl<S> AlertStore for Arc<S>
where
    S: AlertStore + ?Sized,
{
    async fn insert_alert(&self, alert: &LowStockAlert) -> Result<(), AlertStoreError> {
        (**self).insert_alert(alert).await
    }

    async fn list_alerts(&self, limit: usize) -> Result<Vec<LowStockAlert>, AlertStoreError> {
        (**self).list_alerts(limit).await
    }
}
