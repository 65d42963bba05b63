use std::sync::RwLock;

use async_trait::async_trait;

use stockline_inventory::LowStockAlert;

use super::store::{AlertStore, AlertStoreError};

/// In-memory alert store (tests/dev). Keeps insertion order.
#[derive(Debug, Default)]
pub struct InMemoryAlertStore {
    alerts: RwLock<Vec<LowStockAlert>>,
}

impl InMemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.alerts.read().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AlertStore for InMemoryAlertStore {
    async fn insert_alert(&self, alert: &LowStockAlert) -> Result<(), AlertStoreError> {
        let mut alerts = self
            .alerts
            .write()
            .map_err(|_| AlertStoreError::Storage("lock poisoned".to_string()))?;
        alerts.push(alert.clone());
        Ok(())
    }

    async fn list_alerts(&self, limit: usize) -> Result<Vec<LowStockAlert>, AlertStoreError> {
        let alerts = self
            .alerts
            .read()
            .map_err(|_| AlertStoreError::Storage("lock poisoned".to_string()))?;
        let mut out: Vec<LowStockAlert> = alerts.clone();
        // stable sort: equal timestamps stay newest-inserted first after the reverse
        out.reverse();
        out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if limit > 0 {
            out.truncate(limit);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use stockline_core::Sku;

    fn alert(qty: i64, offset_secs: i64) -> LowStockAlert {
        LowStockAlert::new(
            Sku::parse("BRK-001").unwrap(),
            "Brake pad",
            qty,
            Utc::now() + Duration::seconds(offset_secs),
        )
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let store = InMemoryAlertStore::new();
        store.insert_alert(&alert(5, 0)).await.unwrap();
        store.insert_alert(&alert(3, 10)).await.unwrap();
        store.insert_alert(&alert(4, 5)).await.unwrap();

        let listed = store.list_alerts(0).await.unwrap();
        let quantities: Vec<i64> = listed.iter().map(|a| a.quantity_at_alert).collect();
        assert_eq!(quantities, vec![3, 4, 5]);
    }

    #[tokio::test]
    async fn zero_limit_means_everything() {
        let store = InMemoryAlertStore::new();
        for i in 0..7 {
            store.insert_alert(&alert(i, i)).await.unwrap();
        }
        assert_eq!(store.list_alerts(0).await.unwrap().len(), 7);
        assert_eq!(store.list_alerts(2).await.unwrap().len(), 2);
        assert_eq!(store.list_alerts(2).await.unwrap()[0].quantity_at_alert, 6);
    }
}
