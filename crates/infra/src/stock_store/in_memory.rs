use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use stockline_core::Sku;
use stockline_inventory::{DecrementOutcome, StockRecord};

use super::{StockStore, StockStoreError, ensure_positive};

/// In-memory stock store.
///
/// Intended for tests/dev. Every mutation runs entirely under the write lock,
/// which makes the compare-and-subtract indivisible; the lock is never held
/// across an await point.
#[derive(Debug, Default)]
pub struct InMemoryStockStore {
    records: RwLock<HashMap<Sku, StockRecord>>,
}

impl InMemoryStockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-loaded with catalog records (later duplicates win).
    pub fn with_records(records: impl IntoIterator<Item = StockRecord>) -> Result<Self, StockStoreError> {
        let store = Self::new();
        for r in records {
            store.upsert(r)?;
        }
        Ok(store)
    }

    /// Catalog ingestion: insert or replace a record.
    pub fn upsert(&self, record: StockRecord) -> Result<(), StockStoreError> {
        record
            .validate()
            .map_err(|e| StockStoreError::Storage(e.to_string()))?;
        let mut map = self
            .records
            .write()
            .map_err(|_| StockStoreError::Storage("lock poisoned".to_string()))?;
        map.insert(record.sku.clone(), record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StockStore for InMemoryStockStore {
    async fn batch_get(&self, skus: &[Sku]) -> Result<Vec<StockRecord>, StockStoreError> {
        let map = self
            .records
            .read()
            .map_err(|_| StockStoreError::Storage("lock poisoned".to_string()))?;
        Ok(skus.iter().filter_map(|s| map.get(s).cloned()).collect())
    }

    async fn get(&self, sku: &Sku) -> Result<Option<StockRecord>, StockStoreError> {
        let map = self
            .records
            .read()
            .map_err(|_| StockStoreError::Storage("lock poisoned".to_string()))?;
        Ok(map.get(sku).cloned())
    }

    async fn conditional_decrement(&self, sku: &Sku, qty: i64) -> Result<DecrementOutcome, StockStoreError> {
        ensure_positive(qty)?;
        let mut map = self
            .records
            .write()
            .map_err(|_| StockStoreError::Storage("lock poisoned".to_string()))?;

        match map.get_mut(sku) {
            Some(record) if record.visible && record.quantity_available >= qty => {
                record.quantity_available -= qty;
                Ok(DecrementOutcome::Applied {
                    remaining: record.quantity_available,
                })
            }
            _ => Ok(DecrementOutcome::Insufficient),
        }
    }

    async fn increment(&self, sku: &Sku, qty: i64) -> Result<(), StockStoreError> {
        ensure_positive(qty)?;
        let mut map = self
            .records
            .write()
            .map_err(|_| StockStoreError::Storage("lock poisoned".to_string()))?;

        let record = map
            .get_mut(sku)
            .ok_or_else(|| StockStoreError::UnknownSku(sku.clone()))?;
        record.quantity_available = record
            .quantity_available
            .checked_add(qty)
            .ok_or_else(|| StockStoreError::Storage(format!("stock overflow for {sku}")))?;
        Ok(())
    }
}
