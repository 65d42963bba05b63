//! Per-SKU stock persistence boundary.
//!
//! `StockStore` is the only point of serialization between concurrent orders.
//! Its `conditional_decrement` must be a single indivisible compare-and-subtract
//! at the storage layer; everything else in the reservation path is built on it.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use stockline_core::Sku;
use stockline_inventory::{DecrementOutcome, StockRecord};

pub use in_memory::InMemoryStockStore;
pub use postgres::PostgresStockStore;

/// Stock store operation error (infrastructure only; "not enough stock" is
/// not an error, see `DecrementOutcome::Insufficient`).
#[derive(Debug, Clone, Error)]
pub enum StockStoreError {
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("unknown sku: {0}")]
    UnknownSku(Sku),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Atomic per-SKU stock operations.
#[async_trait]
pub trait StockStore: Send + Sync {
    /// Non-authoritative snapshot of the requested SKUs (unknown SKUs are omitted).
    async fn batch_get(&self, skus: &[Sku]) -> Result<Vec<StockRecord>, StockStoreError>;

    /// Single-record read.
    async fn get(&self, sku: &Sku) -> Result<Option<StockRecord>, StockStoreError>;

    /// Atomically subtract `qty` iff the SKU is visible and
    /// `quantity_available >= qty` at execution time.
    ///
    /// `qty` must be positive. An unknown or hidden SKU is `Insufficient`, never an error.
    async fn conditional_decrement(&self, sku: &Sku, qty: i64) -> Result<DecrementOutcome, StockStoreError>;

    /// Unconditional compensating addition (rollback path).
    async fn increment(&self, sku: &Sku, qty: i64) -> Result<(), StockStoreError>;
}

#[async_trait]
impl<S> StockStore for Arc<S>
where
    S: StockStore + ?Sized,
{
    async fn batch_get(&self, skus: &[Sku]) -> Result<Vec<StockRecord>, StockStoreError> {
        (**self).batch_get(skus).await
    }

    async fn get(&self, sku: &Sku) -> Result<Option<StockRecord>, StockStoreError> {
        (**self).get(sku).await
    }

    async fn conditional_decrement(&self, sku: &Sku, qty: i64) -> Result<DecrementOutcome, StockStoreError> {
        (**self).conditional_decrement(sku, qty).await
    }

    async fn increment(&self, sku: &Sku, qty: i64) -> Result<(), StockStoreError> {
        (**self).increment(sku, qty).await
    }
}

pub(crate) fn ensure_positive(qty: i64) -> Result<(), StockStoreError> {
    if qty <= 0 {
        return Err(StockStoreError::InvalidQuantity(qty));
    }
    Ok(())
}
