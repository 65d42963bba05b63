//! Order persistence.
//!
//! `create` is the only call made on the reservation path; the rest are
//! administrative. Nothing here touches stock: cancelling or deleting an order
//! does not restock.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use stockline_core::OrderId;
use stockline_sales::{NewOrder, Order, OrderStatus};

pub use in_memory::InMemoryOrderLedger;
pub use postgres::PostgresOrderLedger;

#[derive(Debug, Clone, Error)]
pub enum OrderLedgerError {
    #[error("order not found: {0}")]
    NotFound(OrderId),

    #[error("storage error: {0}")]
    Storage(String),
}

#[async_trait]
pub trait OrderLedger: Send + Sync {
    /// Assign an id, stamp `created_at`, persist as `Pending` and return the stored record.
    async fn create(&self, order: NewOrder) -> Result<Order, OrderLedgerError>;

    async fn get(&self, id: OrderId) -> Result<Order, OrderLedgerError>;

    /// Most recent first, at most `limit` orders.
    async fn list(&self, limit: usize) -> Result<Vec<Order>, OrderLedgerError>;

    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, OrderLedgerError>;

    async fn delete(&self, id: OrderId) -> Result<(), OrderLedgerError>;
}

#[async_trait]
impl<L> OrderLedger for Arc<L>
where
    L: OrderLedger + ?Sized,
{
    async fn create(&self, order: NewOrder) -> Result<Order, OrderLedgerError> {
        (**self).create(order).await
    }

    async fn get(&self, id: OrderId) -> Result<Order, OrderLedgerError> {
        (**self).get(id).await
    }

    async fn list(&self, limit: usize) -> Result<Vec<Order>, OrderLedgerError> {
        (**self).list(limit).await
    }

    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, OrderLedgerError> {
        (**self).update_status(id, status).await
    }

    async fn delete(&self, id: OrderId) -> Result<(), OrderLedgerError> {
        (**self).delete(id).await
    }
}
