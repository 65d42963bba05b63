use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use stockline_core::OrderId;
use stockline_sales::{NewOrder, Order, OrderStatus};

use super::{OrderLedger, OrderLedgerError};

/// In-memory order ledger (tests/dev).
#[derive(Debug, Default)]
pub struct InMemoryOrderLedger {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.orders.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> OrderLedgerError {
    OrderLedgerError::Storage("lock poisoned".to_string())
}

#[async_trait]
impl OrderLedger for InMemoryOrderLedger {
    async fn create(&self, order: NewOrder) -> Result<Order, OrderLedgerError> {
        let order = order.into_order(OrderId::new(), Utc::now());
        let mut map = self.orders.write().map_err(|_| poisoned())?;
        map.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get(&self, id: OrderId) -> Result<Order, OrderLedgerError> {
        let map = self.orders.read().map_err(|_| poisoned())?;
        map.get(&id).cloned().ok_or(OrderLedgerError::NotFound(id))
    }

    async fn list(&self, limit: usize) -> Result<Vec<Order>, OrderLedgerError> {
        let map = self.orders.read().map_err(|_| poisoned())?;
        let mut orders: Vec<Order> = map.values().cloned().collect();
        // v7 ids break ties between orders stamped in the same instant
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        orders.truncate(limit);
        Ok(orders)
    }

    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, OrderLedgerError> {
        let mut map = self.orders.write().map_err(|_| poisoned())?;
        let order = map.get_mut(&id).ok_or(OrderLedgerError::NotFound(id))?;
        order.status = status;
        Ok(order.clone())
    }

    async fn delete(&self, id: OrderId) -> Result<(), OrderLedgerError> {
        let mut map = self.orders.write().map_err(|_| poisoned())?;
        map.remove(&id).map(|_| ()).ok_or(OrderLedgerError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockline_core::{Sku, UserId};
    use stockline_inventory::StockRecord;
    use stockline_sales::{OrderRequest, OrderRequestLine, ShippingInfo};

    fn new_order(qty: i64) -> NewOrder {
        let request = OrderRequest::merge(&[OrderRequestLine::new("BRK-001", qty)]).unwrap();
        let catalog = [StockRecord::new(Sku::parse("BRK-001").unwrap(), "Brake pad", 1500, 100).unwrap()];
        NewOrder::priced(UserId::new(), &request, &catalog, ShippingInfo::default()).unwrap()
    }

    #[tokio::test]
    async fn create_assigns_id_and_pending_status() {
        let ledger = InMemoryOrderLedger::new();
        let order = ledger.create(new_order(2)).await.unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_price, 3000);
        assert_eq!(ledger.get(order.id).await.unwrap(), order);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_capped() {
        let ledger = InMemoryOrderLedger::new();
        let first = ledger.create(new_order(1)).await.unwrap();
        let second = ledger.create(new_order(2)).await.unwrap();
        let third = ledger.create(new_order(3)).await.unwrap();

        let listed = ledger.list(2).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, third.id);
        assert_eq!(listed[1].id, second.id);

        let all = ledger.list(200).await.unwrap();
        assert_eq!(all.last().unwrap().id, first.id);
    }

    #[tokio::test]
    async fn update_status_changes_only_status() {
        let ledger = InMemoryOrderLedger::new();
        let order = ledger.create(new_order(1)).await.unwrap();

        let updated = ledger.update_status(order.id, OrderStatus::Cancelled).await.unwrap();
        assert_eq!(updated.status, OrderStatus::Cancelled);
        assert_eq!(updated.items, order.items);
        assert_eq!(updated.created_at, order.created_at);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let ledger = InMemoryOrderLedger::new();
        let id = OrderId::new();
        assert!(matches!(ledger.get(id).await, Err(OrderLedgerError::NotFound(_))));
        assert!(matches!(
            ledger.update_status(id, OrderStatus::Shipped).await,
            Err(OrderLedgerError::NotFound(_))
        ));
        assert!(matches!(ledger.delete(id).await, Err(OrderLedgerError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_the_order() {
        let ledger = InMemoryOrderLedger::new();
        let order = ledger.create(new_order(1)).await.unwrap();
        ledger.delete(order.id).await.unwrap();
        assert!(ledger.is_empty());
    }
}
