//! Order placement: reserve stock across SKUs, then persist the order.
//!
//! ```text
//! PlaceOrder
//!   ↓
//! 1. Validate and merge lines (no side effects)
//!   ↓
//! 2. batch_get snapshot (trusted prices, advisory availability)
//!   ↓
//! 3. Advisory pass: any shortfall fails fast, nothing reserved
//!   ↓
//! 4. conditional_decrement per SKU, pushing (sku, qty) on the undo stack
//!      ↳ low-stock alert published after each qualifying decrement
//!   ↓
//! 5. OrderLedger::create
//! ```
//!
//! Steps 2 through 5 run under one deadline. Any failure after the first
//! reservation unwinds the undo stack via `increment`, so stock is either
//! reserved for a persisted order or not reserved at all. The undo stack lives
//! outside the timed future and is still unwound when the deadline fires.
//!
//! The store's conditional decrement is the only serialization point; the
//! coordinator holds no locks and concurrent calls proceed independently.

use chrono::Utc;
use tracing::{debug, error, info, warn};

use stockline_core::{Sku, UserId};
use stockline_events::{CompensationStack, EventPublisher};
use stockline_inventory::{DecrementOutcome, LowStockAlert, StockIssue, StockRecord, is_low_stock};
use stockline_sales::{NewOrder, Order, OrderRequest, PlaceOrder, ShippingInfo};

use crate::config::ReservationConfig;
use crate::order_ledger::OrderLedger;
use crate::stock_store::StockStore;

use super::error::{InfraError, ReservationError};

/// Compensation for one successful decrement.
type Reservation = (Sku, i64);

/// Failure inside the timed section, before compensation.
enum Abort {
    /// A decrement lost the race against the advisory snapshot.
    LostRace { sku: Sku, requested: i64 },
    Failed(ReservationError),
}

impl From<ReservationError> for Abort {
    fn from(value: ReservationError) -> Self {
        Abort::Failed(value)
    }
}

pub struct ReservationCoordinator<S, L, P> {
    stock: S,
    ledger: L,
    alerts: P,
    config: ReservationConfig,
}

impl<S, L, P> ReservationCoordinator<S, L, P>
where
    S: StockStore,
    L: OrderLedger,
    P: EventPublisher<LowStockAlert>,
{
    pub fn new(stock: S, ledger: L, alerts: P, config: ReservationConfig) -> Self {
        Self {
            stock,
            ledger,
            alerts,
            config,
        }
    }

    pub fn config(&self) -> &ReservationConfig {
        &self.config
    }

    /// Turn a submission into a persisted `Pending` order, or fail with zero net
    /// stock change.
    pub async fn place_order(&self, cmd: &PlaceOrder) -> Result<Order, ReservationError> {
        let (user_id, request, shipping) = cmd.validate()?;

        let mut undo: CompensationStack<Reservation> = CompensationStack::new();
        let attempt = tokio::time::timeout(
            self.config.deadline,
            self.reserve_and_persist(user_id, &request, shipping, &mut undo),
        )
        .await;

        match attempt {
            Ok(Ok(order)) => {
                let reserved = undo.commit();
                info!(
                    order_id = %order.id,
                    user_id = %order.user_id,
                    lines = reserved,
                    total = order.total_price,
                    "order placed"
                );
                Ok(order)
            }
            Ok(Err(Abort::LostRace { sku, requested })) => {
                self.compensate(&mut undo).await;
                let available = self.current_availability(&sku).await;
                info!(sku = %sku, requested, available, "reservation lost race, order rolled back");
                Err(ReservationError::InsufficientStock {
                    issues: vec![StockIssue::new(sku, requested, available)],
                })
            }
            Ok(Err(Abort::Failed(err))) => {
                self.compensate(&mut undo).await;
                if let ReservationError::Infra(ref infra) = err {
                    warn!(error = %infra, "order placement failed, reservations rolled back");
                }
                Err(err)
            }
            Err(_elapsed) => {
                self.compensate(&mut undo).await;
                warn!(deadline = ?self.config.deadline, "order placement timed out, reservations rolled back");
                Err(InfraError::DeadlineExceeded(self.config.deadline).into())
            }
        }
    }

    async fn reserve_and_persist(
        &self,
        user_id: UserId,
        request: &OrderRequest,
        shipping: ShippingInfo,
        undo: &mut CompensationStack<Reservation>,
    ) -> Result<Order, Abort> {
        let catalog = self
            .stock
            .batch_get(&request.skus())
            .await
            .map_err(ReservationError::from)?;

        let issues = advisory_issues(request, &catalog);
        if !issues.is_empty() {
            debug!(issue_count = issues.len(), "advisory availability check failed");
            return Err(ReservationError::InsufficientStock { issues }.into());
        }

        // Prices come from the snapshot; pricing before reserving keeps overflow
        // failures free of side effects.
        let new_order = NewOrder::priced(user_id, request, &catalog, shipping).map_err(ReservationError::from)?;

        for line in request.lines() {
            match self
                .stock
                .conditional_decrement(&line.sku, line.quantity)
                .await
                .map_err(ReservationError::from)?
            {
                DecrementOutcome::Applied { remaining } => {
                    undo.push((line.sku.clone(), line.quantity));
                    self.maybe_alert(&line.sku, &catalog, remaining);
                }
                DecrementOutcome::Insufficient => {
                    return Err(Abort::LostRace {
                        sku: line.sku.clone(),
                        requested: line.quantity,
                    });
                }
            }
        }

        let order = self.ledger.create(new_order).await.map_err(ReservationError::from)?;
        Ok(order)
    }

    fn maybe_alert(&self, sku: &Sku, catalog: &[StockRecord], remaining: i64) {
        if !is_low_stock(remaining, self.config.low_stock_threshold) {
            return;
        }
        let name = catalog
            .iter()
            .find(|r| &r.sku == sku)
            .map(|r| r.name.clone())
            .unwrap_or_default();
        let outcome = self.alerts.publish(LowStockAlert::new(sku.clone(), name, remaining, Utc::now()));
        debug!(sku = %sku, remaining, ?outcome, "low-stock alert published");
    }

    /// Undo every recorded reservation, newest first.
    ///
    /// A failed compensation cannot be retried here; it is logged for manual
    /// reconciliation and the rest of the stack is still unwound.
    async fn compensate(&self, undo: &mut CompensationStack<Reservation>) {
        for (sku, qty) in undo.unwind() {
            if let Err(err) = self.stock.increment(&sku, qty).await {
                error!(sku = %sku, qty, error = %err, "compensating increment failed, stock needs reconciliation");
            }
        }
    }

    /// Sellable quantity right now, for describing a lost race.
    async fn current_availability(&self, sku: &Sku) -> i64 {
        match self.stock.get(sku).await {
            Ok(record) => record.map(|r| r.sellable_quantity()).unwrap_or(0),
            Err(err) => {
                warn!(sku = %sku, error = %err, "failed to re-read stock after lost race");
                0
            }
        }
    }
}

/// Shortfalls according to the (possibly stale) snapshot.
///
/// A SKU that is missing or hidden counts as available 0.
fn advisory_issues(request: &OrderRequest, catalog: &[StockRecord]) -> Vec<StockIssue> {
    request
        .lines()
        .iter()
        .filter_map(|line| {
            let available = catalog
                .iter()
                .find(|r| r.sku == line.sku)
                .map(StockRecord::sellable_quantity)
                .unwrap_or(0);
            (line.quantity > available).then(|| StockIssue::new(line.sku.clone(), line.quantity, available))
        })
        .collect()
}
