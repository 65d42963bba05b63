use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockline_core::{DomainError, DomainResult, OrderId, Sku, UserId};
use stockline_inventory::StockRecord;

use crate::request::{OrderRequest, ShippingInfo};

/// Order status lifecycle.
///
/// Transitions are administrative; the core only ever creates `Pending` orders.
/// No status change (including `Cancelled`) returns stock to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::validation(format!(
                "unknown order status '{other}' (expected one of: pending, processing, shipped, completed, cancelled)"
            ))),
        }
    }
}

/// Order line: catalog-trusted name and price captured at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub sku: Sku,
    pub name: String,
    /// Price in smallest currency unit.
    pub unit_price: u64,
    pub quantity: i64,
}

impl OrderLine {
    pub fn line_total(&self) -> DomainResult<u64> {
        let qty = u64::try_from(self.quantity)
            .map_err(|_| DomainError::validation(format!("negative quantity for {}", self.sku)))?;
        self.unit_price
            .checked_mul(qty)
            .ok_or_else(|| DomainError::validation(format!("line total overflow for {}", self.sku)))
    }
}

/// Price a merged request from catalog records (never from caller hints).
///
/// Lines follow the request's SKU order. A SKU missing from `catalog` is a
/// validation failure; callers are expected to have checked availability first.
pub fn price_lines(request: &OrderRequest, catalog: &[StockRecord]) -> DomainResult<Vec<OrderLine>> {
    request
        .lines()
        .iter()
        .map(|req| {
            let record = catalog
                .iter()
                .find(|r| r.sku == req.sku)
                .ok_or_else(|| DomainError::validation(format!("unknown sku {}", req.sku)))?;
            Ok(OrderLine {
                sku: req.sku.clone(),
                name: record.name.clone(),
                unit_price: record.unit_price,
                quantity: req.quantity,
            })
        })
        .collect()
}

/// Sum of `unit_price * quantity` across lines (checked).
pub fn order_total(lines: &[OrderLine]) -> DomainResult<u64> {
    lines.iter().try_fold(0u64, |acc, line| {
        acc.checked_add(line.line_total()?)
            .ok_or_else(|| DomainError::validation("order total overflow"))
    })
}

/// A priced order that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    user_id: UserId,
    items: Vec<OrderLine>,
    total_price: u64,
    shipping: ShippingInfo,
}

impl NewOrder {
    /// Build a new order, enforcing `total_price == Σ unit_price × quantity`.
    pub fn new(user_id: UserId, items: Vec<OrderLine>, total_price: u64, shipping: ShippingInfo) -> DomainResult<Self> {
        if items.is_empty() {
            return Err(DomainError::validation("order must have at least one line"));
        }
        let expected = order_total(&items)?;
        if expected != total_price {
            return Err(DomainError::validation(format!(
                "order total mismatch (expected {expected}, got {total_price})"
            )));
        }
        Ok(Self {
            user_id,
            items,
            total_price,
            shipping,
        })
    }

    /// Price from catalog and build in one step.
    pub fn priced(
        user_id: UserId,
        request: &OrderRequest,
        catalog: &[StockRecord],
        shipping: ShippingInfo,
    ) -> DomainResult<Self> {
        let items = price_lines(request, catalog)?;
        let total = order_total(&items)?;
        Self::new(user_id, items, total, shipping)
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn items(&self) -> &[OrderLine] {
        &self.items
    }

    pub fn total_price(&self) -> u64 {
        self.total_price
    }

    pub fn shipping(&self) -> &ShippingInfo {
        &self.shipping
    }

    /// Assign identity and creation time; every new order starts `Pending`.
    pub fn into_order(self, id: OrderId, created_at: DateTime<Utc>) -> Order {
        Order {
            id,
            user_id: self.user_id,
            items: self.items,
            total_price: self.total_price,
            status: OrderStatus::Pending,
            shipping_address: self.shipping.shipping_address,
            contact_info: self.shipping.contact_info,
            created_at,
        }
    }
}

/// Persisted order record.
///
/// Everything except `status` is fixed at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderLine>,
    pub total_price: u64,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub contact_info: String,
    pub created_at: DateTime<Utc>,
}
