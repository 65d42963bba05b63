use serde::{Deserialize, Serialize};

use stockline_core::{DomainError, DomainResult, Sku};

/// Inventory level at or below which a low-stock alert is raised (inclusive).
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Returns true when `remaining` is at or below `threshold`.
pub fn is_low_stock(remaining: i64, threshold: i64) -> bool {
    remaining <= threshold
}

/// Per-SKU stock record as seen by the catalog.
///
/// `quantity_available` is never negative. Outside catalog ingestion it is only
/// mutated through the store's atomic decrement/increment operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub sku: Sku,
    pub name: String,
    /// Price in smallest currency unit.
    pub unit_price: u64,
    pub quantity_available: i64,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

fn visible_by_default() -> bool {
    true
}

impl StockRecord {
    /// Build a visible record, validating the non-negative stock invariant.
    pub fn new(
        sku: Sku,
        name: impl Into<String>,
        unit_price: u64,
        quantity_available: i64,
    ) -> DomainResult<Self> {
        let record = Self {
            sku,
            name: name.into(),
            unit_price,
            quantity_available,
            visible: true,
        };
        record.validate()?;
        Ok(record)
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity_available < 0 {
            return Err(DomainError::validation(format!(
                "stock for {} cannot be negative",
                self.sku
            )));
        }
        Ok(())
    }

    /// Quantity an order may count on, per this (possibly stale) snapshot.
    ///
    /// Hidden records are not sellable.
    pub fn sellable_quantity(&self) -> i64 {
        if self.visible {
            self.quantity_available
        } else {
            0
        }
    }
}

/// A requested quantity that cannot be satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockIssue {
    pub sku: Sku,
    pub requested: i64,
    pub available: i64,
}

impl StockIssue {
    pub fn new(sku: Sku, requested: i64, available: i64) -> Self {
        Self {
            sku,
            requested,
            available,
        }
    }

    pub fn shortfall(&self) -> i64 {
        (self.requested - self.available).max(0)
    }
}

/// Result of a single atomic compare-and-subtract against one stock record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DecrementOutcome {
    /// Quantity was subtracted; `remaining` is the post-state observed by the
    /// same atomic operation.
    Applied { remaining: i64 },
    /// Not enough stock (or unknown SKU); nothing was mutated.
    Insufficient,
}

impl DecrementOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, DecrementOutcome::Applied { .. })
    }

    pub fn remaining(self) -> Option<i64> {
        match self {
            DecrementOutcome::Applied { remaining } => Some(remaining),
            DecrementOutcome::Insufficient => None,
        }
    }
}
