//! Inventory domain module.
//!
//! This crate contains business rules for per-SKU stock, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage). The atomic mutation
//! primitives live behind the `StockStore` boundary in infra.

pub mod alert;
pub mod stock;

pub use alert::LowStockAlert;
pub use stock::{DecrementOutcome, LOW_STOCK_THRESHOLD, StockIssue, StockRecord, is_low_stock};
