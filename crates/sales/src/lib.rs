//! Sales orders domain module.
//!
//! This crate contains business rules for turning a raw order submission into a
//! trusted, priced order, implemented purely as deterministic domain logic
//! (no IO, no HTTP, no storage).

pub mod order;
pub mod request;

pub use order::{NewOrder, Order, OrderLine, OrderStatus, order_total, price_lines};
pub use request::{OrderRequest, OrderRequestLine, PlaceOrder, RequestedQuantity, ShippingInfo};
