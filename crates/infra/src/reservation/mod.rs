//! Saga-style order placement over per-SKU atomic stock operations.

pub mod coordinator;
pub mod error;

pub use coordinator::ReservationCoordinator;
pub use error::{InfraError, ReservationError};
