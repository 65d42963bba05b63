use std::time::Duration;

use thiserror::Error;

use stockline_core::DomainError;
use stockline_inventory::StockIssue;

use crate::order_ledger::OrderLedgerError;
use crate::stock_store::StockStoreError;

/// Infrastructure failure on the reservation path.
///
/// Reservations made before the failure have been compensated (best-effort).
#[derive(Debug, Clone, Error)]
pub enum InfraError {
    #[error("storage unavailable: {0}")]
    Storage(String),

    #[error("order placement exceeded its deadline of {0:?}")]
    DeadlineExceeded(Duration),
}

/// Every way `place_order` can fail.
#[derive(Debug, Clone, Error)]
pub enum ReservationError {
    /// Malformed request. Nothing was touched.
    #[error("validation error: {0}")]
    Validation(String),

    /// Some requested quantity cannot be satisfied. Net stock change is zero.
    #[error("insufficient stock for {} sku(s)", issues.len())]
    InsufficientStock { issues: Vec<StockIssue> },

    #[error(transparent)]
    Infra(#[from] InfraError),
}

impl From<DomainError> for ReservationError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => ReservationError::Validation(msg),
            DomainError::InvalidId(msg) => ReservationError::Validation(msg),
            DomainError::NotFound => ReservationError::Validation("referenced entity not found".to_string()),
        }
    }
}

impl From<StockStoreError> for ReservationError {
    fn from(value: StockStoreError) -> Self {
        ReservationError::Infra(InfraError::Storage(value.to_string()))
    }
}

impl From<OrderLedgerError> for ReservationError {
    fn from(value: OrderLedgerError) -> Self {
        ReservationError::Infra(InfraError::Storage(value.to_string()))
    }
}
