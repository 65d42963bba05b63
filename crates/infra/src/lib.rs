//! Infrastructure layer: stores, the alert pipeline and the reservation coordinator.
//!
//! Every store comes as a trait with an in-memory implementation (tests/dev) and
//! a Postgres implementation (`sqlx`, runtime queries).

pub mod alerts;
pub mod config;
pub mod order_ledger;
pub mod reservation;
pub mod schema;
pub mod stock_store;


pub use alerts::{AlertQueue, AlertStore, AlertStoreError, AlertWorker, AlertWorkerHandle};
pub use config::{AlertQueueConfig, ReservationConfig};
pub use order_ledger::{OrderLedger, OrderLedgerError};
pub use reservation::{InfraError, ReservationCoordinator, ReservationError};
pub use stock_store::{StockStore, StockStoreError};
