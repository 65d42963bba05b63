//! Low-stock alert pipeline: bounded queue, single background worker, alert store.
//!
//! Producers never wait on this pipeline. Delivery is best-effort: a full queue
//! drops the newest alert, and a failed insert discards the alert.

pub mod in_memory;
pub mod postgres;
pub mod queue;
pub mod store;
pub mod worker;

pub use in_memory::InMemoryAlertStore;
pub use postgres::PostgresAlertStore;
pub use queue::AlertQueue;
pub use store::{AlertStore, AlertStoreError};
pub use worker::{AlertWorker, AlertWorkerHandle};
