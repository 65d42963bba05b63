use std::path::Path;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::info;

use stockline_inventory::StockRecord;
use stockline_infra::alerts::{InMemoryAlertStore, PostgresAlertStore};
use stockline_infra::order_ledger::{InMemoryOrderLedger, PostgresOrderLedger};
use stockline_infra::stock_store::{InMemoryStockStore, PostgresStockStore};
use stockline_infra::{
    AlertQueue, AlertStore, AlertWorker, AlertWorkerHandle, OrderLedger, ReservationCoordinator, StockStore,
    StockStoreError,
};

use crate::config::{AppConfig, ConfigError};

pub type SharedStockStore = Arc<dyn StockStore>;
pub type SharedOrderLedger = Arc<dyn OrderLedger>;
pub type SharedAlertStore = Arc<dyn AlertStore>;
pub type Coordinator = ReservationCoordinator<SharedStockStore, SharedOrderLedger, AlertQueue>;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to read catalog seed {path}: {message}")]
    Seed { path: String, message: String },

    #[error("failed to load catalog: {0}")]
    Catalog(#[from] StockStoreError),
}

/// Everything the handlers need, shared behind one `Arc`.
///
/// Constructed once at startup; the alert worker is started here and runs
/// for the life of the process.
pub struct AppServices {
    pub coordinator: Arc<Coordinator>,
    pub orders: SharedOrderLedger,
    pub alerts: SharedAlertStore,
    alert_worker: AlertWorkerHandle,
}

impl AppServices {
    /// Wire stores, start the alert worker and build the coordinator.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        config: &AppConfig,
        stock: SharedStockStore,
        orders: SharedOrderLedger,
        alerts: SharedAlertStore,
    ) -> Self {
        let (queue, rx) = AlertQueue::new(&config.alert_queue);
        let alert_worker = AlertWorker::spawn(rx, alerts.clone());
        let coordinator = Arc::new(ReservationCoordinator::new(
            stock,
            orders.clone(),
            queue,
            config.reservation.clone(),
        ));

        Self {
            coordinator,
            orders,
            alerts,
            alert_worker,
        }
    }

    /// In-memory stores pre-loaded with `catalog` (tests/dev).
    pub fn in_memory(config: &AppConfig, catalog: Vec<StockRecord>) -> Result<Self, BootstrapError> {
        let stock = Arc::new(InMemoryStockStore::with_records(catalog)?);
        Ok(Self::new(
            config,
            stock,
            Arc::new(InMemoryOrderLedger::new()),
            Arc::new(InMemoryAlertStore::new()),
        ))
    }

    pub fn alert_worker_running(&self) -> bool {
        !self.alert_worker.is_finished()
    }
}

/// Build services from configuration (Postgres or in-memory).
pub async fn build_services(config: &AppConfig) -> Result<AppServices, BootstrapError> {
    let catalog = match &config.catalog_seed_path {
        Some(path) => load_catalog_seed(path)?,
        None => Vec::new(),
    };

    if !config.use_persistent_stores {
        info!(seeded = catalog.len(), "using in-memory stores");
        return AppServices::in_memory(config, catalog);
    }

    let database_url = config
        .database_url
        .as_deref()
        .ok_or(ConfigError::Missing("DATABASE_URL"))?;
    let pool = PgPoolOptions::new().max_connections(16).connect(database_url).await?;
    stockline_infra::schema::apply_schema(&pool).await?;

    let stock = PostgresStockStore::new(pool.clone());
    for record in &catalog {
        stock.upsert(record).await?;
    }
    info!(seeded = catalog.len(), "using postgres stores");

    Ok(AppServices::new(
        config,
        Arc::new(stock),
        Arc::new(PostgresOrderLedger::new(pool.clone())),
        Arc::new(PostgresAlertStore::new(pool)),
    ))
}

/// Read a JSON array of stock records (camelCase keys).
pub fn load_catalog_seed(path: &Path) -> Result<Vec<StockRecord>, BootstrapError> {
    let seed_error = |message: String| BootstrapError::Seed {
        path: path.display().to_string(),
        message,
    };
    let raw = std::fs::read_to_string(path).map_err(|e| seed_error(e.to_string()))?;
    let records: Vec<StockRecord> = serde_json::from_str(&raw).map_err(|e| seed_error(e.to_string()))?;
    for record in &records {
        record.validate().map_err(|e| seed_error(e.to_string()))?;
    }
    Ok(records)
}
