//! Process configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use stockline_infra::{AlertQueueConfig, ReservationConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set when USE_PERSISTENT_STORES=true")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Postgres-backed stores when true, in-memory otherwise.
    pub use_persistent_stores: bool,
    pub database_url: Option<String>,
    pub reservation: ReservationConfig,
    pub alert_queue: AlertQueueConfig,
    /// JSON array of stock records loaded at startup.
    pub catalog_seed_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            use_persistent_stores: false,
            database_url: None,
            reservation: ReservationConfig::default(),
            alert_queue: AlertQueueConfig::default(),
            catalog_seed_path: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset and blank values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(v) = get("BIND_ADDR") {
            config.bind_addr = v.parse().map_err(|_| ConfigError::Invalid {
                var: "BIND_ADDR",
                value: v.clone(),
            })?;
        }

        if let Some(v) = get("USE_PERSISTENT_STORES") {
            config.use_persistent_stores = v.to_lowercase().parse().map_err(|_| ConfigError::Invalid {
                var: "USE_PERSISTENT_STORES",
                value: v.clone(),
            })?;
        }

        config.database_url = get("DATABASE_URL");
        if config.use_persistent_stores && config.database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        if let Some(v) = get("ORDER_DEADLINE_MS") {
            let ms: u64 = v.parse().ok().filter(|ms| *ms > 0).ok_or(ConfigError::Invalid {
                var: "ORDER_DEADLINE_MS",
                value: v.clone(),
            })?;
            config.reservation = config.reservation.with_deadline(Duration::from_millis(ms));
        }

        if let Some(v) = get("ALERT_QUEUE_CAPACITY") {
            let capacity: usize = v.parse().ok().filter(|c| *c > 0).ok_or(ConfigError::Invalid {
                var: "ALERT_QUEUE_CAPACITY",
                value: v.clone(),
            })?;
            config.alert_queue = config.alert_queue.with_capacity(capacity);
        }

        config.catalog_seed_path = get("CATALOG_SEED_PATH").map(PathBuf::from);

        Ok(config)
    }
}
