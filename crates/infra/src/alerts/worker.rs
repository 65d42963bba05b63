use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use stockline_events::Event;
use stockline_inventory::LowStockAlert;

use super::store::AlertStore;

/// Handle to the running alert worker.
#[derive(Debug)]
pub struct AlertWorkerHandle {
    join: JoinHandle<u64>,
}

impl AlertWorkerHandle {
    /// Wait for the worker to drain and stop.
    ///
    /// The worker stops once every `AlertQueue` clone has been dropped and the
    /// buffered alerts are handled. Returns how many alerts were persisted.
    pub async fn join(self) -> u64 {
        self.join.await.unwrap_or(0)
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Single long-lived consumer of the alert queue.
#[derive(Debug)]
pub struct AlertWorker;

impl AlertWorker {
    /// Spawn the worker on the current tokio runtime.
    ///
    /// Alerts are persisted one at a time, in queue order. An insert failure is
    /// logged and the alert is discarded.
    pub fn spawn<S>(rx: mpsc::Receiver<LowStockAlert>, store: S) -> AlertWorkerHandle
    where
        S: AlertStore + 'static,
    {
        AlertWorkerHandle {
            join: tokio::spawn(worker_loop(rx, store)),
        }
    }
}

async fn worker_loop<S>(mut rx: mpsc::Receiver<LowStockAlert>, store: S) -> u64
where
    S: AlertStore,
{
    info!("alert worker started");
    let mut persisted = 0u64;

    while let Some(alert) = rx.recv().await {
        match store.insert_alert(&alert).await {
            Ok(()) => {
                persisted += 1;
                debug!(
                    event_type = LowStockAlert::EVENT_TYPE,
                    alert_id = %alert.id,
                    subject = alert.subject(),
                    lag_ms = alert.age_at(Utc::now()).num_milliseconds(),
                    "low-stock alert persisted"
                );
            }
            Err(err) => {
                warn!(
                    event_type = LowStockAlert::EVENT_TYPE,
                    alert_id = %alert.id,
                    subject = alert.subject(),
                    error = %err,
                    "failed to persist low-stock alert, discarding"
                );
            }
        }
    }

    info!(persisted, "alert worker stopped");
    persisted
}
