use tokio::sync::mpsc;
use tracing::{debug, warn};

use stockline_events::{Event, EventPublisher, PublishOutcome};
use stockline_inventory::LowStockAlert;

use crate::config::AlertQueueConfig;

/// Producer side of the bounded alert queue.
///
/// `publish` is a `try_send`: it never waits. When the queue is full the alert
/// being published (the newest) is dropped.
#[derive(Debug, Clone)]
pub struct AlertQueue {
    tx: mpsc::Sender<LowStockAlert>,
}

impl AlertQueue {
    /// Create the queue; the receiver goes to `AlertWorker::spawn`.
    pub fn new(config: &AlertQueueConfig) -> (Self, mpsc::Receiver<LowStockAlert>) {
        let (tx, rx) = mpsc::channel(config.capacity.max(1));
        (Self { tx }, rx)
    }

    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }
}

impl EventPublisher<LowStockAlert> for AlertQueue {
    fn publish(&self, alert: LowStockAlert) -> PublishOutcome {
        match self.tx.try_send(alert) {
            Ok(()) => PublishOutcome::Enqueued,
            Err(mpsc::error::TrySendError::Full(alert)) => {
                warn!(
                    event_type = LowStockAlert::EVENT_TYPE,
                    subject = alert.subject(),
                    quantity = alert.quantity_at_alert,
                    "alert queue full, event dropped"
                );
                PublishOutcome::DroppedFull
            }
            Err(mpsc::error::TrySendError::Closed(alert)) => {
                debug!(event_type = LowStockAlert::EVENT_TYPE, subject = alert.subject(), "alert queue closed");
                PublishOutcome::Closed
            }
        }
    }
}
