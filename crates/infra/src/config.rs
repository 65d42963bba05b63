//! Tunables for the reservation path and the alert pipeline.

use std::time::Duration;

use stockline_inventory::LOW_STOCK_THRESHOLD;

/// Reservation coordinator configuration.
#[derive(Debug, Clone)]
pub struct ReservationConfig {
    /// Bound on the whole reserve-then-persist sequence of one order.
    pub deadline: Duration,
    /// Remaining quantity at or below which a low-stock alert is raised.
    pub low_stock_threshold: i64,
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(12),
            low_stock_threshold: LOW_STOCK_THRESHOLD,
        }
    }
}

impl ReservationConfig {
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}

/// Alert queue configuration.
#[derive(Debug, Clone)]
pub struct AlertQueueConfig {
    pub capacity: usize,
}

impl Default for AlertQueueConfig {
    fn default() -> Self {
        Self { capacity: 100 }
    }
}

impl AlertQueueConfig {
    /// Capacity is clamped to at least one slot.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }
}
