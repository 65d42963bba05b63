use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockline_core::{AlertId, Sku};
use stockline_events::Event;

/// Event: stock for a SKU dropped to or below the low-stock threshold.
///
/// One alert per qualifying decrement. Alerts are immutable facts; the core
/// never updates or deletes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockAlert {
    pub id: AlertId,
    pub sku: Sku,
    pub name: String,
    pub quantity_at_alert: i64,
    pub timestamp: DateTime<Utc>,
}

impl LowStockAlert {
    pub fn new(sku: Sku, name: impl Into<String>, quantity_at_alert: i64, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: AlertId::new(),
            sku,
            name: name.into(),
            quantity_at_alert,
            timestamp,
        }
    }
}

impl Event for LowStockAlert {
    const EVENT_TYPE: &'static str = "inventory.stock.low";

    fn subject(&self) -> &str {
        self.sku.as_str()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
