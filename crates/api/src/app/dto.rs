use serde::{Deserialize, Serialize};

use stockline_core::OrderId;

// -------------------------
// Request DTOs
// -------------------------

/// `PATCH /admin/orders/:id` body.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

/// `?limit=` on listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// Default cap for the admin order listing.
pub const DEFAULT_ORDER_LIST_LIMIT: usize = 200;

impl LimitQuery {
    /// Orders: absent or zero means the default cap.
    pub fn order_limit(&self) -> usize {
        match self.limit {
            Some(n) if n > 0 => n,
            _ => DEFAULT_ORDER_LIST_LIMIT,
        }
    }

    /// Alerts: absent or zero means everything.
    pub fn alert_limit(&self) -> usize {
        self.limit.unwrap_or(0)
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlacedResponse {
    pub order_id: OrderId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_limit_defaults_to_cap() {
        assert_eq!(LimitQuery::default().order_limit(), 200);
        assert_eq!(LimitQuery { limit: Some(0) }.order_limit(), 200);
        assert_eq!(LimitQuery { limit: Some(5) }.order_limit(), 5);
    }

    #[test]
    fn alert_limit_zero_means_all() {
        assert_eq!(LimitQuery::default().alert_limit(), 0);
        assert_eq!(LimitQuery { limit: Some(3) }.alert_limit(), 3);
    }
}
