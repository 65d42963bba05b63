//! Administrative order operations.
//!
//! None of these touch stock: cancelling or deleting an order does not restock.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::info;

use stockline_core::OrderId;
use stockline_infra::OrderLedger;
use stockline_sales::OrderStatus;

use crate::app::{dto, errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/:id", axum::routing::patch(update_order_status).delete(delete_order))
}

fn parse_order_id(raw: &str) -> Result<OrderId, axum::response::Response> {
    raw.parse()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id"))
}

/// GET /admin/orders?limit= - Newest first, default cap 200
pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::LimitQuery>,
) -> axum::response::Response {
    match services.orders.list(query.order_limit()).await {
        Ok(orders) => (StatusCode::OK, Json(orders)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

/// PATCH /admin/orders/:id - Change status (case-insensitive)
pub async fn update_order_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateOrderStatusRequest>,
) -> axum::response::Response {
    let id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let status: OrderStatus = match body.status.parse() {
        Ok(s) => s,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
    };

    match services.orders.update_status(id, status).await {
        Ok(order) => {
            info!(order_id = %id, status = %status, "order status updated");
            (StatusCode::OK, Json(order)).into_response()
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}

/// DELETE /admin/orders/:id
pub async fn delete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.orders.delete(id).await {
        Ok(()) => {
            info!(order_id = %id, "order deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}
