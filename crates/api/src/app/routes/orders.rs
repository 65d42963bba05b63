use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::error;

use stockline_core::OrderId;
use stockline_infra::OrderLedger;
use stockline_sales::PlaceOrder;

use crate::app::{dto, errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/", post(place_order))
        .route("/:id", get(get_order))
}

/// POST /orders - Reserve stock and create a pending order
pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<PlaceOrder>,
) -> axum::response::Response {
    // Runs detached so a dropped connection cannot interrupt the rollback path.
    let coordinator = services.coordinator.clone();
    let placed = tokio::spawn(async move { coordinator.place_order(&body).await }).await;

    match placed {
        Ok(Ok(order)) => (
            StatusCode::CREATED,
            Json(dto::OrderPlacedResponse { order_id: order.id }),
        )
            .into_response(),
        Ok(Err(e)) => errors::reservation_error_to_response(e),
        Err(join_err) => {
            error!(error = %join_err, "order placement task failed");
            errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "infra_error", "order placement task failed")
        }
    }
}

/// GET /orders/:id
pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id"),
    };

    match services.orders.get(id).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
