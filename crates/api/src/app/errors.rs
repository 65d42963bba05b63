use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::error;

use stockline_infra::{AlertStoreError, OrderLedgerError, ReservationError};

pub fn reservation_error_to_response(err: ReservationError) -> axum::response::Response {
    match err {
        ReservationError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        ReservationError::InsufficientStock { issues } => (
            StatusCode::CONFLICT,
            axum::Json(json!({
                "error": "insufficient_stock",
                "message": "requested quantities are not available",
                "issues": issues,
            })),
        )
            .into_response(),
        ReservationError::Infra(e) => {
            error!(error = %e, "order placement failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "infra_error", e.to_string())
        }
    }
}

pub fn ledger_error_to_response(err: OrderLedgerError) -> axum::response::Response {
    match err {
        OrderLedgerError::NotFound(id) => json_error(StatusCode::NOT_FOUND, "not_found", format!("order {id} not found")),
        OrderLedgerError::Storage(msg) => {
            error!(error = %msg, "order ledger failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

pub fn alert_store_error_to_response(err: AlertStoreError) -> axum::response::Response {
    error!(error = %err, "alert store failure");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
