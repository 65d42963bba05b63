use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use stockline_infra::AlertStore;

use crate::app::{dto::LimitQuery, errors, services::AppServices};

pub fn router() -> Router {
    Router::new().route("/", get(list_alerts))
}

/// GET /alerts?limit= - Low-stock alerts, newest first
pub async fn list_alerts(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<LimitQuery>,
) -> axum::response::Response {
    match services.alerts.list_alerts(query.alert_limit()).await {
        Ok(alerts) => (StatusCode::OK, Json(alerts)).into_response(),
        Err(e) => errors::alert_store_error_to_response(e),
    }
}
