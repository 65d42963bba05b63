use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::services::AppServices;

pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let worker = if services.alert_worker_running() { "running" } else { "stopped" };
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok", "alertWorker": worker })))
}
