use axum::Router;

pub mod admin;
pub mod alerts;
pub mod orders;
pub mod system;

/// Router for all order, alert and admin endpoints.
///
/// Authentication happens upstream; the user id arrives in the order body.
pub fn router() -> Router {
    Router::new()
        .nest("/orders", orders::router())
        .nest("/alerts", alerts::router())
        .nest("/admin", admin::router())
}
