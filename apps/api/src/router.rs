use std::sync::Arc;

use axum::{routing::get, Router};

use booking_cell::router::{appointment_routes, slot_routes};
use schedule_cell::router::schedule_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Derma Clinic scheduling API is running!" }))
        .nest(
            "/doctors",
            schedule_routes(state.clone()).merge(slot_routes(state.clone())),
        )
        .nest("/appointments", appointment_routes(state))
}
