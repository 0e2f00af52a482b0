use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

/// Doctor-scoped slot routes, nested under `/doctors` by the api app.
pub fn slot_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/{doctor_id}/slots", get(handlers::get_day_slots))
        .with_state(state)
}

/// Appointment booking routes, nested under `/appointments` by the api app.
pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_appointments).post(handlers::book_appointment))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}/reschedule", patch(handlers::reschedule_appointment))
        .route("/{appointment_id}/cancel", post(handlers::cancel_appointment))
        .with_state(state)
}
