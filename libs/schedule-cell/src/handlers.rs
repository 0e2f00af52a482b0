use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{ScheduleError, WeeklyAvailability, WeeklySchedulePayload};
use crate::services::schedule::ScheduleService;

#[axum::debug_handler]
pub async fn get_schedule(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let schedule_service = ScheduleService::new(&state);

    let schedule = schedule_service
        .get_weekly_schedule(doctor_id)
        .await
        .map_err(|e| match e {
            ScheduleError::NotFound(_) => {
                AppError::NotFound(format!("No schedule found for doctor {}", doctor_id))
            }
            ScheduleError::Store(msg) => AppError::ExternalService(msg),
            other => AppError::Internal(other.to_string()),
        })?;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "schedule": WeeklySchedulePayload::from(schedule)
    })))
}

#[axum::debug_handler]
pub async fn put_schedule(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
    Json(payload): Json<WeeklySchedulePayload>,
) -> Result<Json<Value>, AppError> {
    let schedule_service = ScheduleService::new(&state);

    let stored = schedule_service
        .put_weekly_schedule(doctor_id, WeeklyAvailability::from(payload))
        .await
        .map_err(|e| match e {
            e @ (ScheduleError::InvertedWindow { .. } | ScheduleError::OverlappingWindow { .. }) => {
                AppError::ValidationError(e.to_string())
            }
            ScheduleError::NotFound(_) => {
                AppError::NotFound(format!("Doctor {} not found", doctor_id))
            }
            ScheduleError::Store(msg) => AppError::ExternalService(msg),
        })?;

    Ok(Json(json!({
        "success": true,
        "doctor_id": doctor_id,
        "schedule": WeeklySchedulePayload::from(stored)
    })))
}
