use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    BookAppointmentRequest, BookingError, CancelAppointmentRequest,
    RescheduleAppointmentRequest, SlotParams,
};
use crate::services::booking::BookingService;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
    pub granularity_minutes: Option<i32>,
    pub duration_minutes: Option<i32>,
    /// Keep taken candidates in the output (rendered greyed out by the UI).
    pub include_taken: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AppointmentsQuery {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
}

// ==============================================================================
// SLOT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_day_slots(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let defaults = booking_service.default_params();
    let params = SlotParams {
        granularity_minutes: query.granularity_minutes.unwrap_or(defaults.granularity_minutes),
        duration_minutes: query.duration_minutes.unwrap_or(defaults.duration_minutes),
    };

    let now = Utc::now().naive_utc();
    let slots = booking_service
        .day_slots(
            doctor_id,
            query.date,
            now,
            query.include_taken.unwrap_or(false),
            &params,
        )
        .await
        .map_err(|e| match e {
            BookingError::InvalidAvailability(_) => AppError::Internal(e.to_string()),
            BookingError::Store(msg) => AppError::ExternalService(msg),
            other => AppError::Internal(other.to_string()),
        })?;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "date": query.date,
        "available_slots": slots,
        "total_slots": slots.len()
    })))
}

// ==============================================================================
// APPOINTMENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let now = Utc::now().naive_utc();
    let appointment = booking_service
        .book_appointment(request, now)
        .await
        .map_err(|e| match e {
            BookingError::SlotTaken => AppError::Conflict(e.to_string()),
            BookingError::SlotNotOffered { .. } | BookingError::PastDateTime => {
                AppError::BadRequest(e.to_string())
            }
            BookingError::Store(msg) => AppError::ExternalService(msg),
            other => AppError::Internal(other.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .get_appointment(appointment_id)
        .await
        .map_err(|e| match e {
            BookingError::NotFound(_) => AppError::NotFound(e.to_string()),
            BookingError::Store(msg) => AppError::ExternalService(msg),
            other => AppError::Internal(other.to_string()),
        })?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let appointments = booking_service
        .get_appointments_for_date(query.doctor_id, query.date)
        .await
        .map_err(|e| match e {
            BookingError::Store(msg) => AppError::ExternalService(msg),
            other => AppError::Internal(other.to_string()),
        })?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn reschedule_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<RescheduleAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let now = Utc::now().naive_utc();
    let appointment = booking_service
        .reschedule_appointment(appointment_id, request, now)
        .await
        .map_err(|e| match e {
            BookingError::SlotTaken
            | BookingError::LockoutWindowActive(_)
            | BookingError::InvalidStatusTransition(_) => AppError::Conflict(e.to_string()),
            BookingError::SlotNotOffered { .. } | BookingError::PastDateTime => {
                AppError::BadRequest(e.to_string())
            }
            BookingError::NotFound(_) => AppError::NotFound(e.to_string()),
            BookingError::Store(msg) => AppError::ExternalService(msg),
            other => AppError::Internal(other.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let now = Utc::now().naive_utc();
    let appointment = booking_service
        .cancel_appointment(appointment_id, request.reason, now)
        .await
        .map_err(|e| match e {
            BookingError::LockoutWindowActive(_) | BookingError::InvalidStatusTransition(_) => {
                AppError::Conflict(e.to_string())
            }
            BookingError::NotFound(_) => AppError::NotFound(e.to_string()),
            BookingError::Store(msg) => AppError::ExternalService(msg),
            other => AppError::Internal(other.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}
