use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use schedule_cell::ScheduleError;
use shared_config::AppConfig;

// ==============================================================================
// APPOINTMENT MODELS
// ==============================================================================

/// An appointment as read back from the external store. The booking cell only
/// ever classifies candidate (date, time) pairs against these; it never
/// mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub status: AppointmentStatus,
    pub duration_minutes: Option<i32>,
}

impl Appointment {
    pub fn start_datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,

    #[serde(alias = "accepted")]
    Confirmed,

    Rejected,

    Completed,

    #[serde(alias = "canceled")]
    Cancelled,
}

impl AppointmentStatus {
    /// Whether an appointment in this status occupies its slot. Rejected,
    /// completed and cancelled appointments free the slot for rebooking.
    pub fn blocks_slot(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Rejected => write!(f, "rejected"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// ==============================================================================
// SLOT MODELS
// ==============================================================================

/// A bookable (date, time) candidate. Derived on demand from availability
/// minus existing bookings; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub label: String,
    pub is_available: bool,
}

/// Discretization parameters for the slot generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotParams {
    pub granularity_minutes: i32,
    pub duration_minutes: i32,
}

impl SlotParams {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            granularity_minutes: config.slot_granularity_minutes,
            duration_minutes: config.default_appointment_minutes,
        }
    }
}

impl Default for SlotParams {
    fn default() -> Self {
        Self {
            granularity_minutes: shared_config::DEFAULT_SLOT_GRANULARITY_MINUTES,
            duration_minutes: shared_config::DEFAULT_APPOINTMENT_MINUTES,
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleAppointmentRequest {
    pub new_date: NaiveDate,
    pub new_start_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    pub reason: Option<String>,
}

/// Accepted booking payload handed to the external store for creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentCandidate {
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    pub status: AppointmentStatus,
}

/// Accepted reschedule payload: same appointment identity, new date/time,
/// status reset to pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RescheduleCandidate {
    pub appointment_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub status: AppointmentStatus,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

/// Booking and reschedule outcomes that are not acceptances. Every rejection
/// is a classified value for the caller to display; none is a system failure
/// except `InvalidAvailability` and `Store`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BookingError {
    #[error("no bookable slot is offered at {date} {time}")]
    SlotNotOffered { date: NaiveDate, time: NaiveTime },

    #[error("slot is already taken")]
    SlotTaken,

    #[error("requested time is not in the future")]
    PastDateTime,

    #[error("appointment starts within the {0} hour lockout window")]
    LockoutWindowActive(i32),

    #[error("invalid availability schedule: {0}")]
    InvalidAvailability(#[source] ScheduleError),

    #[error("appointment cannot be modified in status {0}")]
    InvalidStatusTransition(AppointmentStatus),

    #[error("appointment not found: {0}")]
    NotFound(Uuid),

    #[error("store error: {0}")]
    Store(String),
}
