use chrono::{Duration, NaiveDate, NaiveDateTime};
use reqwest::Method;
use tracing::{debug, info, warn};
use uuid::Uuid;

use schedule_cell::{ScheduleError, ScheduleService, WeeklyAvailability};
use shared_config::AppConfig;
use shared_database::{ClinicStoreClient, StoreError};

use crate::models::{
    Appointment, AppointmentStatus, BookAppointmentRequest, BookingError,
    RescheduleAppointmentRequest, Slot, SlotParams,
};
use crate::services::slots::{enumerate_day_slots, generate_slots};
use crate::services::validator::{validate_booking, validate_reschedule};

/// Store-backed booking orchestration: fetch the schedule and the day's
/// appointment snapshot, run the pure validators, forward accepted candidates
/// to the store. The store enforces at-most-one-winner on identical
/// (doctor, date, time) inserts; a lost race comes back as a conflict and is
/// surfaced as `SlotTaken`, same as the pre-check.
pub struct BookingService {
    store: ClinicStoreClient,
    schedule_service: ScheduleService,
    params: SlotParams,
    lockout_hours: i32,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: ClinicStoreClient::new(config),
            schedule_service: ScheduleService::new(config),
            params: SlotParams::from_config(config),
            lockout_hours: config.reschedule_lockout_hours,
        }
    }

    pub fn default_params(&self) -> SlotParams {
        self.params
    }

    /// Compute the slot list for one doctor and date. `include_taken` keeps
    /// blocked candidates in the output (the dashboard renders them greyed
    /// out); otherwise only bookable future slots are returned.
    pub async fn day_slots(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        now: NaiveDateTime,
        include_taken: bool,
        params: &SlotParams,
    ) -> Result<Vec<Slot>, BookingError> {
        debug!("Computing slots for doctor {} on {}", doctor_id, date);

        let availability = self.fetch_availability(doctor_id).await?;
        let existing = self.get_appointments_for_date(doctor_id, date).await?;

        let slots = if include_taken {
            enumerate_day_slots(&availability, date, &existing, params)?
        } else {
            generate_slots(&availability, date, &existing, now, params)?
        };

        debug!("Found {} slots for doctor {} on {}", slots.len(), doctor_id, date);
        Ok(slots)
    }

    /// Book a new appointment.
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
        now: NaiveDateTime,
    ) -> Result<Appointment, BookingError> {
        info!(
            "Booking appointment for patient {} with doctor {} on {} {}",
            request.patient_id, request.doctor_id, request.date, request.start_time
        );

        let availability = self.fetch_availability(request.doctor_id).await?;
        let existing = self
            .get_appointments_for_date(request.doctor_id, request.date)
            .await?;

        let candidate = validate_booking(&request, &availability, &existing, now, &self.params)?;

        let body = serde_json::to_value(&candidate)
            .map_err(|e| BookingError::Store(e.to_string()))?;

        let appointment: Appointment = self
            .store
            .request(Method::POST, "/api/v1/appointments", Some(body))
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    warn!(
                        "Store rejected booking for doctor {} at {} {}: lost the race",
                        request.doctor_id, request.date, request.start_time
                    );
                    BookingError::SlotTaken
                }
                other => BookingError::Store(other.to_string()),
            })?;

        info!("Appointment booked successfully with ID: {}", appointment.id);
        Ok(appointment)
    }

    /// Move an existing appointment to a new date/time.
    pub async fn reschedule_appointment(
        &self,
        appointment_id: Uuid,
        request: RescheduleAppointmentRequest,
        now: NaiveDateTime,
    ) -> Result<Appointment, BookingError> {
        info!(
            "Rescheduling appointment {} to {} {}",
            appointment_id, request.new_date, request.new_start_time
        );

        let appointment = self.get_appointment(appointment_id).await?;
        if !appointment.status.blocks_slot() {
            return Err(BookingError::InvalidStatusTransition(appointment.status));
        }

        let availability = self.fetch_availability(appointment.doctor_id).await?;
        let existing = self
            .get_appointments_for_date(appointment.doctor_id, request.new_date)
            .await?;

        let candidate = validate_reschedule(
            &appointment,
            request.new_date,
            request.new_start_time,
            &availability,
            &existing,
            now,
            self.lockout_hours,
            &self.params,
        )?;

        let body = serde_json::to_value(&candidate)
            .map_err(|e| BookingError::Store(e.to_string()))?;

        let path = format!("/api/v1/appointments/{}", appointment_id);
        let updated: Appointment = self
            .store
            .request(Method::PATCH, &path, Some(body))
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    warn!("Store rejected reschedule of {}: lost the race", appointment_id);
                    BookingError::SlotTaken
                }
                StoreError::NotFound(_) => BookingError::NotFound(appointment_id),
                other => BookingError::Store(other.to_string()),
            })?;

        Ok(updated)
    }

    /// Cancel an appointment. The reschedule lockout applies here too: too
    /// close to the start, the appointment can no longer be given up.
    pub async fn cancel_appointment(
        &self,
        appointment_id: Uuid,
        reason: Option<String>,
        now: NaiveDateTime,
    ) -> Result<Appointment, BookingError> {
        debug!("Cancelling appointment: {}", appointment_id);

        let appointment = self.get_appointment(appointment_id).await?;
        if !appointment.status.blocks_slot() {
            return Err(BookingError::InvalidStatusTransition(appointment.status));
        }

        if now + Duration::hours(self.lockout_hours as i64) > appointment.start_datetime() {
            return Err(BookingError::LockoutWindowActive(self.lockout_hours));
        }

        let body = serde_json::json!({
            "status": AppointmentStatus::Cancelled,
            "reason": reason,
        });

        let path = format!("/api/v1/appointments/{}", appointment_id);
        let cancelled: Appointment = self
            .store
            .request(Method::PATCH, &path, Some(body))
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => BookingError::NotFound(appointment_id),
                other => BookingError::Store(other.to_string()),
            })?;

        Ok(cancelled)
    }

    /// Read one doctor's appointments for a date from the store; the result
    /// is the read-only snapshot handed to the pure slot/validator functions.
    pub async fn get_appointments_for_date(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, BookingError> {
        let path = format!("/api/v1/appointments?doctor_id={}&date={}", doctor_id, date);

        let appointments: Vec<Appointment> = self
            .store
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| BookingError::Store(e.to_string()))?;

        Ok(appointments)
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, BookingError> {
        let path = format!("/api/v1/appointments/{}", appointment_id);

        self.store
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => BookingError::NotFound(appointment_id),
                other => BookingError::Store(other.to_string()),
            })
    }

    /// A doctor without a stored schedule simply has no hours: that is an
    /// empty availability, not an error.
    async fn fetch_availability(&self, doctor_id: Uuid) -> Result<WeeklyAvailability, BookingError> {
        match self.schedule_service.get_weekly_schedule(doctor_id).await {
            Ok(availability) => Ok(availability),
            Err(ScheduleError::NotFound(_)) => Ok(WeeklyAvailability::new()),
            Err(ScheduleError::Store(msg)) => Err(BookingError::Store(msg)),
            Err(other) => Err(BookingError::InvalidAvailability(other)),
        }
    }
}
