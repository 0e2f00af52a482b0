//! Admissibility decisions for bookings and reschedules.
//!
//! Pure decision functions: no retries, no I/O. Every rejection carries a
//! classified reason; the HTTP layer displays it and lets the patient
//! resubmit. The final word on conflicting inserts belongs to the external
//! store's uniqueness guarantee - these checks are the advisory first pass.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use schedule_cell::WeeklyAvailability;

use crate::models::{
    Appointment, AppointmentCandidate, AppointmentStatus, BookAppointmentRequest, BookingError,
    RescheduleCandidate, Slot, SlotParams,
};
use crate::services::slots::enumerate_day_slots;

/// Decide one desired booking. Accepts with a pending candidate for the store,
/// or rejects with the reason the patient can act on.
///
/// The past check runs before the grid lookup: a past request would otherwise
/// be reported as not-offered, which hides the actual problem.
pub fn validate_booking(
    request: &BookAppointmentRequest,
    availability: &WeeklyAvailability,
    existing: &[Appointment],
    now: NaiveDateTime,
    params: &SlotParams,
) -> Result<AppointmentCandidate, BookingError> {
    if request.date.and_time(request.start_time) <= now {
        return Err(BookingError::PastDateTime);
    }

    let slot = find_offered_slot(
        availability,
        request.date,
        request.start_time,
        existing,
        params,
    )?;

    if !slot.is_available {
        return Err(BookingError::SlotTaken);
    }

    Ok(AppointmentCandidate {
        doctor_id: request.doctor_id,
        patient_id: request.patient_id,
        date: request.date,
        start_time: request.start_time,
        duration_minutes: request.duration_minutes.unwrap_or(params.duration_minutes),
        status: AppointmentStatus::Pending,
    })
}

/// Decide one desired reschedule. An appointment inside its lockout window
/// cannot be moved at all; otherwise the new (date, time) goes through the
/// same checks as a fresh booking, with the appointment's own slot excluded
/// from the conflict set so it never blocks itself.
pub fn validate_reschedule(
    appointment: &Appointment,
    new_date: NaiveDate,
    new_time: NaiveTime,
    availability: &WeeklyAvailability,
    existing: &[Appointment],
    now: NaiveDateTime,
    lockout_hours: i32,
    params: &SlotParams,
) -> Result<RescheduleCandidate, BookingError> {
    let current_start = appointment.start_datetime();
    if now + Duration::hours(lockout_hours as i64) > current_start {
        return Err(BookingError::LockoutWindowActive(lockout_hours));
    }

    if new_date.and_time(new_time) <= now {
        return Err(BookingError::PastDateTime);
    }

    let others: Vec<Appointment> = existing
        .iter()
        .filter(|apt| apt.id != appointment.id)
        .cloned()
        .collect();

    let slot = find_offered_slot(availability, new_date, new_time, &others, params)?;

    if !slot.is_available {
        return Err(BookingError::SlotTaken);
    }

    Ok(RescheduleCandidate {
        appointment_id: appointment.id,
        date: new_date,
        start_time: new_time,
        status: AppointmentStatus::Pending,
    })
}

fn find_offered_slot(
    availability: &WeeklyAvailability,
    date: NaiveDate,
    time: NaiveTime,
    existing: &[Appointment],
    params: &SlotParams,
) -> Result<Slot, BookingError> {
    let grid = enumerate_day_slots(availability, date, existing, params)?;

    grid.into_iter()
        .find(|slot| slot.start_time == time)
        .ok_or(BookingError::SlotNotOffered { date, time })
}
