//! Slot computation for one doctor and one calendar date.
//!
//! Pure functions: availability and the appointment snapshot come in as
//! read-only inputs, "now" is injected, and identical inputs always produce
//! identical output.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use schedule_cell::{Weekday, WeeklyAvailability};

use crate::models::{Appointment, BookingError, Slot, SlotParams};

/// Enumerate the full slot grid for a date: every candidate start inside the
/// day's available windows, stepped by granularity, with candidates whose
/// start coincides with a pending/confirmed appointment marked unavailable.
///
/// The availability is re-checked here; overlapping or inverted windows fail
/// with `InvalidAvailability` instead of producing a grid that could
/// double-book.
pub fn enumerate_day_slots(
    availability: &WeeklyAvailability,
    date: NaiveDate,
    existing: &[Appointment],
    params: &SlotParams,
) -> Result<Vec<Slot>, BookingError> {
    availability
        .validate()
        .map_err(BookingError::InvalidAvailability)?;

    let day = Weekday::from(date.weekday());
    let step = Duration::minutes(params.granularity_minutes as i64);
    let duration = Duration::minutes(params.duration_minutes as i64);

    let mut slots = Vec::new();

    // A day with no windows is a valid empty schedule, not an error.
    for window in availability.windows_for(day) {
        if !window.is_available {
            continue;
        }

        let window_end = date.and_time(window.end);
        let mut current = date.and_time(window.start);

        // The last partial increment that would overflow the window is dropped.
        while current + duration <= window_end {
            let slot_end = current + duration;
            let taken = existing.iter().any(|apt| {
                apt.date == date && apt.start_time == current.time() && apt.status.blocks_slot()
            });

            slots.push(Slot {
                date,
                start_time: current.time(),
                end_time: slot_end.time(),
                label: format!("{} - {}", current.format("%H:%M"), slot_end.format("%H:%M")),
                is_available: !taken,
            });

            current += step;
        }
    }

    slots.sort_by_key(|slot| slot.start_time);

    Ok(slots)
}

/// The bookable slots for a date: the grid minus taken candidates and minus
/// candidates already in the past at generation time.
pub fn generate_slots(
    availability: &WeeklyAvailability,
    date: NaiveDate,
    existing: &[Appointment],
    now: NaiveDateTime,
    params: &SlotParams,
) -> Result<Vec<Slot>, BookingError> {
    let mut slots = enumerate_day_slots(availability, date, existing, params)?;

    slots.retain(|slot| slot.is_available && date.and_time(slot.start_time) >= now);

    Ok(slots)
}
