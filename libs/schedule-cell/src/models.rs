use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

// ==============================================================================
// WEEKLY AVAILABILITY MODELS
// ==============================================================================

/// Clinic weekdays. An explicit enum indexes the schedule's fixed-size array,
/// so a mistyped day name is a type error instead of a silently ignored key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn index(self) -> usize {
        match self {
            Weekday::Monday => 0,
            Weekday::Tuesday => 1,
            Weekday::Wednesday => 2,
            Weekday::Thursday => 3,
            Weekday::Friday => 4,
            Weekday::Saturday => 5,
            Weekday::Sunday => 6,
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        };
        write!(f, "{}", name)
    }
}

/// One working window within a day, clinic-local time. A window may be
/// declared but blocked (`is_available = false`), e.g. reserved for rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

impl TimeWindow {
    /// Rejects zero-duration and inverted windows. Windows crossing midnight
    /// are not supported; model overnight hours as two per-day windows.
    pub fn new(start: NaiveTime, end: NaiveTime, is_available: bool) -> Result<Self, ScheduleError> {
        let window = Self { start, end, is_available };
        if start >= end {
            return Err(ScheduleError::InvertedWindow { day: None, window });
        }
        Ok(window)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// A doctor's recurring weekly schedule: per-weekday window lists, replaced
/// wholesale on each submission. Producer order is arbitrary; `normalize`
/// yields the canonical sorted form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyAvailability {
    days: [Vec<TimeWindow>; 7],
}

impl WeeklyAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn windows_for(&self, day: Weekday) -> &[TimeWindow] {
        &self.days[day.index()]
    }

    pub fn set_windows(&mut self, day: Weekday, windows: Vec<TimeWindow>) {
        self.days[day.index()] = windows;
    }

    /// Check the authoring invariants: every window has start < end, and no
    /// two windows on the same day overlap. Producer sort order is irrelevant.
    /// Violations are surfaced to the doctor for correction, never corrected
    /// here.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        for day in Weekday::ALL {
            let windows = self.windows_for(day);

            for window in windows {
                if window.start >= window.end {
                    return Err(ScheduleError::InvertedWindow {
                        day: Some(day),
                        window: *window,
                    });
                }
            }

            let mut sorted: Vec<TimeWindow> = windows.to_vec();
            sorted.sort_by_key(|w| w.start);

            for pair in sorted.windows(2) {
                if pair[0].end > pair[1].start {
                    return Err(ScheduleError::OverlappingWindow {
                        day,
                        first: pair[0],
                        second: pair[1],
                    });
                }
            }
        }

        Ok(())
    }

    /// Canonical form: each day's windows sorted ascending by start time.
    /// Idempotent.
    pub fn normalize(mut self) -> Self {
        for windows in self.days.iter_mut() {
            windows.sort_by_key(|w| w.start);
        }
        self
    }
}

/// Wire form of a weekly schedule: named day keys. Unknown keys are rejected
/// so a misspelled day cannot drop a whole day of windows on the floor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeeklySchedulePayload {
    #[serde(default)]
    pub monday: Vec<TimeWindow>,
    #[serde(default)]
    pub tuesday: Vec<TimeWindow>,
    #[serde(default)]
    pub wednesday: Vec<TimeWindow>,
    #[serde(default)]
    pub thursday: Vec<TimeWindow>,
    #[serde(default)]
    pub friday: Vec<TimeWindow>,
    #[serde(default)]
    pub saturday: Vec<TimeWindow>,
    #[serde(default)]
    pub sunday: Vec<TimeWindow>,
}

impl From<WeeklySchedulePayload> for WeeklyAvailability {
    fn from(payload: WeeklySchedulePayload) -> Self {
        Self {
            days: [
                payload.monday,
                payload.tuesday,
                payload.wednesday,
                payload.thursday,
                payload.friday,
                payload.saturday,
                payload.sunday,
            ],
        }
    }
}

impl From<WeeklyAvailability> for WeeklySchedulePayload {
    fn from(availability: WeeklyAvailability) -> Self {
        let [monday, tuesday, wednesday, thursday, friday, saturday, sunday] = availability.days;
        Self {
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
            sunday,
        }
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("window {} has start at or after end{}", .window, day_suffix(.day))]
    InvertedWindow {
        day: Option<Weekday>,
        window: TimeWindow,
    },

    #[error("windows {first} and {second} overlap on {day}")]
    OverlappingWindow {
        day: Weekday,
        first: TimeWindow,
        second: TimeWindow,
    },

    #[error("no schedule found for doctor {0}")]
    NotFound(Uuid),

    #[error("store error: {0}")]
    Store(String),
}

fn day_suffix(day: &Option<Weekday>) -> String {
    match day {
        Some(day) => format!(" on {}", day),
        None => String::new(),
    }
}
