pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

// Re-export the availability model for the booking cell
pub use models::{
    ScheduleError, TimeWindow, Weekday, WeeklyAvailability, WeeklySchedulePayload,
};
pub use services::schedule::ScheduleService;
