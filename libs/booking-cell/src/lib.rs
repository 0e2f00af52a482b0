pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    Appointment, AppointmentCandidate, AppointmentStatus, BookAppointmentRequest, BookingError,
    RescheduleAppointmentRequest, RescheduleCandidate, Slot, SlotParams,
};
pub use services::booking::BookingService;
pub use services::slots::{enumerate_day_slots, generate_slots};
pub use services::validator::{validate_booking, validate_reschedule};
