// libs/booking-cell/tests/booking_service_test.rs

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use booking_cell::models::{
    BookAppointmentRequest, BookingError, SlotParams,
};
use booking_cell::services::booking::BookingService;
use shared_config::AppConfig;

// ==============================================================================
// TEST FIXTURES AND UTILITIES
// ==============================================================================

fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// 2025-06-16 is a Monday.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()
}

fn prior_friday_noon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 13).unwrap().and_time(t(12, 0))
}

struct TestSetup {
    service: BookingService,
    mock_server: MockServer,
}

impl TestSetup {
    async fn new() -> Self {
        let mock_server = MockServer::start().await;

        let config = AppConfig {
            clinic_store_url: mock_server.uri(),
            clinic_store_api_key: "test_key".to_string(),
            slot_granularity_minutes: 30,
            default_appointment_minutes: 30,
            reschedule_lockout_hours: 12,
        };

        Self {
            service: BookingService::new(&config),
            mock_server,
        }
    }

    async fn mount_monday_schedule(&self, doctor_id: Uuid) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/doctors/{}/schedule", doctor_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "monday": [
                    { "start": "09:00:00", "end": "12:00:00", "is_available": true }
                ]
            })))
            .mount(&self.mock_server)
            .await;
    }

    async fn mount_day_appointments(&self, doctor_id: Uuid, appointments: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/v1/appointments"))
            .and(query_param("doctor_id", doctor_id.to_string()))
            .and(query_param("date", monday().to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(appointments))
            .mount(&self.mock_server)
            .await;
    }
}

fn appointment_json(id: Uuid, doctor_id: Uuid, start: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "doctor_id": doctor_id,
        "patient_id": Uuid::new_v4(),
        "date": "2025-06-16",
        "start_time": start,
        "status": status,
        "duration_minutes": 30
    })
}

// ==============================================================================
// SLOT LISTING
// ==============================================================================

#[tokio::test]
async fn day_slots_reflect_the_stored_schedule_and_bookings() {
    let setup = TestSetup::new().await;
    let doctor_id = Uuid::new_v4();

    setup.mount_monday_schedule(doctor_id).await;
    setup
        .mount_day_appointments(
            doctor_id,
            serde_json::json!([
                appointment_json(Uuid::new_v4(), doctor_id, "10:00:00", "confirmed")
            ]),
        )
        .await;

    let slots = setup
        .service
        .day_slots(
            doctor_id,
            monday(),
            prior_friday_noon(),
            false,
            &SlotParams::default(),
        )
        .await
        .unwrap();

    let starts: Vec<NaiveTime> = slots.iter().map(|slot| slot.start_time).collect();
    assert_eq!(starts, vec![t(9, 0), t(9, 30), t(10, 30), t(11, 0), t(11, 30)]);
}

#[tokio::test]
async fn doctor_without_a_schedule_has_no_slots() {
    let setup = TestSetup::new().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/doctors/{}/schedule", doctor_id)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&setup.mock_server)
        .await;
    setup
        .mount_day_appointments(doctor_id, serde_json::json!([]))
        .await;

    let slots = setup
        .service
        .day_slots(
            doctor_id,
            monday(),
            prior_friday_noon(),
            false,
            &SlotParams::default(),
        )
        .await
        .unwrap();

    assert!(slots.is_empty());
}

// ==============================================================================
// BOOKING
// ==============================================================================

#[tokio::test]
async fn booking_posts_a_pending_candidate_and_returns_the_stored_appointment() {
    let setup = TestSetup::new().await;
    let doctor_id = Uuid::new_v4();
    let stored_id = Uuid::new_v4();

    setup.mount_monday_schedule(doctor_id).await;
    setup
        .mount_day_appointments(doctor_id, serde_json::json!([]))
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(appointment_json(
            stored_id,
            doctor_id,
            "09:30:00",
            "pending",
        )))
        .expect(1)
        .mount(&setup.mock_server)
        .await;

    let request = BookAppointmentRequest {
        doctor_id,
        patient_id: Uuid::new_v4(),
        date: monday(),
        start_time: t(9, 30),
        duration_minutes: None,
    };

    let appointment = setup
        .service
        .book_appointment(request, prior_friday_noon())
        .await
        .unwrap();

    assert_eq!(appointment.id, stored_id);
}

#[tokio::test]
async fn rejected_booking_never_reaches_the_store() {
    let setup = TestSetup::new().await;
    let doctor_id = Uuid::new_v4();

    setup.mount_monday_schedule(doctor_id).await;
    setup
        .mount_day_appointments(
            doctor_id,
            serde_json::json!([
                appointment_json(Uuid::new_v4(), doctor_id, "09:30:00", "pending")
            ]),
        )
        .await;

    // No POST mock mounted: hitting the store would fail the request.
    let request = BookAppointmentRequest {
        doctor_id,
        patient_id: Uuid::new_v4(),
        date: monday(),
        start_time: t(9, 30),
        duration_minutes: None,
    };

    let result = setup
        .service
        .book_appointment(request, prior_friday_noon())
        .await;

    assert_matches!(result, Err(BookingError::SlotTaken));
}

#[tokio::test]
async fn a_lost_insert_race_surfaces_as_slot_taken() {
    let setup = TestSetup::new().await;
    let doctor_id = Uuid::new_v4();

    setup.mount_monday_schedule(doctor_id).await;
    setup
        .mount_day_appointments(doctor_id, serde_json::json!([]))
        .await;

    // The pre-check passes on a stale snapshot; the store's uniqueness
    // constraint rejects the insert.
    Mock::given(method("POST"))
        .and(path("/api/v1/appointments"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&setup.mock_server)
        .await;

    let request = BookAppointmentRequest {
        doctor_id,
        patient_id: Uuid::new_v4(),
        date: monday(),
        start_time: t(9, 30),
        duration_minutes: None,
    };

    let result = setup
        .service
        .book_appointment(request, prior_friday_noon())
        .await;

    assert_matches!(result, Err(BookingError::SlotTaken));
}

// ==============================================================================
// CANCELLATION
// ==============================================================================

#[tokio::test]
async fn cancelling_inside_the_lockout_window_is_rejected() {
    let setup = TestSetup::new().await;
    let appointment_id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/appointments/{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(appointment_json(
            appointment_id,
            doctor_id,
            "10:00:00",
            "confirmed",
        )))
        .mount(&setup.mock_server)
        .await;

    // Ten hours before the start, lockout is twelve.
    let now = monday().and_time(t(0, 0));

    let result = setup
        .service
        .cancel_appointment(appointment_id, Some("conflict".to_string()), now)
        .await;

    assert_matches!(result, Err(BookingError::LockoutWindowActive(12)));
}

#[tokio::test]
async fn cancelling_ahead_of_the_lockout_window_updates_the_store() {
    let setup = TestSetup::new().await;
    let appointment_id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/appointments/{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(appointment_json(
            appointment_id,
            doctor_id,
            "10:00:00",
            "confirmed",
        )))
        .mount(&setup.mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(format!("/api/v1/appointments/{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(appointment_json(
            appointment_id,
            doctor_id,
            "10:00:00",
            "cancelled",
        )))
        .expect(1)
        .mount(&setup.mock_server)
        .await;

    let cancelled = setup
        .service
        .cancel_appointment(appointment_id, None, prior_friday_noon())
        .await
        .unwrap();

    assert_eq!(cancelled.id, appointment_id);
}
