// libs/schedule-cell/tests/schedule_service_test.rs

use assert_matches::assert_matches;
use chrono::NaiveTime;
use uuid::Uuid;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use schedule_cell::models::{
    ScheduleError, TimeWindow, Weekday, WeeklyAvailability, WeeklySchedulePayload,
};
use schedule_cell::services::schedule::ScheduleService;
use shared_config::AppConfig;

fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn window(start: (u32, u32), end: (u32, u32)) -> TimeWindow {
    TimeWindow::new(t(start.0, start.1), t(end.0, end.1), true).unwrap()
}

struct TestSetup {
    service: ScheduleService,
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
            service: ScheduleService::new(&config),
            mock_server,
        }
    }
}

#[tokio::test]
async fn get_weekly_schedule_parses_store_payload() {
    let setup = TestSetup::new().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/doctors/{}/schedule", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "monday": [
                { "start": "09:00:00", "end": "12:00:00", "is_available": true }
            ],
            "thursday": [
                { "start": "14:00:00", "end": "17:00:00", "is_available": false }
            ]
        })))
        .mount(&setup.mock_server)
        .await;

    let schedule = setup.service.get_weekly_schedule(doctor_id).await.unwrap();

    assert_eq!(schedule.windows_for(Weekday::Monday).len(), 1);
    assert!(!schedule.windows_for(Weekday::Thursday)[0].is_available);
    assert!(schedule.windows_for(Weekday::Sunday).is_empty());
}

#[tokio::test]
async fn get_weekly_schedule_maps_missing_doctor_to_not_found() {
    let setup = TestSetup::new().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/doctors/{}/schedule", doctor_id)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&setup.mock_server)
        .await;

    let result = setup.service.get_weekly_schedule(doctor_id).await;
    assert_matches!(result, Err(ScheduleError::NotFound(id)) if id == doctor_id);
}

#[tokio::test]
async fn put_weekly_schedule_rejects_overlap_before_touching_the_store() {
    // No mock mounted: a store request would fail the test via the error path.
    let setup = TestSetup::new().await;
    let doctor_id = Uuid::new_v4();

    let mut schedule = WeeklyAvailability::new();
    schedule.set_windows(
        Weekday::Monday,
        vec![window((9, 0), (10, 0)), window((9, 30), (11, 0))],
    );

    let result = setup.service.put_weekly_schedule(doctor_id, schedule).await;
    assert_matches!(result, Err(ScheduleError::OverlappingWindow { .. }));
    assert!(setup.mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn put_weekly_schedule_sends_the_normalized_form() {
    let setup = TestSetup::new().await;
    let doctor_id = Uuid::new_v4();

    let mut schedule = WeeklyAvailability::new();
    schedule.set_windows(
        Weekday::Monday,
        vec![window((14, 0), (17, 0)), window((9, 0), (12, 0))],
    );

    let expected = WeeklySchedulePayload {
        monday: vec![window((9, 0), (12, 0)), window((14, 0), (17, 0))],
        ..Default::default()
    };

    Mock::given(method("PUT"))
        .and(path(format!("/api/v1/doctors/{}/schedule", doctor_id)))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(&expected))
        .expect(1)
        .mount(&setup.mock_server)
        .await;

    let stored = setup
        .service
        .put_weekly_schedule(doctor_id, schedule)
        .await
        .unwrap();

    assert_eq!(stored.windows_for(Weekday::Monday)[0].start, t(9, 0));
}
