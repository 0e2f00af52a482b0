use reqwest::Method;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{ClinicStoreClient, StoreError};

use crate::models::{ScheduleError, WeeklyAvailability, WeeklySchedulePayload};

/// Store-backed access to a doctor's weekly schedule. One active schedule per
/// doctor, overwritten wholesale on each submission; no history is kept.
pub struct ScheduleService {
    store: ClinicStoreClient,
}

impl ScheduleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: ClinicStoreClient::new(config),
        }
    }

    /// Fetch the current weekly schedule for a doctor.
    pub async fn get_weekly_schedule(
        &self,
        doctor_id: Uuid,
    ) -> Result<WeeklyAvailability, ScheduleError> {
        debug!("Fetching weekly schedule for doctor: {}", doctor_id);

        let path = format!("/api/v1/doctors/{}/schedule", doctor_id);
        let payload: WeeklySchedulePayload = self
            .store
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => ScheduleError::NotFound(doctor_id),
                other => ScheduleError::Store(other.to_string()),
            })?;

        Ok(WeeklyAvailability::from(payload))
    }

    /// Replace a doctor's weekly schedule. Validation failures are authoring
    /// errors and go back to the doctor unchanged; nothing is auto-corrected.
    pub async fn put_weekly_schedule(
        &self,
        doctor_id: Uuid,
        schedule: WeeklyAvailability,
    ) -> Result<WeeklyAvailability, ScheduleError> {
        debug!("Replacing weekly schedule for doctor: {}", doctor_id);

        schedule.validate()?;
        let normalized = schedule.normalize();

        let payload = WeeklySchedulePayload::from(normalized);
        let body = serde_json::to_value(&payload)
            .map_err(|e| ScheduleError::Store(e.to_string()))?;

        let path = format!("/api/v1/doctors/{}/schedule", doctor_id);
        let stored: WeeklySchedulePayload = self
            .store
            .request(Method::PUT, &path, Some(body))
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => ScheduleError::NotFound(doctor_id),
                other => ScheduleError::Store(other.to_string()),
            })?;

        debug!("Weekly schedule replaced for doctor: {}", doctor_id);

        Ok(WeeklyAvailability::from(stored))
    }
}
