use std::env;
use tracing::warn;

/// Clinic-wide scheduling defaults, overridable per environment.
pub const DEFAULT_SLOT_GRANULARITY_MINUTES: i32 = 30;
pub const DEFAULT_APPOINTMENT_MINUTES: i32 = 30;
pub const DEFAULT_RESCHEDULE_LOCKOUT_HOURS: i32 = 12;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub clinic_store_url: String,
    pub clinic_store_api_key: String,
    pub slot_granularity_minutes: i32,
    pub default_appointment_minutes: i32,
    pub reschedule_lockout_hours: i32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            clinic_store_url: env::var("CLINIC_STORE_URL")
                .unwrap_or_else(|_| {
                    warn!("CLINIC_STORE_URL not set, using empty value");
                    String::new()
                }),
            clinic_store_api_key: env::var("CLINIC_STORE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("CLINIC_STORE_API_KEY not set, using empty value");
                    String::new()
                }),
            slot_granularity_minutes: read_positive_int(
                "SLOT_GRANULARITY_MINUTES",
                DEFAULT_SLOT_GRANULARITY_MINUTES,
            ),
            default_appointment_minutes: read_positive_int(
                "DEFAULT_APPOINTMENT_MINUTES",
                DEFAULT_APPOINTMENT_MINUTES,
            ),
            reschedule_lockout_hours: read_positive_int(
                "RESCHEDULE_LOCKOUT_HOURS",
                DEFAULT_RESCHEDULE_LOCKOUT_HOURS,
            ),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.clinic_store_url.is_empty() && !self.clinic_store_api_key.is_empty()
    }
}

fn read_positive_int(name: &str, default: i32) -> i32 {
    match env::var(name) {
        Ok(raw) => match raw.parse::<i32>() {
            Ok(value) if value > 0 => value,
            _ => {
                warn!("{} is not a positive integer, using default {}", name, default);
                default
            }
        },
        Err(_) => default,
    }
}
