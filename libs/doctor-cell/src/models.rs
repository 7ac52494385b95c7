use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;
use shared_models::{AppError, WorkingHours};

pub const REQUIRED_DOCTOR_FIELDS: &str =
    "All fields are required (name, specialization, working_start, working_end)";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub working_start: Option<String>,
    pub working_end: Option<String>,
    pub profile_image: Option<String>,
    pub availability_status: Option<String>,
}

/// Raw `?date=&duration=` query; both values are validated by the service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlotQuery {
    pub date: Option<String>,
    pub duration: Option<String>,
}

/// Result of the availability policy for one doctor and date.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotAvailability {
    pub slots: Vec<NaiveTime>,
    pub working_hours: WorkingHours,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailabilityResponse {
    pub available_slots: Vec<String>,
    pub working_hours: WorkingHours,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<SlotAvailability> for SlotAvailabilityResponse {
    fn from(availability: SlotAvailability) -> Self {
        Self {
            available_slots: availability
                .slots
                .iter()
                .map(|slot| slot.format("%H:%M").to_string())
                .collect(),
            working_hours: availability.working_hours,
            message: availability.message,
        }
    }
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Date is required")]
    MissingDate,

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Duration must be between 1 and 1440 minutes, got '{0}'")]
    InvalidDuration(String),

    #[error("{0}")]
    ValidationError(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::MissingDate
            | DoctorError::InvalidDate(_)
            | DoctorError::InvalidDuration(_) => AppError::BadRequest(err.to_string()),
            DoctorError::ValidationError(msg) => AppError::ValidationError(msg),
            DoctorError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}
