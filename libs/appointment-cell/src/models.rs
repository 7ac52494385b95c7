// libs/appointment-cell/src/models.rs
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;
use shared_models::{AppError, NewAppointment, MAX_DURATION_MINUTES};

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

/// Numeric fields arrive either as JSON numbers or as numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(i64),
    Text(String),
}

impl NumberOrText {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NumberOrText::Number(n) => Some(*n),
            NumberOrText::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl From<i64> for NumberOrText {
    fn from(n: i64) -> Self {
        NumberOrText::Number(n)
    }
}

/// Body of `POST /appointments` and `PUT /appointments/{id}`. Every field is
/// optional on the wire so that missing values become 400s with a reason.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub doctor_id: Option<NumberOrText>,
    pub date: Option<String>,
    pub duration: Option<NumberOrText>,
    pub appointment_type: Option<String>,
    pub patient_name: Option<String>,
    pub patient_email: Option<String>,
    pub notes: Option<String>,
}

impl AppointmentRequest {
    /// Checks required fields and resolves `date` to an instant, reading
    /// offset-less timestamps as wall-clock time in `timezone`.
    pub fn validate(self, timezone: &Tz) -> Result<NewAppointment, AppointmentError> {
        let doctor_id = self
            .doctor_id
            .ok_or_else(|| missing("doctor_id"))?
            .as_i64()
            .ok_or(AppointmentError::DoctorNotFound)?;

        let raw_date = required_text(self.date, "date")?;
        let date = parse_appointment_instant(&raw_date, timezone).ok_or_else(|| {
            AppointmentError::ValidationError(format!("Invalid appointment date '{}'", raw_date))
        })?;

        let duration = self
            .duration
            .ok_or_else(|| missing("duration"))?
            .as_i64()
            .filter(|minutes| (1..=MAX_DURATION_MINUTES).contains(minutes))
            .ok_or_else(|| {
                AppointmentError::ValidationError(format!(
                    "duration must be between 1 and {} minutes",
                    MAX_DURATION_MINUTES
                ))
            })?;

        Ok(NewAppointment {
            doctor_id,
            date,
            duration,
            appointment_type: required_text(self.appointment_type, "appointment_type")?,
            patient_name: required_text(self.patient_name, "patient_name")?,
            patient_email: required_text(self.patient_email, "patient_email")?,
            notes: self.notes.filter(|notes| !notes.trim().is_empty()),
        })
    }
}

fn missing(field: &str) -> AppointmentError {
    AppointmentError::ValidationError(format!("{} is required", field))
}

fn required_text(value: Option<String>, field: &str) -> Result<String, AppointmentError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing(field))
}

const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

pub fn parse_appointment_instant(raw: &str, timezone: &Tz) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant);
    }

    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())?;

    timezone
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.fixed_offset())
}

// ==============================================================================
// ERRORS
// ==============================================================================

/// Why a proposed appointment was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingRejection {
    #[error("Appointment time is outside doctor working hours")]
    OutsideWorkingHours,

    #[error("Time slot already booked")]
    SlotAlreadyBooked,
}

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error(transparent)]
    Rejected(#[from] BookingRejection),

    #[error("{0}")]
    ValidationError(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound | AppointmentError::DoctorNotFound => {
                AppError::NotFound(err.to_string())
            }
            AppointmentError::Rejected(reason) => AppError::Conflict(reason.to_string()),
            AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
            AppointmentError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}
