use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("Working hours start must be before end")]
    InvalidWorkingHours,

    #[error("Unknown availability status '{0}'")]
    UnknownStatus(String),
}

/// Parse a wall-clock time written as `HH:MM` (seconds are tolerated).
pub fn parse_wall_clock(raw: &str) -> Result<NaiveTime, ModelError> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| ModelError::InvalidTime(raw.to_string()))
}

/// A doctor's daily `[start, end)` bounds, without a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl WorkingHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ModelError> {
        if start >= end {
            return Err(ModelError::InvalidWorkingHours);
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, ModelError> {
        Self::new(parse_wall_clock(start)?, parse_wall_clock(end)?)
    }

    pub fn window_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityStatus {
    #[default]
    #[serde(rename = "Available Today")]
    AvailableToday,
    #[serde(rename = "Fully Booked")]
    FullyBooked,
    #[serde(rename = "On Leave")]
    OnLeave,
}

impl AvailabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityStatus::AvailableToday => "Available Today",
            AvailabilityStatus::FullyBooked => "Fully Booked",
            AvailabilityStatus::OnLeave => "On Leave",
        }
    }
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Literals are matched case-sensitively.
impl FromStr for AvailabilityStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available Today" => Ok(AvailabilityStatus::AvailableToday),
            "Fully Booked" => Ok(AvailabilityStatus::FullyBooked),
            "On Leave" => Ok(AvailabilityStatus::OnLeave),
            other => Err(ModelError::UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialization: String,
    #[serde(with = "working_hours_json")]
    pub working_hours: WorkingHours,
    pub profile_image: Option<String>,
    pub availability_status: AvailabilityStatus,
}

/// Doctor fields before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDoctor {
    pub name: String,
    pub specialization: String,
    #[serde(with = "working_hours_json")]
    pub working_hours: WorkingHours,
    pub profile_image: Option<String>,
    pub availability_status: AvailabilityStatus,
}

impl NewDoctor {
    pub fn into_doctor(self, id: i64) -> Doctor {
        Doctor {
            id,
            name: self.name,
            specialization: self.specialization,
            working_hours: self.working_hours,
            profile_image: self.profile_image,
            availability_status: self.availability_status,
        }
    }
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_wall_clock(&raw).map_err(serde::de::Error::custom)
    }
}

/// Working hours travel as a JSON-encoded string column; the object form is
/// accepted on input as well.
mod working_hours_json {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::WorkingHours;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Encoded {
        Text(String),
        Object(WorkingHours),
    }

    pub fn serialize<S>(hours: &WorkingHours, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = serde_json::to_string(hours).map_err(serde::ser::Error::custom)?;
        text.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<WorkingHours, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hours = match Encoded::deserialize(deserializer)? {
            Encoded::Text(text) => {
                serde_json::from_str::<WorkingHours>(&text).map_err(serde::de::Error::custom)?
            }
            Encoded::Object(hours) => hours,
        };
        WorkingHours::new(hours.start, hours.end).map_err(serde::de::Error::custom)
    }
}
