use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Longest appointment or slot length accepted from clients. Nothing longer
/// fits inside a single working day.
pub const MAX_DURATION_MINUTES: i64 = 24 * 60;

/// `start + minutes`, saturating at the latest representable instant.
fn instant_after(start: DateTime<FixedOffset>, minutes: i64) -> DateTime<FixedOffset> {
    TimeDelta::try_minutes(minutes)
        .and_then(|length| start.checked_add_signed(length))
        .unwrap_or_else(|| DateTime::<Utc>::MAX_UTC.fixed_offset())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub doctor_id: i64,
    pub date: DateTime<FixedOffset>,
    pub duration: i64,
    pub appointment_type: String,
    pub patient_name: String,
    pub patient_email: String,
    pub notes: Option<String>,
}

impl Appointment {
    pub fn end(&self) -> DateTime<FixedOffset> {
        instant_after(self.date, self.duration)
    }

    /// The booked interval expressed in the wall-clock time of `tz`.
    pub fn booked_interval<Tz: TimeZone>(&self, tz: &Tz) -> BookedInterval {
        BookedInterval {
            start: self.date.with_timezone(tz).naive_local(),
            duration_minutes: self.duration,
        }
    }
}

/// Appointment fields before the store assigns an id; also the full-replace
/// payload of an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub doctor_id: i64,
    pub date: DateTime<FixedOffset>,
    pub duration: i64,
    pub appointment_type: String,
    pub patient_name: String,
    pub patient_email: String,
    pub notes: Option<String>,
}

impl NewAppointment {
    pub fn end(&self) -> DateTime<FixedOffset> {
        instant_after(self.date, self.duration)
    }

    pub fn into_appointment(self, id: i64) -> Appointment {
        Appointment {
            id,
            doctor_id: self.doctor_id,
            date: self.date,
            duration: self.duration,
            appointment_type: self.appointment_type,
            patient_name: self.patient_name,
            patient_email: self.patient_email,
            notes: self.notes,
        }
    }
}

/// A committed `[start, start + duration)` window on a doctor's calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedInterval {
    pub start: NaiveDateTime,
    pub duration_minutes: i64,
}

impl BookedInterval {
    pub fn new(start: NaiveDateTime, duration_minutes: i64) -> Self {
        Self { start, duration_minutes }
    }

    /// Saturates at `NaiveDateTime::MAX` for lengths chrono cannot represent.
    pub fn end(&self) -> NaiveDateTime {
        TimeDelta::try_minutes(self.duration_minutes)
            .and_then(|length| self.start.checked_add_signed(length))
            .unwrap_or(NaiveDateTime::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use serde_json::json;

    #[test]
    fn booked_interval_uses_clinic_wall_clock() {
        let appointment: Appointment = serde_json::from_value(json!({
            "id": 7,
            "doctor_id": 1,
            "date": "2030-03-04T05:30:00Z",
            "duration": 45,
            "appointment_type": "checkup",
            "patient_name": "Ravi",
            "patient_email": "ravi@example.com",
            "notes": null
        }))
        .unwrap();

        let interval = appointment.booked_interval(&chrono_tz::Asia::Kolkata);
        let expected_start = NaiveDate::from_ymd_opt(2030, 3, 4)
            .unwrap()
            .and_hms_opt(11, 0, 0)
            .unwrap();

        assert_eq!(interval.start, expected_start);
        assert_eq!(interval.end(), expected_start + Duration::minutes(45));
        assert_eq!(appointment.end() - appointment.date, Duration::minutes(45));
    }

    #[test]
    fn unrepresentable_lengths_saturate() {
        let start = NaiveDate::from_ymd_opt(2030, 3, 4)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(BookedInterval::new(start, i64::MAX).end(), NaiveDateTime::MAX);

        let appointment = NewAppointment {
            doctor_id: 1,
            date: DateTime::parse_from_rfc3339("2030-03-04T09:00:00+05:30").unwrap(),
            duration: i64::MAX,
            appointment_type: "checkup".to_string(),
            patient_name: "Ravi".to_string(),
            patient_email: "ravi@example.com".to_string(),
            notes: None,
        };
        assert!(appointment.end() > appointment.date);
    }
}
