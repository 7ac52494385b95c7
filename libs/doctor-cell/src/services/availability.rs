// libs/doctor-cell/src/services/availability.rs

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_tz::Tz;
use tracing::debug;

use shared_database::{AppState, SchedulingStore};
use shared_models::{AvailabilityStatus, BookedInterval, Doctor, MAX_DURATION_MINUTES};

use crate::models::{DoctorError, SlotAvailability, SlotQuery};
use crate::services::overlap::filter_available;
use crate::services::time_grid::generate_slots;

pub const ON_LEAVE_MESSAGE: &str = "Doctor is on leave today";
pub const FULLY_BOOKED_MESSAGE: &str = "Doctor is fully booked today";

/// Message for statuses that override computed capacity, `None` when the
/// grid should be computed.
pub fn status_override(status: AvailabilityStatus) -> Option<&'static str> {
    match status {
        AvailabilityStatus::OnLeave => Some(ON_LEAVE_MESSAGE),
        AvailabilityStatus::FullyBooked => Some(FULLY_BOOKED_MESSAGE),
        AvailabilityStatus::AvailableToday => None,
    }
}

/// Bookable slots for `doctor` on `date`.
///
/// On-leave and fully-booked doctors short-circuit to an empty list with a
/// status message, regardless of their bookings.
pub fn get_availability<Z: TimeZone>(
    doctor: &Doctor,
    date: NaiveDate,
    duration_minutes: i64,
    now: &DateTime<Z>,
    booked: &[BookedInterval],
) -> SlotAvailability {
    if let Some(message) = status_override(doctor.availability_status) {
        return SlotAvailability {
            slots: Vec::new(),
            working_hours: doctor.working_hours,
            message: Some(message.to_string()),
        };
    }

    let candidates = generate_slots(date, &doctor.working_hours, duration_minutes, now);

    SlotAvailability {
        slots: filter_available(date, candidates, booked, duration_minutes),
        working_hours: doctor.working_hours,
        message: None,
    }
}

pub fn parse_query_date(raw: Option<&str>) -> Result<NaiveDate, DoctorError> {
    let raw = raw.map(str::trim).filter(|d| !d.is_empty()).ok_or(DoctorError::MissingDate)?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| DoctorError::InvalidDate(raw.to_string()))
}

pub fn parse_duration(raw: Option<&str>, default_minutes: i64) -> Result<i64, DoctorError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default_minutes),
        Some(text) => text
            .parse::<i64>()
            .ok()
            .filter(|minutes| (1..=MAX_DURATION_MINUTES).contains(minutes))
            .ok_or_else(|| DoctorError::InvalidDuration(text.to_string())),
    }
}

pub struct AvailabilityService {
    store: Arc<dyn SchedulingStore>,
    timezone: Tz,
    default_duration_minutes: i64,
}

impl AvailabilityService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            timezone: state.config.clinic_timezone,
            default_duration_minutes: state.config.default_slot_duration_minutes,
        }
    }

    /// Resolve the query, the doctor and the doctor's bookings for the date,
    /// then apply the availability policy.
    pub async fn get_available_slots(
        &self,
        doctor_id: i64,
        query: &SlotQuery,
        now: &DateTime<Tz>,
    ) -> Result<SlotAvailability, DoctorError> {
        let date = parse_query_date(query.date.as_deref())?;
        let duration = parse_duration(query.duration.as_deref(), self.default_duration_minutes)?;

        debug!("Calculating {}-minute slots for doctor {} on {}", duration, doctor_id, date);

        let doctor = self
            .store
            .get_doctor(doctor_id)
            .await?
            .ok_or(DoctorError::NotFound)?;

        if status_override(doctor.availability_status).is_some() {
            debug!("Doctor {} is {}, skipping slot grid", doctor_id, doctor.availability_status);
            return Ok(get_availability(&doctor, date, duration, now, &[]));
        }

        let booked = self.booked_intervals(doctor_id, date).await?;
        let availability = get_availability(&doctor, date, duration, now, &booked);

        debug!(
            "Doctor {} has {} open slots on {} ({} bookings)",
            doctor_id,
            availability.slots.len(),
            date,
            booked.len()
        );
        Ok(availability)
    }

    /// Committed intervals starting on `date` in the clinic timezone.
    async fn booked_intervals(&self, doctor_id: i64, date: NaiveDate) -> Result<Vec<BookedInterval>, DoctorError> {
        let appointments = self.store.list_appointments_for_doctor(doctor_id).await?;

        Ok(appointments
            .iter()
            .map(|apt| apt.booked_interval(&self.timezone))
            .filter(|interval| interval.start.date() == date)
            .collect())
    }
}
