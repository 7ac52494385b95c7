use chrono::{DateTime, FixedOffset, TimeDelta};
use chrono_tz::Tz;

use shared_models::{Appointment, Doctor, NewAppointment, WorkingHours};

use crate::models::BookingRejection;
use crate::services::conflict::find_start_collision;

/// Stateless gate run once per create or update, before anything is written.
#[derive(Debug, Clone, Copy)]
pub struct BookingValidator {
    timezone: Tz,
}

impl BookingValidator {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Accepts the proposal or names the first rule it breaks. Working hours
    /// are checked before collisions.
    pub fn validate(
        &self,
        doctor: &Doctor,
        proposal: &NewAppointment,
        existing: &[Appointment],
        excluding_id: Option<i64>,
    ) -> Result<(), BookingRejection> {
        if !self.within_working_hours(&doctor.working_hours, &proposal.date, proposal.duration) {
            return Err(BookingRejection::OutsideWorkingHours);
        }

        if find_start_collision(proposal, existing, excluding_id).is_some() {
            return Err(BookingRejection::SlotAlreadyBooked);
        }

        Ok(())
    }

    /// `[start, start + duration)` lies inside the working window of the
    /// start's calendar date in the clinic timezone.
    pub fn within_working_hours(
        &self,
        working_hours: &WorkingHours,
        start: &DateTime<FixedOffset>,
        duration_minutes: i64,
    ) -> bool {
        let local_start = start.with_timezone(&self.timezone).naive_local();
        let Some(local_end) = TimeDelta::try_minutes(duration_minutes)
            .and_then(|length| local_start.checked_add_signed(length))
        else {
            return false;
        };
        let day = local_start.date();

        local_start >= day.and_time(working_hours.start) && local_end <= day.and_time(working_hours.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Kolkata;
    use shared_models::AvailabilityStatus;

    fn doctor() -> Doctor {
        Doctor {
            id: 1,
            name: "Dr. Alice Smith".to_string(),
            specialization: "Cardiology".to_string(),
            working_hours: WorkingHours::parse("09:00", "17:00").unwrap(),
            profile_image: None,
            availability_status: AvailabilityStatus::AvailableToday,
        }
    }

    fn proposal(date: &str, duration: i64) -> NewAppointment {
        NewAppointment {
            doctor_id: 1,
            date: DateTime::parse_from_rfc3339(date).unwrap(),
            duration,
            appointment_type: "consultation".to_string(),
            patient_name: "Anil".to_string(),
            patient_email: "anil@example.com".to_string(),
            notes: None,
        }
    }

    fn validator() -> BookingValidator {
        BookingValidator::new(Kolkata)
    }

    #[test]
    fn exact_fill_of_working_window_is_accepted() {
        let full_day = proposal("2030-05-06T09:00:00+05:30", 8 * 60);
        assert_eq!(validator().validate(&doctor(), &full_day, &[], None), Ok(()));
    }

    #[test]
    fn start_before_opening_is_rejected() {
        let early = proposal("2030-05-06T08:59:00+05:30", 30);
        assert_eq!(
            validator().validate(&doctor(), &early, &[], None),
            Err(BookingRejection::OutsideWorkingHours)
        );
    }

    #[test]
    fn end_after_closing_is_rejected() {
        let late = proposal("2030-05-06T16:45:00+05:30", 30);
        assert_eq!(
            validator().validate(&doctor(), &late, &[], None),
            Err(BookingRejection::OutsideWorkingHours)
        );

        let last_slot = proposal("2030-05-06T16:30:00+05:30", 30);
        assert_eq!(validator().validate(&doctor(), &last_slot, &[], None), Ok(()));
    }

    #[test]
    fn working_hours_are_read_in_clinic_time() {
        // 03:30 UTC is 09:00 in Kolkata.
        let utc_start = proposal("2030-05-06T03:30:00Z", 60);
        assert_eq!(validator().validate(&doctor(), &utc_start, &[], None), Ok(()));

        // 12:00 UTC is 17:30 in Kolkata.
        let after_hours = proposal("2030-05-06T12:00:00Z", 30);
        assert_eq!(
            validator().validate(&doctor(), &after_hours, &[], None),
            Err(BookingRejection::OutsideWorkingHours)
        );
    }

    #[test]
    fn unrepresentable_duration_is_outside_hours() {
        let endless = proposal("2030-05-06T10:00:00+05:30", i64::MAX);
        assert_eq!(
            validator().validate(&doctor(), &endless, &[], None),
            Err(BookingRejection::OutsideWorkingHours)
        );
    }

    #[test]
    fn identical_start_is_already_booked() {
        let taken = proposal("2030-05-06T11:00:00+05:30", 60).into_appointment(9);
        let again = proposal("2030-05-06T11:00:00+05:30", 30);

        assert_eq!(
            validator().validate(&doctor(), &again, &[taken.clone()], None),
            Err(BookingRejection::SlotAlreadyBooked)
        );
        // Editing the booked appointment itself is not a collision.
        assert_eq!(validator().validate(&doctor(), &again, &[taken], Some(9)), Ok(()));
    }

    #[test]
    fn overlap_without_same_start_is_accepted() {
        let taken = proposal("2030-05-06T11:00:00+05:30", 60).into_appointment(9);
        let overlapping = proposal("2030-05-06T11:30:00+05:30", 30);

        assert_eq!(validator().validate(&doctor(), &overlapping, &[taken], None), Ok(()));
    }
}
