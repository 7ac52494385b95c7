use chrono::{DateTime, FixedOffset};

use doctor_cell::services::overlap::intervals_overlap;
use shared_models::{Appointment, NewAppointment};

/// Booking conflict rule: two appointments collide when they start at the
/// same instant, whatever their offsets or durations.
pub fn starts_collide(a: &DateTime<FixedOffset>, b: &DateTime<FixedOffset>) -> bool {
    a == b
}

/// First appointment of the proposal's doctor starting at the same instant,
/// ignoring `excluding_id` (the appointment being edited).
pub fn find_start_collision<'a>(
    proposal: &NewAppointment,
    existing: &'a [Appointment],
    excluding_id: Option<i64>,
) -> Option<&'a Appointment> {
    existing.iter().find(|apt| {
        apt.doctor_id == proposal.doctor_id
            && Some(apt.id) != excluding_id
            && starts_collide(&apt.date, &proposal.date)
    })
}

/// Appointments whose full interval overlaps the proposal. Stricter than
/// [`find_start_collision`]; the booking path only reports these.
pub fn overlapping_appointments<'a>(
    proposal: &NewAppointment,
    existing: &'a [Appointment],
    excluding_id: Option<i64>,
) -> Vec<&'a Appointment> {
    let proposal_end = proposal.end();

    existing
        .iter()
        .filter(|apt| apt.doctor_id == proposal.doctor_id && Some(apt.id) != excluding_id)
        .filter(|apt| intervals_overlap(proposal.date, proposal_end, apt.date, apt.end()))
        .collect()
}
