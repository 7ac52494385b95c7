// libs/doctor-cell/src/services/time_grid.rs

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone};

use shared_models::WorkingHours;

/// Candidate start times for `duration_minutes`-long slots on `date`.
///
/// The working window is cut into consecutive windows starting at
/// `working_hours.start`; a trailing window shorter than the duration is
/// dropped, so no slot ends after `working_hours.end`. When `date` is the
/// current day in `now`'s timezone, slots that do not start strictly after
/// `now` are suppressed. Other dates, past ones included, are not filtered.
pub fn generate_slots<Tz: TimeZone>(
    date: NaiveDate,
    working_hours: &WorkingHours,
    duration_minutes: i64,
    now: &DateTime<Tz>,
) -> Vec<NaiveTime> {
    if duration_minutes <= 0 {
        return Vec::new();
    }
    let Some(step) = TimeDelta::try_minutes(duration_minutes) else {
        return Vec::new();
    };
    let window_end = date.and_time(working_hours.end);
    let now_local = now.naive_local();
    let is_today = now_local.date() == date;

    let mut slots = Vec::new();
    let mut cursor = date.and_time(working_hours.start);

    while let Some(slot_end) = cursor.checked_add_signed(step) {
        if slot_end > window_end {
            break;
        }
        if !is_today || cursor > now_local {
            slots.push(cursor.time());
        }
        cursor = slot_end;
    }

    slots
}
