// libs/doctor-cell/src/services/overlap.rs

use chrono::{NaiveDate, NaiveTime};

use shared_models::BookedInterval;

/// Half-open overlap test: `[a_start, a_end)` and `[b_start, b_end)` share an
/// instant. Touching intervals do not overlap.
pub fn intervals_overlap<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && b_start < a_end
}

/// Drops every slot on `date` whose `[slot, slot + duration)` window overlaps
/// a booked interval. Input order is preserved.
pub fn filter_available(
    date: NaiveDate,
    slots: Vec<NaiveTime>,
    booked: &[BookedInterval],
    duration_minutes: i64,
) -> Vec<NaiveTime> {
    slots
        .into_iter()
        .filter(|slot| {
            let window = BookedInterval::new(date.and_time(*slot), duration_minutes);

            !booked
                .iter()
                .any(|b| intervals_overlap(window.start, window.end(), b.start, b.end()))
        })
        .collect()
}
