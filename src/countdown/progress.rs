//! Progress across the current day or night segment.
//!
//! A cycle runs from one prayer to the next: Fajr → Iftar while counting to
//! Iftar, Iftar → Fajr while counting to Fajr. The denominator is the real
//! span between the two occurrences, so seasonal day lengths stay within
//! 0-100 %.

use chrono::NaiveDateTime;

use crate::countdown::error::CountdownError;
use crate::countdown::resolver::{occurrence_on, resolve_occurrence, shift_days};
use crate::types::{ActivePrayer, TimeOfDay};

/// Returns `(cycle_start, cycle_end)` for the segment ending at the next
/// occurrence of `active`.
///
/// `cycle_start` is the latest occurrence of the other prayer strictly
/// before `cycle_end`.
pub fn cycle_bounds(
    active: ActivePrayer,
    now: NaiveDateTime,
    fajr: TimeOfDay,
    iftar: TimeOfDay,
) -> (NaiveDateTime, NaiveDateTime) {
    let (target, opening) = match active {
        ActivePrayer::Iftar => (iftar, fajr),
        ActivePrayer::Fajr => (fajr, iftar),
    };

    let end = resolve_occurrence(target, now);
    let mut start = occurrence_on(end.date(), opening);
    if start >= end {
        start = shift_days(start, -1);
    }
    (start, end)
}

/// Computes the elapsed share of a cycle as a percentage in `[0, 100]`.
///
/// When `now` precedes `cycle_start` both bounds move back one day first, so
/// a `now` inside the previous cycle still yields an in-range value.
///
/// # Errors
///
/// Returns [`CountdownError::DegenerateCycle`] if `cycle_end` is not after
/// `cycle_start`.
pub fn compute_progress(
    now: NaiveDateTime,
    cycle_start: NaiveDateTime,
    cycle_end: NaiveDateTime,
) -> Result<f64, CountdownError> {
    if cycle_end <= cycle_start {
        return Err(CountdownError::DegenerateCycle {
            start: cycle_start,
            end: cycle_end,
        });
    }

    let (start, end) = if now < cycle_start {
        (shift_days(cycle_start, -1), shift_days(cycle_end, -1))
    } else {
        (cycle_start, cycle_end)
    };

    let total = (end - start).num_milliseconds() as f64;
    let elapsed = (now - start).num_milliseconds() as f64;

    Ok((elapsed / total * 100.0).clamp(0.0, 100.0))
}
