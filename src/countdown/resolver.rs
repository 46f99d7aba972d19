//! Event-time resolution.
//!
//! Turns a recurring time of day into its next concrete occurrence.

use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::types::TimeOfDay;

/// Combines a calendar date with a time of day (seconds zeroed).
pub fn occurrence_on(date: NaiveDate, time: TimeOfDay) -> NaiveDateTime {
    date.and_time(time.to_naive_time())
}

/// Shifts an occurrence by whole calendar days, forward or backward.
pub(crate) fn shift_days(at: NaiveDateTime, days: i64) -> NaiveDateTime {
    let shifted = if days >= 0 {
        at.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        at.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(if days >= 0 {
        NaiveDateTime::MAX
    } else {
        NaiveDateTime::MIN
    })
}

/// Returns the next occurrence of `time` relative to `now`.
///
/// Today's occurrence is returned while `now` has not passed it; otherwise
/// the occurrence moves to tomorrow using calendar arithmetic, so month and
/// year boundaries roll over correctly. The result is never earlier than
/// `now`.
pub fn resolve_occurrence(time: TimeOfDay, now: NaiveDateTime) -> NaiveDateTime {
    let candidate = occurrence_on(now.date(), time);
    if now > candidate {
        shift_days(candidate, 1)
    } else {
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn tod(h: u8, m: u8) -> TimeOfDay {
        TimeOfDay::new(h, m).unwrap()
    }

    #[test]
    fn test_future_time_today() {
        let now = at(2025, 3, 10, 12, 0, 0);
        assert_eq!(resolve_occurrence(tod(18, 30), now), at(2025, 3, 10, 18, 30, 0));
    }

    #[test]
    fn test_past_time_moves_to_tomorrow() {
        let now = at(2025, 3, 10, 19, 0, 0);
        assert_eq!(resolve_occurrence(tod(18, 30), now), at(2025, 3, 11, 18, 30, 0));
    }

    #[test]
    fn test_exact_instant_stays_today() {
        let now = at(2025, 3, 10, 18, 30, 0);
        assert_eq!(resolve_occurrence(tod(18, 30), now), now);
    }

    #[test]
    fn test_one_second_past_moves_to_tomorrow() {
        let now = at(2025, 3, 10, 18, 30, 1);
        assert_eq!(resolve_occurrence(tod(18, 30), now), at(2025, 3, 11, 18, 30, 0));
    }

    #[test]
    fn test_month_rollover() {
        let now = at(2025, 3, 31, 20, 0, 0);
        assert_eq!(resolve_occurrence(tod(4, 50), now), at(2025, 4, 1, 4, 50, 0));
    }

    #[test]
    fn test_year_rollover() {
        let now = at(2024, 12, 31, 23, 0, 0);
        assert_eq!(resolve_occurrence(tod(5, 0), now), at(2025, 1, 1, 5, 0, 0));
    }

    #[test]
    fn test_leap_day_rollover() {
        let now = at(2024, 2, 28, 21, 0, 0);
        assert_eq!(resolve_occurrence(tod(5, 0), now), at(2024, 2, 29, 5, 0, 0));
    }

    #[test]
    fn test_seconds_are_zeroed() {
        let now = at(2025, 3, 10, 1, 2, 3);
        let resolved = resolve_occurrence(tod(5, 0), now);
        assert_eq!(resolved.second(), 0);
        assert_eq!(resolved.nanosecond(), 0);
    }

    #[test]
    fn test_never_before_now() {
        let base = at(2025, 3, 10, 0, 0, 0);
        let times = [tod(0, 0), tod(4, 59), tod(12, 0), tod(18, 30), tod(23, 59)];

        for minute in (0..24 * 60).step_by(7) {
            let now = base + chrono::TimeDelta::minutes(minute) + chrono::TimeDelta::seconds(13);
            for time in times {
                let resolved = resolve_occurrence(time, now);
                assert!(resolved >= now, "{} resolved to {} before {}", time, resolved, now);
                assert!(resolved - now <= chrono::TimeDelta::days(1));
            }
        }
    }

    #[test]
    fn test_shift_days_backward() {
        assert_eq!(
            shift_days(at(2025, 3, 1, 5, 0, 0), -1),
            at(2025, 2, 28, 5, 0, 0)
        );
    }
}
