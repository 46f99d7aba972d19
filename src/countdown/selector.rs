//! Active-event selection.

use chrono::{NaiveDateTime, NaiveTime};

use crate::countdown::resolver::occurrence_on;
use crate::types::{ActivePrayer, TimeOfDay};

/// Decides which prayer the countdown should target at `now`.
///
/// Rules are evaluated in order:
/// 1. today's Iftar has passed → Fajr (tonight's or tomorrow's)
/// 2. `now` is between midnight and today's Fajr → Fajr
/// 3. otherwise → Iftar
///
/// This only covers automatic selection; a manual override is handled by
/// the engine, which skips this call while the override holds.
pub fn select_active(now: NaiveDateTime, fajr: TimeOfDay, iftar: TimeOfDay) -> ActivePrayer {
    let todays_iftar = occurrence_on(now.date(), iftar);
    if now > todays_iftar {
        return ActivePrayer::Fajr;
    }

    if is_before_fajr(now.time(), fajr) {
        return ActivePrayer::Fajr;
    }

    ActivePrayer::Iftar
}

/// Returns true when `now` falls in the midnight-to-Fajr window.
fn is_before_fajr(now: NaiveTime, fajr: TimeOfDay) -> bool {
    now < fajr.to_naive_time()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn fajr() -> TimeOfDay {
        TimeOfDay::new(5, 0).unwrap()
    }

    fn iftar() -> TimeOfDay {
        TimeOfDay::new(18, 30).unwrap()
    }

    #[test]
    fn test_daytime_is_iftar() {
        assert_eq!(select_active(at(12, 0, 0), fajr(), iftar()), ActivePrayer::Iftar);
    }

    #[test]
    fn test_just_before_iftar() {
        assert_eq!(select_active(at(18, 29, 50), fajr(), iftar()), ActivePrayer::Iftar);
    }

    #[test]
    fn test_exact_iftar_is_still_iftar() {
        assert_eq!(select_active(at(18, 30, 0), fajr(), iftar()), ActivePrayer::Iftar);
    }

    #[test]
    fn test_after_iftar_is_fajr() {
        assert_eq!(select_active(at(18, 30, 1), fajr(), iftar()), ActivePrayer::Fajr);
        assert_eq!(select_active(at(23, 59, 59), fajr(), iftar()), ActivePrayer::Fajr);
    }

    #[test]
    fn test_before_fajr_window() {
        assert_eq!(select_active(at(0, 0, 0), fajr(), iftar()), ActivePrayer::Fajr);
        assert_eq!(select_active(at(2, 0, 0), fajr(), iftar()), ActivePrayer::Fajr);
        assert_eq!(select_active(at(4, 59, 59), fajr(), iftar()), ActivePrayer::Fajr);
    }

    #[test]
    fn test_exact_fajr_switches_to_iftar() {
        assert_eq!(select_active(at(5, 0, 0), fajr(), iftar()), ActivePrayer::Iftar);
    }

    #[test]
    fn test_idempotent() {
        for h in 0..24 {
            let now = at(h, 17, 3);
            let first = select_active(now, fajr(), iftar());
            let second = select_active(now, fajr(), iftar());
            assert_eq!(first, second);
        }
    }
}
