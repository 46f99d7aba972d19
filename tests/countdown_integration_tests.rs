//! Integration tests for the countdown engine.
//!
//! These tests drive the engine through whole evenings and nights with a
//! fixed clock and a mock notification sink:
//! - Evening transition from Iftar to Fajr with celebration
//! - Night countdown across midnight
//! - Manual override under both policies
//! - The tick loop with keyboard-style commands

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use tokio::sync::mpsc;

use iftar_countdown::countdown::{
    Clock, CountdownConfig, CountdownEngine, CountdownEvent, EngineCommand, ManualClock,
    OverridePolicy,
};
use iftar_countdown::notification::MockNotificationSink;
use iftar_countdown::types::{ActivePrayer, PrayerTimes, TimeLeft, TimeOfDay};

// ============================================================================
// Test Helpers
// ============================================================================

fn at(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, day)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

/// Fajr 05:00, Iftar 18:30.
fn create_times() -> PrayerTimes {
    PrayerTimes {
        date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        fajr: TimeOfDay::new(5, 0).unwrap(),
        sunrise: TimeOfDay::new(6, 20).unwrap(),
        dhuhr: TimeOfDay::new(12, 10).unwrap(),
        asr: TimeOfDay::new(15, 30).unwrap(),
        maghrib: TimeOfDay::new(18, 30).unwrap(),
        isha: TimeOfDay::new(19, 50).unwrap(),
    }
}

fn create_engine(
    config: CountdownConfig,
) -> (
    CountdownEngine<MockNotificationSink>,
    mpsc::UnboundedReceiver<CountdownEvent>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut engine = CountdownEngine::new(config, MockNotificationSink::new(), tx);
    engine.set_prayer_times(create_times());
    (engine, rx)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<CountdownEvent>) -> Vec<CountdownEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Ticks once per second from `from` to `to` inclusive.
fn tick_through(
    engine: &mut CountdownEngine<MockNotificationSink>,
    from: NaiveDateTime,
    to: NaiveDateTime,
) {
    let mut now = from;
    while now <= to {
        engine.tick_at(now).unwrap();
        now += TimeDelta::seconds(1);
    }
}

fn count<F: Fn(&CountdownEvent) -> bool>(events: &[CountdownEvent], pred: F) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

// ============================================================================
// Evening
// ============================================================================

#[test]
fn test_evening_transition_to_fajr() {
    let (mut engine, mut rx) = create_engine(CountdownConfig::default());

    let snapshot = engine.tick_at(at(10, 18, 29, 50)).unwrap();
    assert_eq!(snapshot.active, ActivePrayer::Iftar);
    assert_eq!(snapshot.remaining, TimeLeft::from_seconds(10));
    assert!(snapshot.progress > 99.9 && snapshot.progress <= 100.0);

    let snapshot = engine.tick_at(at(10, 18, 30, 1)).unwrap();
    assert_eq!(snapshot.active, ActivePrayer::Fajr);
    assert_eq!(snapshot.target, at(11, 5, 0, 0));
    assert!(snapshot.celebration.visible);
    assert_eq!(snapshot.celebration.message, "It's Iftar Time!");
    assert!(snapshot.progress < 0.1);

    let events = drain(&mut rx);
    assert!(events.contains(&CountdownEvent::Transition {
        from: ActivePrayer::Iftar,
        to: ActivePrayer::Fajr,
    }));
    assert_eq!(
        count(&events, |e| matches!(e, CountdownEvent::CelebrationStarted { .. })),
        1
    );

    let titles: Vec<String> = engine
        .notifier()
        .get_deliveries()
        .into_iter()
        .map(|n| n.title)
        .collect();
    assert_eq!(titles, vec!["Iftar in 1 minute", "It's Iftar Time!"]);
}

#[test]
fn test_celebration_clears_and_does_not_repeat() {
    let (mut engine, mut rx) = create_engine(CountdownConfig::default());

    tick_through(&mut engine, at(10, 18, 29, 55), at(10, 18, 31, 0));

    let events = drain(&mut rx);
    assert_eq!(
        count(&events, |e| matches!(e, CountdownEvent::Transition { .. })),
        1
    );
    assert_eq!(
        count(&events, |e| matches!(e, CountdownEvent::CelebrationStarted { .. })),
        1
    );
    assert_eq!(
        count(&events, |e| *e == CountdownEvent::CelebrationCleared),
        1
    );
    assert!(!engine.celebration().visible);
}

#[test]
fn test_progress_is_monotonic_through_afternoon() {
    let (mut engine, _rx) = create_engine(CountdownConfig::default());

    let mut last = -1.0;
    let mut now = at(10, 12, 0, 0);
    while now < at(10, 18, 30, 0) {
        let snapshot = engine.tick_at(now).unwrap();
        assert!(snapshot.progress >= last);
        assert!((0.0..=100.0).contains(&snapshot.progress));
        last = snapshot.progress;
        now += TimeDelta::minutes(7);
    }
}

#[test]
fn test_reminder_fires_once_per_crossing() {
    let (mut engine, mut rx) = create_engine(CountdownConfig::default());

    tick_through(&mut engine, at(10, 18, 14, 50), at(10, 18, 15, 30));

    let events = drain(&mut rx);
    assert_eq!(
        count(&events, |e| matches!(
            e,
            CountdownEvent::Reminder {
                prayer: ActivePrayer::Iftar,
                ..
            }
        )),
        1
    );
    assert_eq!(engine.notifier().get_deliveries()[0].title, "Iftar in 15 minutes");
}

// ============================================================================
// Night
// ============================================================================

#[test]
fn test_night_counts_to_fajr() {
    let (mut engine, _rx) = create_engine(CountdownConfig::default());

    let snapshot = engine.tick_at(at(11, 2, 0, 0)).unwrap();

    assert_eq!(snapshot.active, ActivePrayer::Fajr);
    assert_eq!(snapshot.remaining.to_string(), "03:00:00");
    assert!(!snapshot.celebration.visible);
}

#[test]
fn test_fajr_arrival_switches_to_iftar() {
    let (mut engine, mut rx) = create_engine(CountdownConfig::default());

    engine.tick_at(at(11, 4, 59, 59)).unwrap();
    let snapshot = engine.tick_at(at(11, 5, 0, 0)).unwrap();

    assert_eq!(snapshot.active, ActivePrayer::Iftar);
    assert_eq!(snapshot.target, at(11, 18, 30, 0));
    assert_eq!(snapshot.celebration.message, "It's Fajr Time!");
    assert!(drain(&mut rx).contains(&CountdownEvent::Transition {
        from: ActivePrayer::Fajr,
        to: ActivePrayer::Iftar,
    }));
}

#[test]
fn test_fresh_start_just_after_iftar_celebrates() {
    let (mut engine, _rx) = create_engine(CountdownConfig::default());

    let snapshot = engine.tick_at(at(10, 18, 32, 0)).unwrap();

    assert_eq!(snapshot.active, ActivePrayer::Fajr);
    assert!(snapshot.celebration.visible);
    assert_eq!(snapshot.celebration.message, "It's Iftar Time!");
}

// ============================================================================
// Manual Override
// ============================================================================

#[test]
fn test_toggle_holds_fajr_under_sticky_policy() {
    let (mut engine, mut rx) = create_engine(CountdownConfig::default());
    engine.tick_at(at(10, 18, 0, 0)).unwrap();

    assert_eq!(engine.toggle(), ActivePrayer::Fajr);
    let snapshot = engine.tick_at(at(10, 18, 0, 1)).unwrap();
    assert!(snapshot.manual_override);
    assert_eq!(snapshot.target, at(11, 5, 0, 0));

    // Iftar passes without a transition.
    tick_through(&mut engine, at(10, 18, 29, 58), at(10, 18, 30, 2));
    assert_eq!(engine.active(), ActivePrayer::Fajr);

    // Fajr arrives: reported once, override kept.
    tick_through(&mut engine, at(11, 4, 59, 58), at(11, 5, 0, 5));
    assert_eq!(engine.active(), ActivePrayer::Fajr);
    assert!(engine.is_manual_override());

    let events = drain(&mut rx);
    assert_eq!(
        count(&events, |e| matches!(e, CountdownEvent::Transition { .. })),
        0
    );
    assert_eq!(
        count(&events, |e| *e
            == CountdownEvent::TargetReached {
                prayer: ActivePrayer::Fajr
            }),
        1
    );
}

#[test]
fn test_toggle_releases_on_target() {
    let config = CountdownConfig::default().with_override_policy(OverridePolicy::ReleaseOnTarget);
    let (mut engine, mut rx) = create_engine(config);
    engine.tick_at(at(10, 18, 0, 0)).unwrap();
    engine.toggle();

    engine.tick_at(at(11, 4, 59, 59)).unwrap();
    let snapshot = engine.tick_at(at(11, 5, 0, 1)).unwrap();

    assert!(!snapshot.manual_override);
    assert_eq!(snapshot.active, ActivePrayer::Iftar);
    assert_eq!(snapshot.celebration.message, "It's Fajr Time!");

    let events = drain(&mut rx);
    assert!(events.contains(&CountdownEvent::OverrideReleased));
    assert!(events.contains(&CountdownEvent::Transition {
        from: ActivePrayer::Fajr,
        to: ActivePrayer::Iftar,
    }));
}

#[test]
fn test_resume_automatic_reselects_without_celebration() {
    let (mut engine, mut rx) = create_engine(CountdownConfig::default());
    engine.tick_at(at(10, 12, 0, 0)).unwrap();
    engine.toggle();
    engine.tick_at(at(10, 12, 0, 1)).unwrap();

    engine.resume_automatic();
    let snapshot = engine.tick_at(at(10, 12, 0, 2)).unwrap();

    assert_eq!(snapshot.active, ActivePrayer::Iftar);
    assert!(!snapshot.manual_override);
    assert!(!snapshot.celebration.visible);
    assert_eq!(
        count(&drain(&mut rx), |e| matches!(e, CountdownEvent::CelebrationStarted { .. })),
        0
    );
}

#[test]
fn test_notification_failure_does_not_stop_countdown() {
    let (mut engine, _rx) = create_engine(CountdownConfig::default());
    engine.notifier().set_should_fail(true);

    engine.tick_at(at(10, 18, 29, 59)).unwrap();
    let snapshot = engine.tick_at(at(10, 18, 30, 0)).unwrap();

    assert_eq!(snapshot.active, ActivePrayer::Fajr);
}

// ============================================================================
// Tick Loop
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_run_loop_applies_commands() {
    let (mut engine, mut rx) = create_engine(CountdownConfig::default());
    let clock = ManualClock::new(at(10, 12, 0, 0));
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

    let driver = async {
        tokio::time::sleep(Duration::from_millis(2500)).await;
        cmd_tx.send(EngineCommand::Toggle).unwrap();
        clock.advance(TimeDelta::seconds(3));
        tokio::time::sleep(Duration::from_millis(1000)).await;
        cmd_tx.send(EngineCommand::ResumeAutomatic).unwrap();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        cmd_tx.send(EngineCommand::Shutdown).unwrap();
    };

    let (result, ()) = tokio::join!(engine.run(&clock, cmd_rx), driver);
    result.unwrap();

    let events = drain(&mut rx);
    assert!(events.contains(&CountdownEvent::Toggled {
        active: ActivePrayer::Fajr
    }));
    assert!(events.contains(&CountdownEvent::OverrideReleased));
    assert_eq!(events.last(), Some(&CountdownEvent::Stopped));
    assert_eq!(engine.active(), ActivePrayer::Iftar);
    assert_eq!(clock.now(), at(10, 12, 0, 3));
}

#[tokio::test(start_paused = true)]
async fn test_run_loop_accepts_new_prayer_times() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut engine = CountdownEngine::new(CountdownConfig::default(), MockNotificationSink::new(), tx);
    let clock = ManualClock::new(at(10, 12, 0, 0));
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

    cmd_tx.send(EngineCommand::SetPrayerTimes(create_times())).unwrap();
    cmd_tx.send(EngineCommand::Shutdown).unwrap();
    engine.run(&clock, cmd_rx).await.unwrap();

    let events = drain(&mut rx);
    assert_eq!(events.first(), Some(&CountdownEvent::PrayerTimesUpdated));
    assert!(events
        .iter()
        .any(|e| matches!(e, CountdownEvent::Tick(s) if s.active == ActivePrayer::Iftar)));
    assert_eq!(engine.prayer_times(), Some(&create_times()));
}
