//! Countdown engine.
//!
//! This module provides the tick loop:
//! - Automatic Iftar/Fajr selection and transitions
//! - Remaining time and cycle progress once per second
//! - One-shot reminder and celebration side effects
//! - Manual override with a configurable policy at its target
//! - Event firing for the presentation layer

use chrono::{NaiveDateTime, TimeDelta};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::countdown::clock::Clock;
use crate::countdown::config::{CountdownConfig, OverridePolicy};
use crate::countdown::error::CountdownError;
use crate::countdown::latch::{CelebrationTimer, ReminderLatch};
use crate::countdown::progress::{compute_progress, cycle_bounds};
use crate::countdown::resolver::resolve_occurrence;
use crate::countdown::selector::select_active;
use crate::notification::{create_arrival_content, create_reminder_content, NotificationSink};
use crate::types::{
    ActivePrayer, CelebrationState, CountdownSnapshot, PrayerTimes, TimeLeft, TimeOfDay,
};

// ============================================================================
// CountdownEvent
// ============================================================================

/// Countdown events for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum CountdownEvent {
    /// New prayer times were injected
    PrayerTimesUpdated,
    /// One second elapsed
    Tick(CountdownSnapshot),
    /// The reminder threshold was crossed
    Reminder {
        prayer: ActivePrayer,
        remaining: TimeLeft,
    },
    /// The active prayer changed automatically
    Transition {
        /// Prayer whose time just arrived
        from: ActivePrayer,
        to: ActivePrayer,
    },
    /// A manually selected prayer's time arrived without switching
    TargetReached { prayer: ActivePrayer },
    /// A celebration banner became visible
    CelebrationStarted {
        prayer: ActivePrayer,
        message: String,
    },
    /// The celebration banner was cleared
    CelebrationCleared,
    /// The user selected a prayer manually
    Toggled { active: ActivePrayer },
    /// The manual override was cleared
    OverrideReleased,
    /// The tick loop stopped
    Stopped,
}

/// Commands accepted by a running engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    /// Switch to the other prayer and hold it manually
    Toggle,
    /// Drop the manual override
    ResumeAutomatic,
    /// Replace the prayer times
    SetPrayerTimes(PrayerTimes),
    /// Stop the tick loop
    Shutdown,
}

// ============================================================================
// CountdownEngine
// ============================================================================

/// Countdown engine that tracks the active prayer and its side effects.
pub struct CountdownEngine<N> {
    config: CountdownConfig,
    prayer_times: Option<PrayerTimes>,
    active: ActivePrayer,
    manual_override: bool,
    /// Target of the previous tick, used to notice that it was reached
    last_target: Option<NaiveDateTime>,
    /// Last target already reported as reached under a manual override
    reported_target: Option<NaiveDateTime>,
    ticked: bool,
    reminder: ReminderLatch,
    celebration: CelebrationTimer,
    notifier: N,
    event_tx: mpsc::UnboundedSender<CountdownEvent>,
}

impl<N: NotificationSink> CountdownEngine<N> {
    /// Creates an engine with no prayer times; it stays idle until
    /// [`set_prayer_times`](Self::set_prayer_times) is called.
    pub fn new(
        config: CountdownConfig,
        notifier: N,
        event_tx: mpsc::UnboundedSender<CountdownEvent>,
    ) -> Self {
        let reminder = ReminderLatch::new(config.reminder_minutes);
        Self {
            config,
            prayer_times: None,
            active: ActivePrayer::Iftar,
            manual_override: false,
            last_target: None,
            reported_target: None,
            ticked: false,
            reminder,
            celebration: CelebrationTimer::default(),
            notifier,
            event_tx,
        }
    }

    /// Replaces the prayer times wholesale.
    ///
    /// Target tracking is reset so the change of times is not mistaken for
    /// a prayer arriving. The reminder latch is kept: a reminder already sent
    /// for the current target is not repeated.
    pub fn set_prayer_times(&mut self, times: PrayerTimes) {
        tracing::debug!(
            "prayer times updated: fajr {} iftar {}",
            times.fajr,
            times.iftar()
        );
        self.prayer_times = Some(times);
        self.last_target = None;
        self.reported_target = None;
        self.emit(CountdownEvent::PrayerTimesUpdated);
    }

    /// Switches to the other prayer and holds it as a manual override.
    pub fn toggle(&mut self) -> ActivePrayer {
        let next = self.active.other();
        self.force(next);
        next
    }

    /// Selects `prayer` manually, suppressing automatic transitions.
    pub fn force(&mut self, prayer: ActivePrayer) {
        self.active = prayer;
        self.manual_override = true;
        self.last_target = None;
        self.reported_target = None;
        tracing::info!("manual override: counting down to {}", prayer);
        self.emit(CountdownEvent::Toggled { active: prayer });
    }

    /// Clears the manual override; the next tick reselects silently.
    pub fn resume_automatic(&mut self) {
        if !self.manual_override {
            return;
        }
        self.manual_override = false;
        self.last_target = None;
        self.reported_target = None;
        self.emit(CountdownEvent::OverrideReleased);
    }

    /// Recomputes the countdown at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`CountdownError::NotReady`] if no prayer times have been
    /// provided.
    pub fn tick_at(&mut self, now: NaiveDateTime) -> Result<CountdownSnapshot, CountdownError> {
        let times = self
            .prayer_times
            .clone()
            .ok_or(CountdownError::NotReady)?;
        let (fajr, iftar) = (times.fajr, times.iftar());

        if self.celebration.poll(now) {
            self.emit(CountdownEvent::CelebrationCleared);
        }

        let first_tick = !self.ticked;
        self.ticked = true;
        let reached = self.last_target.is_some_and(|target| now >= target);

        if self.manual_override {
            if reached {
                self.handle_override_target(now, fajr, iftar);
            }
        } else {
            let selected = select_active(now, fajr, iftar);
            if selected != self.active {
                if reached {
                    self.transition(selected, now);
                } else {
                    self.active = selected;
                }
            }
            if first_tick {
                self.celebrate_recent_arrival(now, fajr, iftar);
            }
        }

        let mut target = resolve_occurrence(times.time_for(self.active), now);
        if target == now && !self.manual_override {
            self.transition(self.active.other(), now);
            target = resolve_occurrence(times.time_for(self.active), now);
        }

        let remaining = TimeLeft::from_duration(target - now);
        let (cycle_start, cycle_end) = cycle_bounds(self.active, now, fajr, iftar);
        let progress = compute_progress(now, cycle_start, cycle_end)?;

        if self.reminder.update(remaining.total_seconds()) {
            self.send_reminder(remaining);
        }

        self.last_target = Some(target);

        let snapshot = CountdownSnapshot {
            active: self.active,
            target,
            remaining,
            progress,
            manual_override: self.manual_override,
            celebration: self.celebration.state().clone(),
        };
        self.emit(CountdownEvent::Tick(snapshot.clone()));
        Ok(snapshot)
    }

    /// Runs the tick loop until [`EngineCommand::Shutdown`] arrives or the
    /// command channel closes.
    ///
    /// Ticks are skipped while prayer times are missing. No tick fires after
    /// shutdown.
    pub async fn run<C: Clock>(
        &mut self,
        clock: &C,
        mut commands: mpsc::UnboundedReceiver<EngineCommand>,
    ) -> Result<(), CountdownError> {
        let result = self.run_loop(clock, &mut commands).await;
        if let Err(e) = &result {
            tracing::error!("countdown stopped: {}", e);
        }
        self.emit(CountdownEvent::Stopped);
        result
    }

    async fn run_loop<C: Clock>(
        &mut self,
        clock: &C,
        commands: &mut mpsc::UnboundedReceiver<EngineCommand>,
    ) -> Result<(), CountdownError> {
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                command = commands.recv() => {
                    match command {
                        Some(EngineCommand::Shutdown) | None => return Ok(()),
                        Some(command) => {
                            self.apply(command);
                            self.tick_if_ready(clock.now())?;
                        }
                    }
                }
                _ = ticker.tick() => {
                    self.tick_if_ready(clock.now())?;
                }
            }
        }
    }

    fn tick_if_ready(&mut self, now: NaiveDateTime) -> Result<(), CountdownError> {
        match self.tick_at(now) {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_ready() => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn apply(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Toggle => {
                self.toggle();
            }
            EngineCommand::ResumeAutomatic => self.resume_automatic(),
            EngineCommand::SetPrayerTimes(times) => self.set_prayer_times(times),
            EngineCommand::Shutdown => {}
        }
    }

    /// Handles a manually selected target being reached.
    fn handle_override_target(
        &mut self,
        now: NaiveDateTime,
        fajr: TimeOfDay,
        iftar: TimeOfDay,
    ) {
        if self.reported_target.is_some() && self.reported_target == self.last_target {
            return;
        }
        self.reported_target = self.last_target;
        self.emit(CountdownEvent::TargetReached {
            prayer: self.active,
        });

        match self.config.override_policy {
            OverridePolicy::Sticky => {
                tracing::debug!("{} reached under manual override", self.active);
            }
            OverridePolicy::ReleaseOnTarget => {
                self.manual_override = false;
                self.reported_target = None;
                self.emit(CountdownEvent::OverrideReleased);

                let selected = select_active(now, fajr, iftar);
                if selected != self.active {
                    self.transition(selected, now);
                }
            }
        }
    }

    /// Switches to `to` because the active prayer's time arrived.
    fn transition(&mut self, to: ActivePrayer, now: NaiveDateTime) {
        let from = self.active;
        self.active = to;
        tracing::info!("{} time reached, now counting down to {}", from, to);
        self.emit(CountdownEvent::Transition { from, to });

        self.start_celebration(from, now);

        let content = create_arrival_content(from);
        if let Err(e) = self.notifier.deliver(&content.title, &content.body) {
            tracing::warn!("failed to deliver {} notification: {}", from, e);
        }
    }

    /// On the first tick, celebrates the prayer that opened the current
    /// cycle if it happened only moments ago.
    fn celebrate_recent_arrival(
        &mut self,
        now: NaiveDateTime,
        fajr: TimeOfDay,
        iftar: TimeOfDay,
    ) {
        if self.config.startup_celebration_minutes == 0 {
            return;
        }
        let (cycle_start, _) = cycle_bounds(self.active, now, fajr, iftar);
        let since = now - cycle_start;
        let window = TimeDelta::minutes(i64::from(self.config.startup_celebration_minutes));

        if since >= TimeDelta::zero() && since < window {
            self.start_celebration(self.active.other(), now);
        }
    }

    fn start_celebration(&mut self, prayer: ActivePrayer, now: NaiveDateTime) {
        let duration = TimeDelta::seconds(i64::from(self.config.celebration_seconds));
        self.celebration.start(prayer, now, duration);
        self.emit(CountdownEvent::CelebrationStarted {
            prayer,
            message: prayer.celebration_message().to_string(),
        });
    }

    fn send_reminder(&mut self, remaining: TimeLeft) {
        let minutes = remaining.total_seconds().div_ceil(60);
        let content = create_reminder_content(self.active, minutes);
        if let Err(e) = self.notifier.deliver(&content.title, &content.body) {
            tracing::warn!("failed to deliver reminder: {}", e);
        }
        self.emit(CountdownEvent::Reminder {
            prayer: self.active,
            remaining,
        });
    }

    fn emit(&self, event: CountdownEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::trace!("countdown event dropped: no listener");
        }
    }

    /// Returns the prayer currently counted down to.
    pub fn active(&self) -> ActivePrayer {
        self.active
    }

    /// Returns true while a manual override suppresses automatic transitions.
    pub fn is_manual_override(&self) -> bool {
        self.manual_override
    }

    pub fn celebration(&self) -> &CelebrationState {
        self.celebration.state()
    }

    pub fn prayer_times(&self) -> Option<&PrayerTimes> {
        self.prayer_times.as_ref()
    }

    pub fn config(&self) -> &CountdownConfig {
        &self.config
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}

// ============================================================================
// Tests
// ============================================================================
