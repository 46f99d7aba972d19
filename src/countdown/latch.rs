//! One-shot latches for countdown side effects.

use chrono::{NaiveDateTime, TimeDelta};

use crate::types::{ActivePrayer, CelebrationState};

// ============================================================================
// ReminderLatch
// ============================================================================

/// Fires once when the remaining time enters the reminder window and re-arms
/// only after the remaining time leaves it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderLatch {
    threshold_seconds: u32,
    fired: bool,
}

impl ReminderLatch {
    pub fn new(threshold_minutes: u32) -> Self {
        Self {
            threshold_seconds: threshold_minutes.saturating_mul(60),
            fired: false,
        }
    }

    /// Feeds the current remaining time; returns true exactly when the
    /// reminder should fire.
    pub fn update(&mut self, remaining_seconds: u32) -> bool {
        if remaining_seconds > self.threshold_seconds {
            self.fired = false;
            return false;
        }
        if self.fired {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn is_fired(&self) -> bool {
        self.fired
    }
}

// ============================================================================
// CelebrationTimer
// ============================================================================

/// Owns the celebration banner and its single pending clear.
///
/// Starting a new celebration replaces the pending clear, so a stale clear
/// can never hide a newer banner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CelebrationTimer {
    state: CelebrationState,
}

impl CelebrationTimer {
    /// Shows the celebration for `prayer` until `now + duration`.
    pub fn start(&mut self, prayer: ActivePrayer, now: NaiveDateTime, duration: TimeDelta) {
        self.state = CelebrationState::for_prayer(prayer, now + duration);
    }

    /// Clears the banner if its deadline has passed. Returns true if it was
    /// cleared by this call.
    pub fn poll(&mut self, now: NaiveDateTime) -> bool {
        match self.state.clear_at {
            Some(clear_at) if self.state.visible && now >= clear_at => {
                self.state = CelebrationState::default();
                true
            }
            _ => false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    pub fn state(&self) -> &CelebrationState {
        &self.state
    }
}
