//! Countdown configuration types.
//!
//! Every field carries a serde default so a partial configuration file
//! still produces a usable configuration.

use serde::{Deserialize, Serialize};

/// Default reminder threshold in minutes.
fn default_reminder_minutes() -> u32 {
    15
}

/// Default celebration display time in seconds.
fn default_celebration_seconds() -> u32 {
    5
}

/// Default window in which a just-passed prayer is still celebrated at startup.
fn default_startup_celebration_minutes() -> u32 {
    5
}

/// What happens when a manually selected countdown reaches its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverridePolicy {
    /// Keep the manual choice and count down to its next occurrence.
    /// Only an explicit toggle back to automatic clears the override.
    #[default]
    Sticky,
    /// Clear the override once its target is reached and resume automatic
    /// transitions, including the celebration.
    ReleaseOnTarget,
}

impl OverridePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverridePolicy::Sticky => "sticky",
            OverridePolicy::ReleaseOnTarget => "release_on_target",
        }
    }
}

/// Configuration for the countdown engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// Minutes before a prayer at which the reminder fires (1-180)
    #[serde(default = "default_reminder_minutes")]
    pub reminder_minutes: u32,

    /// Seconds the celebration banner stays visible (5-7)
    #[serde(default = "default_celebration_seconds")]
    pub celebration_seconds: u32,

    /// Minutes after a prayer during which a fresh start still celebrates it
    /// (0 disables)
    #[serde(default = "default_startup_celebration_minutes")]
    pub startup_celebration_minutes: u32,

    /// Behaviour of a manual override at its target
    #[serde(default)]
    pub override_policy: OverridePolicy,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            reminder_minutes: default_reminder_minutes(),
            celebration_seconds: default_celebration_seconds(),
            startup_celebration_minutes: default_startup_celebration_minutes(),
            override_policy: OverridePolicy::default(),
        }
    }
}

impl CountdownConfig {
    /// Returns a copy with the given override policy.
    #[must_use]
    pub fn with_override_policy(mut self, policy: OverridePolicy) -> Self {
        self.override_policy = policy;
        self
    }

    /// Returns a copy with the given reminder threshold.
    #[must_use]
    pub fn with_reminder_minutes(mut self, minutes: u32) -> Self {
        self.reminder_minutes = minutes;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.reminder_minutes < 1 || self.reminder_minutes > 180 {
            return Err("reminder_minutes must be between 1 and 180".to_string());
        }
        if !(5..=7).contains(&self.celebration_seconds) {
            return Err("celebration_seconds must be between 5 and 7".to_string());
        }
        if self.startup_celebration_minutes > 60 {
            return Err("startup_celebration_minutes must be at most 60".to_string());
        }
        Ok(())
    }
}
