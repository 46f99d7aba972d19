//! Iftar Countdown Library
//!
//! This library provides the core functionality for the Iftar countdown CLI.
//! It includes:
//! - Countdown engine choosing between Iftar and Fajr, with day rollover,
//!   progress, reminders, and celebrations
//! - Location and prayer-time providers with fallback and cancellation
//! - Desktop and in-terminal notifications
//! - Configuration file loading
//! - CLI command parsing and display utilities

pub mod cli;
pub mod config;
pub mod countdown;
pub mod notification;
pub mod providers;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    ActivePrayer, CelebrationState, Coordinates, CountdownSnapshot, Location, LocationSource,
    PrayerTimes, TimeLeft, TimeOfDay,
};

pub use config::{AppConfig, ConfigError, NotificationConfig};

pub use countdown::{
    Clock, CountdownConfig, CountdownEngine, CountdownError, CountdownEvent, EngineCommand,
    ManualClock, OverridePolicy, SystemClock,
};

pub use notification::{
    default_notifier, MockNotificationSink, NotificationError, NotificationSink,
};

pub use providers::{
    CancelHandle, CancellableRequest, LocationQuery, LocationResolver, ProviderConfig,
    ProviderError,
};
