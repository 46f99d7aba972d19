//! Countdown core for the Iftar/Fajr timer.
//!
//! This module contains the state-reconciliation logic:
//! - `resolver`: next occurrence of a prayer time (today or tomorrow)
//! - `selector`: which prayer the countdown targets
//! - `progress`: elapsed share of the current day or night segment
//! - `latch`: one-shot reminder and celebration state
//! - `engine`: the one-second tick loop tying it together
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use iftar_countdown::countdown::{resolve_occurrence, select_active};
//! use iftar_countdown::types::{ActivePrayer, TimeOfDay};
//!
//! let fajr: TimeOfDay = "05:00".parse().unwrap();
//! let iftar: TimeOfDay = "18:30".parse().unwrap();
//! let now = NaiveDate::from_ymd_opt(2025, 3, 10)
//!     .unwrap()
//!     .and_hms_opt(2, 0, 0)
//!     .unwrap();
//!
//! assert_eq!(select_active(now, fajr, iftar), ActivePrayer::Fajr);
//! assert_eq!(resolve_occurrence(fajr, now) - now, chrono::TimeDelta::hours(3));
//! ```

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod latch;
pub mod progress;
pub mod resolver;
pub mod selector;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CountdownConfig, OverridePolicy};
pub use engine::{CountdownEngine, CountdownEvent, EngineCommand};
pub use error::CountdownError;
pub use latch::{CelebrationTimer, ReminderLatch};
pub use progress::{compute_progress, cycle_bounds};
pub use resolver::{occurrence_on, resolve_occurrence};
pub use selector::select_active;
