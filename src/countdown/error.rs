//! Countdown error types.
//!
//! Validation errors are surfaced to the caller rather than coerced.
//! `NotReady` is a precondition rather than a failure: the tick loop
//! simply does not run until prayer times are available.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors that can occur in the countdown core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CountdownError {
    /// A time-of-day string or value could not be understood.
    #[error("invalid time of day {input:?}: {reason}")]
    InvalidTimeOfDay {
        /// The rejected input
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// Cycle bounds do not describe a positive span.
    #[error("degenerate cycle: end {end} is not after start {start}")]
    DegenerateCycle {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// No prayer times have been provided yet.
    #[error("prayer times have not been loaded yet")]
    NotReady,
}

impl CountdownError {
    pub(crate) fn invalid_time(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTimeOfDay {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this error was caused by malformed input.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidTimeOfDay { .. } | Self::DegenerateCycle { .. }
        )
    }

    /// Returns true if the countdown is waiting for prayer times.
    #[must_use]
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady)
    }
}
