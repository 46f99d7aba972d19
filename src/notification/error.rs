//! Notification system error types.
//!
//! Notification failures never stop the countdown; callers log them and
//! fall back to the in-terminal banner.

use thiserror::Error;

/// Errors that can occur in the notification system.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Failed to send a notification.
    #[error("failed to send notification: {0}")]
    SendFailed(String),

    /// No notification service is available (e.g. no desktop session).
    #[error("notification service unavailable: {0}")]
    Unavailable(String),

    /// Invalid input provided to the notification system.
    #[error("invalid notification: {0}")]
    InvalidInput(String),
}

impl NotificationError {
    /// Returns true if delivery should be retried through the fallback sink.
    #[must_use]
    pub fn should_fallback(&self) -> bool {
        matches!(self, Self::SendFailed(_) | Self::Unavailable(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::SendFailed(_) => "check that a notification daemon is running",
            Self::Unavailable(_) => "run inside a desktop session or pass --no-notify",
            Self::InvalidInput(_) => "check the notification title and body",
        }
    }
}
