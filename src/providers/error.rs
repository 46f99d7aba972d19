//! Provider error types.
//!
//! Covers failures of the location and prayer-time services. The countdown
//! itself never sees these; the CLI retries, falls back, or asks the user to
//! enter a location manually.

use thiserror::Error;

/// Errors that can occur while talking to external services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The request could not be sent or timed out.
    #[error("request to {service} failed: {message}")]
    Http { service: String, message: String },

    /// The service answered with a non-success status.
    #[error("{service} returned HTTP {status}")]
    Status { service: String, status: u16 },

    /// The response body could not be decoded.
    #[error("unexpected response from {service}: {message}")]
    Decode { service: String, message: String },

    /// The service answered but did not know the location.
    #[error("location not found: {0}")]
    NotFound(String),

    /// Input or response data is out of range.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The request was cancelled before it finished.
    #[error("request cancelled")]
    Cancelled,

    /// Every location source failed.
    #[error("could not determine your location ({0})")]
    AllSourcesFailed(String),
}

impl ProviderError {
    pub fn http(service: &str, message: impl Into<String>) -> Self {
        Self::Http {
            service: service.to_string(),
            message: message.into(),
        }
    }

    pub fn decode(service: &str, message: impl Into<String>) -> Self {
        Self::Decode {
            service: service.to_string(),
            message: message.into(),
        }
    }

    /// Returns true if the same request may succeed when repeated.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns true if the request was cancelled by the caller.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Http { .. } | Self::Status { .. } => {
                "check your internet connection and try again"
            }
            Self::Decode { .. } => "the service may have changed; try again later",
            Self::NotFound(_) => "check the spelling of the city and country",
            Self::InvalidData(_) => "check the values you entered",
            Self::Cancelled => "the request was cancelled",
            Self::AllSourcesFailed(_) => {
                "enter your location manually with --city and --country"
            }
        }
    }
}

/// Marker returned when a cancellable request is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("request cancelled")]
pub struct Cancelled;

impl From<Cancelled> for ProviderError {
    fn from(_: Cancelled) -> Self {
        ProviderError::Cancelled
    }
}
