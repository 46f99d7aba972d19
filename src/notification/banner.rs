//! In-terminal banner used when desktop notifications are unavailable.

use std::io::Write;
use std::sync::Mutex;

use super::error::NotificationError;
use super::NotificationSink;

/// Writes notifications as a banner line to a writer (stderr by default).
pub struct BannerNotifier {
    out: Mutex<Box<dyn Write + Send>>,
}

impl BannerNotifier {
    /// Creates a banner notifier writing to stderr.
    #[must_use]
    pub fn new() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    /// Creates a banner notifier writing to the given writer.
    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl Default for BannerNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for BannerNotifier {
    fn deliver(&self, title: &str, body: &str) -> Result<(), NotificationError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| NotificationError::SendFailed("banner writer poisoned".to_string()))?;

        // Leading newline keeps the banner off the live countdown line
        writeln!(out, "\n*** {} ***\n    {}", title, body)
            .and_then(|()| out.flush())
            .map_err(|e| NotificationError::SendFailed(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "banner"
    }
}
