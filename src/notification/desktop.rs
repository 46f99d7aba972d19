//! Desktop notifications through the platform notification service.

use notify_rust::{Notification, Timeout};

use super::error::NotificationError;
use super::NotificationSink;

/// Application name shown by the notification service.
const APP_NAME: &str = "iftar";

/// Icon name looked up in the desktop icon theme.
const ICON_NAME: &str = "appointment-soon";

/// How long a notification stays on screen in milliseconds.
const DISPLAY_TIMEOUT_MS: u32 = 10_000;

/// Sends notifications with `notify-rust`.
#[derive(Debug, Clone, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for DesktopNotifier {
    fn deliver(&self, title: &str, body: &str) -> Result<(), NotificationError> {
        super::content::validate_title(title).map_err(NotificationError::InvalidInput)?;

        Notification::new()
            .summary(title)
            .body(body)
            .appname(APP_NAME)
            .icon(ICON_NAME)
            .timeout(Timeout::Milliseconds(DISPLAY_TIMEOUT_MS))
            .show()
            .map(|_| ())
            .map_err(|e| NotificationError::SendFailed(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "desktop"
    }
}
