//! Notification content construction.

use crate::types::ActivePrayer;

/// Maximum length for a notification title.
const MAX_TITLE_LENGTH: usize = 100;

/// Title and body of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

impl NotificationContent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Content for the reminder sent shortly before a prayer.
pub fn create_reminder_content(prayer: ActivePrayer, minutes: u32) -> NotificationContent {
    let unit = if minutes == 1 { "minute" } else { "minutes" };
    NotificationContent::new(
        format!("{} in {} {}", prayer.label(), minutes, unit),
        match prayer {
            ActivePrayer::Iftar => "Get ready to break your fast.",
            ActivePrayer::Fajr => "Finish your Suhoor before Fajr.",
        },
    )
}

/// Content for the moment a prayer time arrives.
pub fn create_arrival_content(prayer: ActivePrayer) -> NotificationContent {
    NotificationContent::new(prayer.celebration_message(), prayer.celebration_body())
}

/// Validates a notification title.
///
/// - Must not be empty
/// - Must not exceed 100 characters
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("notification title must not be empty".to_string());
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!(
            "notification title must be at most {} characters",
            MAX_TITLE_LENGTH
        ));
    }
    Ok(())
}
