//! Notification delivery for reminders and prayer arrivals.
//!
//! The countdown core only needs a capability to `deliver(title, body)`;
//! this module provides the implementations behind it:
//!
//! - [`DesktopNotifier`]: platform notifications via `notify-rust`
//! - [`BannerNotifier`]: in-terminal banner fallback
//! - [`FallbackNotifier`]: tries one sink, then another
//! - [`SilentNotifier`]: no-op, for `--no-notify`
//! - [`MockNotificationSink`]: records calls for tests
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ CountdownEngine  │
//! └────────┬─────────┘
//!          │ deliver(title, body)
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ FallbackNotifier │────▶│ DesktopNotifier  │
//! │                  │     ├──────────────────┤
//! │                  │────▶│ BannerNotifier   │
//! └──────────────────┘     └──────────────────┘
//! ```

mod banner;
pub mod content;
mod desktop;
pub mod error;

use std::sync::Arc;

pub use self::banner::BannerNotifier;
pub use self::content::{create_arrival_content, create_reminder_content, NotificationContent};
pub use self::desktop::DesktopNotifier;
pub use self::error::NotificationError;

/// A capability to show a notification to the user.
///
/// Implementations may silently do nothing.
pub trait NotificationSink {
    /// Delivers a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be shown.
    fn deliver(&self, title: &str, body: &str) -> Result<(), NotificationError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str {
        "notifier"
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for Box<T> {
    fn deliver(&self, title: &str, body: &str) -> Result<(), NotificationError> {
        (**self).deliver(title, body)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn deliver(&self, title: &str, body: &str) -> Result<(), NotificationError> {
        (**self).deliver(title, body)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Sends through `primary`, falling back to `fallback` on delivery failure.
pub struct FallbackNotifier<P, F> {
    primary: P,
    fallback: F,
}

impl<P: NotificationSink, F: NotificationSink> FallbackNotifier<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: NotificationSink, F: NotificationSink> NotificationSink for FallbackNotifier<P, F> {
    fn deliver(&self, title: &str, body: &str) -> Result<(), NotificationError> {
        match self.primary.deliver(title, body) {
            Ok(()) => Ok(()),
            Err(e) if e.should_fallback() => {
                tracing::warn!(
                    "{} notification failed, using {}: {}",
                    self.primary.name(),
                    self.fallback.name(),
                    e
                );
                self.fallback.deliver(title, body)
            }
            Err(e) => Err(e),
        }
    }

    fn name(&self) -> &'static str {
        self.primary.name()
    }
}

/// Notification sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl NotificationSink for SilentNotifier {
    fn deliver(&self, title: &str, _body: &str) -> Result<(), NotificationError> {
        tracing::debug!("notification suppressed: {}", title);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "silent"
    }
}

/// Builds the notifier used by the CLI.
///
/// Desktop notifications fall back to the terminal banner; `enabled = false`
/// yields a [`SilentNotifier`].
pub fn default_notifier(enabled: bool, desktop: bool) -> Box<dyn NotificationSink> {
    match (enabled, desktop) {
        (false, _) => Box::new(SilentNotifier),
        (true, true) => Box::new(FallbackNotifier::new(
            DesktopNotifier::new(),
            BannerNotifier::new(),
        )),
        (true, false) => Box::new(BannerNotifier::new()),
    }
}

/// Mock notification sink for testing.
#[derive(Debug, Default)]
pub struct MockNotificationSink {
    delivered: std::sync::Mutex<Vec<NotificationContent>>,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockNotificationSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn delivery_count(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_deliveries(&self) -> Vec<NotificationContent> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.delivered.lock().unwrap().clear();
    }
}

impl NotificationSink for MockNotificationSink {
    fn deliver(&self, title: &str, body: &str) -> Result<(), NotificationError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        self.delivered
            .lock()
            .unwrap()
            .push(NotificationContent::new(title, body));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
