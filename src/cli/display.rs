//! Display utilities for the Iftar countdown CLI.
//!
//! This module provides formatted output for:
//! - The live countdown line
//! - Prayer-time tables and the resolved location
//! - Celebration banners, reminders, and errors

use std::io::Write;

use crate::countdown::CountdownEvent;
use crate::types::{CountdownSnapshot, Location, PrayerTimes};

/// Width of the progress bar in characters.
const BAR_WIDTH: usize = 24;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Redraws the live countdown line in place.
    pub fn show_snapshot(snapshot: &CountdownSnapshot) {
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "\r{}\x1b[K", Self::format_snapshot(snapshot));
        let _ = stdout.flush();
    }

    /// Prints a snapshot on its own line, for `--once`.
    pub fn show_snapshot_line(snapshot: &CountdownSnapshot) {
        println!("{}", Self::format_snapshot(snapshot));
    }

    /// Shows the resolved location.
    pub fn show_location(location: &Location) {
        println!("Location: {}", location.display_name());
        println!(
            "  {} ({} detection)",
            location.coordinates(),
            location.source.as_str()
        );
    }

    /// Shows the prayer-time table.
    pub fn show_times(times: &PrayerTimes) {
        println!("Prayer times for {}", times.date.format("%A, %d %B %Y"));
        println!("─────────────────────────────");
        for (name, time) in times.entries() {
            let marker = if name == "Maghrib" { "  <- Iftar" } else { "" };
            println!("{:<8} {:>8}{}", name, time.format_12h(), marker);
        }
    }

    /// Shows the key bindings of the live countdown.
    pub fn show_controls() {
        println!("Press t + Enter to switch prayer, a + Enter for automatic, q + Enter to quit");
    }

    /// Prints the output for an engine event that is not a tick.
    pub fn show_event(event: &CountdownEvent) {
        if let Some(line) = Self::format_event(event) {
            println!("\r\x1b[K{}", line);
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Shows an error message with a hint on the next line.
    pub fn show_error_with_hint(message: &str, hint: &str) {
        eprintln!("Error: {}", message);
        eprintln!("  hint: {}", hint);
    }

    /// Formats the live countdown line.
    fn format_snapshot(snapshot: &CountdownSnapshot) -> String {
        let mut line = format!(
            "{} at {} | {} left | {} {:5.1}%",
            snapshot.active.label(),
            snapshot.target.format("%-I:%M %p"),
            snapshot.remaining,
            Self::progress_bar(snapshot.progress, BAR_WIDTH),
            snapshot.progress
        );
        if snapshot.manual_override {
            line.push_str(" (manual)");
        }
        if snapshot.celebration.visible {
            line.push_str(&format!(" | {}", snapshot.celebration.message));
        }
        line
    }

    fn format_event(event: &CountdownEvent) -> Option<String> {
        match event {
            CountdownEvent::Reminder { prayer, remaining } => Some(format!(
                "Reminder: {} in {}",
                prayer.label(),
                remaining
            )),
            CountdownEvent::CelebrationStarted { prayer, message } => Some(format!(
                "*** {} ***\n    {}",
                message,
                prayer.celebration_body()
            )),
            CountdownEvent::Transition { to, .. } => {
                Some(format!("Now counting down to {}", to.label()))
            }
            CountdownEvent::TargetReached { prayer } => Some(format!(
                "{} time has arrived; still counting to the next {}",
                prayer.label(),
                prayer.label()
            )),
            CountdownEvent::Toggled { active } => {
                Some(format!("Switched to {} (manual)", active.label()))
            }
            CountdownEvent::OverrideReleased => Some("Automatic selection resumed".to_string()),
            CountdownEvent::PrayerTimesUpdated => Some("Prayer times updated".to_string()),
            CountdownEvent::Tick(_) | CountdownEvent::CelebrationCleared | CountdownEvent::Stopped => {
                None
            }
        }
    }

    /// Renders `progress` (0-100) as a bar of `width` cells.
    fn progress_bar(progress: f64, width: usize) -> String {
        let ratio = (progress / 100.0).clamp(0.0, 1.0);
        let filled = ((ratio * width as f64).round() as usize).min(width);
        format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
    }
}

// ============================================================================
// Tests
// ============================================================================
