//! Core data types for the Iftar countdown.
//!
//! This module defines the data structures used for:
//! - Prayer times of day and the daily prayer-time set
//! - The active countdown target and remaining time
//! - Locations and where they came from
//! - Per-tick countdown snapshots

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::countdown::CountdownError;

// ============================================================================
// TimeOfDay
// ============================================================================

/// A timezone-naive wall-clock time (hour and minute) at which a prayer
/// nominally occurs "today" at the user's location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Creates a time of day, validating hour (0-23) and minute (0-59).
    pub fn new(hour: u8, minute: u8) -> Result<Self, CountdownError> {
        if hour > 23 {
            return Err(CountdownError::invalid_time(
                format!("{hour}:{minute:02}"),
                "hour must be between 0 and 23",
            ));
        }
        if minute > 59 {
            return Err(CountdownError::invalid_time(
                format!("{hour}:{minute:02}"),
                "minute must be between 0 and 59",
            ));
        }
        Ok(Self { hour, minute })
    }

    /// Parses a 24-hour `"HH:MM"` string.
    ///
    /// A trailing annotation separated by whitespace (for example the
    /// `"05:12 (EET)"` form some prayer-time services return) is ignored.
    pub fn parse(input: &str) -> Result<Self, CountdownError> {
        let token = input.split_whitespace().next().unwrap_or("");
        let (hour, minute) = token
            .split_once(':')
            .ok_or_else(|| CountdownError::invalid_time(input, "expected HH:MM"))?;

        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(CountdownError::invalid_time(input, "expected HH:MM"));
        }
        // `u8::from_str` would accept a leading '+'
        if !hour.bytes().chain(minute.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(CountdownError::invalid_time(input, "expected HH:MM"));
        }

        let hour: u8 = hour
            .parse()
            .map_err(|_| CountdownError::invalid_time(input, "hour is not a number"))?;
        let minute: u8 = minute
            .parse()
            .map_err(|_| CountdownError::invalid_time(input, "minute is not a number"))?;

        Self::new(hour, minute).map_err(|_| CountdownError::invalid_time(input, "out of range"))
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Returns the time as a `NaiveTime` with seconds zeroed.
    pub fn to_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }

    /// Formats the time in 12-hour form, e.g. `"6:30 PM"` or `"12:05 AM"`.
    pub fn format_12h(&self) -> String {
        let period = if self.hour >= 12 { "PM" } else { "AM" };
        let display_hour = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", display_hour, self.minute, period)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = CountdownError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = CountdownError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// Converts a 24-hour `"HH:MM"` string to a 12-hour AM/PM display string.
pub fn format_to_am_pm(time24: &str) -> Result<String, CountdownError> {
    TimeOfDay::parse(time24).map(|t| t.format_12h())
}

// ============================================================================
// ActivePrayer
// ============================================================================

/// The prayer the countdown is currently targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivePrayer {
    /// Counting down to sunset (Maghrib)
    Iftar,
    /// Counting down to dawn
    Fajr,
}

impl ActivePrayer {
    /// Returns the string representation of the prayer.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivePrayer::Iftar => "iftar",
            ActivePrayer::Fajr => "fajr",
        }
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            ActivePrayer::Iftar => "Iftar",
            ActivePrayer::Fajr => "Fajr",
        }
    }

    /// Returns the other prayer.
    pub fn other(&self) -> Self {
        match self {
            ActivePrayer::Iftar => ActivePrayer::Fajr,
            ActivePrayer::Fajr => ActivePrayer::Iftar,
        }
    }

    /// Headline shown when this prayer's time arrives.
    pub fn celebration_message(&self) -> &'static str {
        match self {
            ActivePrayer::Iftar => "It's Iftar Time!",
            ActivePrayer::Fajr => "It's Fajr Time!",
        }
    }

    /// Secondary line shown when this prayer's time arrives.
    pub fn celebration_body(&self) -> &'static str {
        match self {
            ActivePrayer::Iftar => "Enjoy your meal and may Allah accept your fast.",
            ActivePrayer::Fajr => "It's time for Suhoor and prayers.",
        }
    }
}

impl fmt::Display for ActivePrayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// TimeLeft
// ============================================================================

/// Remaining time split into whole hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeLeft {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl TimeLeft {
    /// Builds a `TimeLeft` from a duration, flooring to whole seconds.
    ///
    /// Negative durations are treated as zero.
    pub fn from_duration(duration: TimeDelta) -> Self {
        // num_seconds truncates toward zero, which floors a non-negative span
        let total = u32::try_from(duration.num_seconds().max(0)).unwrap_or(u32::MAX);
        Self::from_seconds(total)
    }

    /// Builds a `TimeLeft` from a number of whole seconds.
    pub fn from_seconds(total: u32) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    /// Returns the total number of seconds.
    pub fn total_seconds(&self) -> u32 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }

    /// Returns true when no time remains.
    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

// ============================================================================
// PrayerTimes
// ============================================================================

/// The daily prayer-time set for one location.
///
/// Replaced wholesale whenever the location is resolved again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerTimes {
    /// Calendar date the times were computed for
    pub date: NaiveDate,
    pub fajr: TimeOfDay,
    pub sunrise: TimeOfDay,
    pub dhuhr: TimeOfDay,
    pub asr: TimeOfDay,
    /// Sunset prayer; its time is the Iftar time
    pub maghrib: TimeOfDay,
    pub isha: TimeOfDay,
}

impl PrayerTimes {
    /// Returns the Iftar (Maghrib) time.
    pub fn iftar(&self) -> TimeOfDay {
        self.maghrib
    }

    /// Returns the time of day of the given countdown target.
    pub fn time_for(&self, prayer: ActivePrayer) -> TimeOfDay {
        match prayer {
            ActivePrayer::Iftar => self.maghrib,
            ActivePrayer::Fajr => self.fajr,
        }
    }

    /// Returns all prayers in chronological order with their display names.
    pub fn entries(&self) -> [(&'static str, TimeOfDay); 6] {
        [
            ("Fajr", self.fajr),
            ("Sunrise", self.sunrise),
            ("Dhuhr", self.dhuhr),
            ("Asr", self.asr),
            ("Maghrib", self.maghrib),
            ("Isha", self.isha),
        ]
    }
}

// ============================================================================
// Location
// ============================================================================

/// Where a location came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    /// User-supplied coordinates, reverse geocoded
    Precise,
    /// IP-based geolocation
    Approximate,
    /// City and country entered by the user
    Manual,
}

impl LocationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationSource::Precise => "precise",
            LocationSource::Approximate => "approximate",
            LocationSource::Manual => "manual",
        }
    }
}

/// A resolved location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub source: LocationSource,
}

impl Location {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Returns "City, Country".
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Creates coordinates, rejecting values outside the valid ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(format!("latitude {} is out of range (-90 to 90)", latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(format!("longitude {} is out of range (-180 to 180)", longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Formats a place name in title case, e.g. `"new york"` → `"New York"`.
pub fn format_location_name(name: &str) -> String {
    let formatted = name
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ");

    if formatted.is_empty() {
        "Unknown".to_string()
    } else {
        formatted
    }
}

// ============================================================================
// Countdown snapshot
// ============================================================================

/// Transient celebration banner shown when a prayer time arrives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CelebrationState {
    pub visible: bool,
    pub message: String,
    pub body: String,
    /// When the banner clears itself; replaced by every new celebration
    pub clear_at: Option<NaiveDateTime>,
}

impl CelebrationState {
    /// Returns a visible celebration for the given prayer.
    pub fn for_prayer(prayer: ActivePrayer, clear_at: NaiveDateTime) -> Self {
        Self {
            visible: true,
            message: prayer.celebration_message().to_string(),
            body: prayer.celebration_body().to_string(),
            clear_at: Some(clear_at),
        }
    }
}

/// The result of one countdown tick.
#[derive(Debug, Clone, PartialEq)]
pub struct CountdownSnapshot {
    /// Prayer being counted down to
    pub active: ActivePrayer,
    /// Occurrence being counted down to
    pub target: NaiveDateTime,
    /// Remaining time, floored to whole seconds
    pub remaining: TimeLeft,
    /// Elapsed share of the current cycle (0-100)
    pub progress: f64,
    /// Whether the user has overridden automatic selection
    pub manual_override: bool,
    pub celebration: CelebrationState,
}

// ============================================================================
// Tests
// ============================================================================
