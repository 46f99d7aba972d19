//! CLI module for the Iftar countdown.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic
//! - `session`: Location lookup and the live countdown

pub mod commands;
pub mod display;
pub mod session;

pub use commands::{Cli, Commands, CountdownArgs, LocationArgs, OverridePolicyArg, PrayerArg};
pub use display::Display;
