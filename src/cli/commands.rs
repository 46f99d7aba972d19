//! Command definitions for the Iftar countdown CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::countdown::OverridePolicy;
use crate::providers::LocationQuery;
use crate::types::{ActivePrayer, Coordinates};

// ============================================================================
// CLI Structure
// ============================================================================

/// Iftar Countdown - time left until Iftar and Fajr for your location
#[derive(Parser, Debug)]
#[command(
    name = "iftar",
    version,
    about = "Live countdown to Iftar and Fajr for your location",
    long_about = "Counts down to the next Iftar (Maghrib) or Fajr time.\n\
                  Prayer times come from the Aladhan API; your location is detected\n\
                  from your IP address unless you pass coordinates or a city.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `countdown`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a JSON configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the live countdown
    Countdown(CountdownArgs),

    /// Show today's prayer times
    Times(LocationArgs),

    /// Show the detected location
    Locate(LocationArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Location Arguments
// ============================================================================

/// How to find the user's location
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct LocationArgs {
    /// City name, e.g. "Cairo" (requires --country)
    #[arg(long, requires = "country", conflicts_with_all = ["latitude", "longitude"])]
    pub city: Option<String>,

    /// Country name, e.g. "Egypt" (requires --city)
    #[arg(long, requires = "city")]
    pub country: Option<String>,

    /// Latitude in decimal degrees (requires --longitude)
    #[arg(
        long,
        requires = "longitude",
        allow_negative_numbers = true,
        value_parser = parse_latitude
    )]
    pub latitude: Option<f64>,

    /// Longitude in decimal degrees (requires --latitude)
    #[arg(
        long,
        requires = "latitude",
        allow_negative_numbers = true,
        value_parser = parse_longitude
    )]
    pub longitude: Option<f64>,

    /// Prayer-time calculation method (default 5, Egyptian General Authority of Survey)
    #[arg(short, long, value_parser = parse_method)]
    pub method: Option<u8>,
}

impl LocationArgs {
    /// Returns the location query described by these arguments.
    pub fn query(&self) -> LocationQuery {
        match (&self.city, &self.country, self.latitude, self.longitude) {
            (Some(city), Some(country), _, _) => LocationQuery::Manual {
                city: city.clone(),
                country: country.clone(),
            },
            (_, _, Some(latitude), Some(longitude)) => LocationQuery::Precise(Coordinates {
                latitude,
                longitude,
            }),
            _ => LocationQuery::Automatic,
        }
    }
}

// ============================================================================
// Countdown Arguments
// ============================================================================

/// Arguments for the countdown command
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct CountdownArgs {
    #[command(flatten)]
    pub location: LocationArgs,

    /// Start counting down to this prayer, overriding automatic selection
    #[arg(short, long, value_enum)]
    pub prayer: Option<PrayerArg>,

    /// Print a single snapshot and exit
    #[arg(long)]
    pub once: bool,

    /// Disable notifications
    #[arg(long)]
    pub no_notify: bool,

    /// What happens when a manually selected prayer arrives
    #[arg(long, value_enum)]
    pub override_policy: Option<OverridePolicyArg>,

    /// Minutes before a prayer at which to remind (1-180)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=180)
    )]
    pub reminder: Option<u32>,
}

/// Prayer selectable on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrayerArg {
    Iftar,
    Fajr,
}

impl From<PrayerArg> for ActivePrayer {
    fn from(arg: PrayerArg) -> Self {
        match arg {
            PrayerArg::Iftar => ActivePrayer::Iftar,
            PrayerArg::Fajr => ActivePrayer::Fajr,
        }
    }
}

/// Override policy selectable on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverridePolicyArg {
    /// Keep the manual choice until toggled back
    Sticky,
    /// Return to automatic selection once the prayer arrives
    ReleaseOnTarget,
}

impl From<OverridePolicyArg> for OverridePolicy {
    fn from(arg: OverridePolicyArg) -> Self {
        match arg {
            OverridePolicyArg::Sticky => OverridePolicy::Sticky,
            OverridePolicyArg::ReleaseOnTarget => OverridePolicy::ReleaseOnTarget,
        }
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

fn parse_latitude(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("{:?} is not a number", s))?;
    Coordinates::new(value, 0.0).map(|c| c.latitude)
}

fn parse_longitude(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("{:?} is not a number", s))?;
    Coordinates::new(0.0, value).map(|c| c.longitude)
}

/// Validates the calculation method against the methods the service knows.
fn parse_method(s: &str) -> Result<u8, String> {
    let method: u8 = s.parse().map_err(|_| format!("{:?} is not a method number", s))?;
    if crate::providers::config::CALCULATION_METHODS.contains(&method) {
        Ok(method)
    } else {
        Err(format!(
            "unknown calculation method {} (valid: 1-5, 7-15)",
            method
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Cli Tests
    // ------------------------------------------------------------------------

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["iftar"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
            assert!(cli.config.is_none());
        }

        #[test]
        fn test_parse_verbose_flag() {
            let cli = Cli::parse_from(["iftar", "-v", "times"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_config_after_subcommand() {
            let cli = Cli::parse_from(["iftar", "locate", "--config", "/tmp/iftar.json"]);
            assert_eq!(cli.config, Some(PathBuf::from("/tmp/iftar.json")));
            assert!(matches!(cli.command, Some(Commands::Locate(_))));
        }

        #[test]
        fn test_parse_completions() {
            let cli = Cli::parse_from(["iftar", "completions", "zsh"]);
            match cli.command {
                Some(Commands::Completions { shell }) => {
                    assert_eq!(shell, clap_complete::Shell::Zsh);
                }
                _ => panic!("Expected Completions command"),
            }
        }

        #[test]
        fn test_unknown_subcommand_is_error() {
            assert!(Cli::try_parse_from(["iftar", "suhoor"]).is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Location Argument Tests
    // ------------------------------------------------------------------------

    mod location_args_tests {
        use super::*;

        fn times_args(args: &[&str]) -> Result<LocationArgs, clap::Error> {
            let mut argv = vec!["iftar", "times"];
            argv.extend_from_slice(args);
            match Cli::try_parse_from(argv)?.command {
                Some(Commands::Times(args)) => Ok(args),
                _ => panic!("Expected Times command"),
            }
        }

        #[test]
        fn test_default_is_automatic() {
            let args = times_args(&[]).unwrap();
            assert_eq!(args.query(), LocationQuery::Automatic);
            assert!(args.method.is_none());
        }

        #[test]
        fn test_city_and_country() {
            let args = times_args(&["--city", "Cairo", "--country", "Egypt"]).unwrap();
            assert_eq!(
                args.query(),
                LocationQuery::Manual {
                    city: "Cairo".to_string(),
                    country: "Egypt".to_string(),
                }
            );
        }

        #[test]
        fn test_city_requires_country() {
            assert!(times_args(&["--city", "Cairo"]).is_err());
        }

        #[test]
        fn test_negative_coordinates() {
            let args = times_args(&["--latitude", "-33.87", "--longitude", "151.21"]).unwrap();
            assert_eq!(
                args.query(),
                LocationQuery::Precise(Coordinates {
                    latitude: -33.87,
                    longitude: 151.21,
                })
            );
        }

        #[test]
        fn test_latitude_out_of_range() {
            assert!(times_args(&["--latitude", "91", "--longitude", "0"]).is_err());
        }

        #[test]
        fn test_city_conflicts_with_coordinates() {
            assert!(times_args(&[
                "--city", "Cairo", "--country", "Egypt", "--latitude", "30", "--longitude", "31"
            ])
            .is_err());
        }

        #[test]
        fn test_method() {
            assert_eq!(times_args(&["--method", "3"]).unwrap().method, Some(3));
            assert!(times_args(&["--method", "6"]).is_err());
            assert!(times_args(&["--method", "x"]).is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Countdown Argument Tests
    // ------------------------------------------------------------------------

    mod countdown_args_tests {
        use super::*;

        fn countdown_args(args: &[&str]) -> Result<CountdownArgs, clap::Error> {
            let mut argv = vec!["iftar", "countdown"];
            argv.extend_from_slice(args);
            match Cli::try_parse_from(argv)?.command {
                Some(Commands::Countdown(args)) => Ok(args),
                _ => panic!("Expected Countdown command"),
            }
        }

        #[test]
        fn test_defaults() {
            let args = countdown_args(&[]).unwrap();
            assert_eq!(args, CountdownArgs::default());
        }

        #[test]
        fn test_prayer_override() {
            let args = countdown_args(&["--prayer", "fajr"]).unwrap();
            assert_eq!(args.prayer.map(ActivePrayer::from), Some(ActivePrayer::Fajr));
        }

        #[test]
        fn test_override_policy() {
            let args = countdown_args(&["--override-policy", "release-on-target"]).unwrap();
            assert_eq!(
                args.override_policy.map(OverridePolicy::from),
                Some(OverridePolicy::ReleaseOnTarget)
            );
        }

        #[test]
        fn test_flags_and_location() {
            let args = countdown_args(&[
                "--once", "--no-notify", "--reminder", "30", "--city", "Doha", "--country", "Qatar",
            ])
            .unwrap();
            assert!(args.once);
            assert!(args.no_notify);
            assert_eq!(args.reminder, Some(30));
            assert!(matches!(args.location.query(), LocationQuery::Manual { .. }));
        }

        #[test]
        fn test_reminder_range() {
            assert!(countdown_args(&["--reminder", "0"]).is_err());
            assert!(countdown_args(&["--reminder", "181"]).is_err());
        }
    }
}
