//! Iftar Countdown CLI
//!
//! Counts down to the next Iftar (Maghrib) or Fajr time for your location:
//! - `countdown`: live countdown with reminders and celebrations
//! - `times`: today's prayer times
//! - `locate`: the detected location

use anyhow::Result;
use clap::{CommandFactory, Parser};

use iftar_countdown::cli::{session, Cli, Commands, CountdownArgs, Display};
use iftar_countdown::config::AppConfig;
use iftar_countdown::providers::ProviderError;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        match e.downcast_ref::<ProviderError>() {
            Some(provider_error) if !provider_error.is_cancelled() => {
                Display::show_error_with_hint(&format!("{:#}", e), provider_error.suggestion());
            }
            _ => Display::show_error(&format!("{:#}", e)),
        }
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so they never interleave with the countdown line.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    if let Some(Commands::Completions { shell }) = cli.command {
        generate_completions(shell);
        return Ok(());
    }

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Countdown(args)) => session::countdown(&config, &args).await?,
        Some(Commands::Times(args)) => session::times(&config, &args).await?,
        Some(Commands::Locate(args)) => session::locate(&config, &args).await?,
        Some(Commands::Completions { .. }) => {}
        None => session::countdown(&config, &CountdownArgs::default()).await?,
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
