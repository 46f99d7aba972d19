//! Command execution for the Iftar countdown CLI.
//!
//! Resolves the location, fetches prayer times, and drives the live
//! countdown. Keyboard input and Ctrl-C become [`EngineCommand`]s; engine
//! events are rendered as they arrive.

use std::future::Future;
use std::io::BufRead;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use tokio::sync::mpsc;

use super::commands::{CountdownArgs, LocationArgs};
use super::display::Display;
use crate::config::AppConfig;
use crate::countdown::{Clock, CountdownEngine, CountdownEvent, EngineCommand, SystemClock};
use crate::notification::default_notifier;
use crate::providers::{
    http_providers, lookup, CancellableRequest, PrayerTimeProvider, ProviderConfig, ProviderError,
};
use crate::types::Coordinates;

/// Minutes to wait before retrying a failed prayer-time refresh.
const REFRESH_RETRY_MINUTES: i64 = 5;

/// Shows the detected location.
pub async fn locate(config: &AppConfig, args: &LocationArgs) -> Result<()> {
    let (resolver, _) = http_providers(&provider_config(config, args))?;
    let location = with_interrupt(resolver.resolve(&args.query())).await?;
    Display::show_location(&location);
    Ok(())
}

/// Shows today's prayer times for the detected location.
pub async fn times(config: &AppConfig, args: &LocationArgs) -> Result<()> {
    let (resolver, prayer_times) = http_providers(&provider_config(config, args))?;
    let today = SystemClock.now().date();
    let (location, times) =
        with_interrupt(lookup(&resolver, &prayer_times, &args.query(), today)).await?;

    Display::show_location(&location);
    println!();
    Display::show_times(&times);
    Ok(())
}

/// Runs the countdown until the user quits.
pub async fn countdown(config: &AppConfig, args: &CountdownArgs) -> Result<()> {
    let mut countdown_config = config.countdown.clone();
    if let Some(policy) = args.override_policy {
        countdown_config = countdown_config.with_override_policy(policy.into());
    }
    if let Some(minutes) = args.reminder {
        countdown_config = countdown_config.with_reminder_minutes(minutes);
    }
    countdown_config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid countdown settings")?;

    let clock = SystemClock;
    let (resolver, prayer_times) = http_providers(&provider_config(config, &args.location))?;
    let (location, times) = with_interrupt(lookup(
        &resolver,
        &prayer_times,
        &args.location.query(),
        clock.now().date(),
    ))
    .await?;
    Display::show_location(&location);

    let notifier = default_notifier(
        config.notifications.enabled && !args.no_notify,
        config.notifications.desktop,
    );
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let mut engine = CountdownEngine::new(countdown_config, notifier, event_tx);
    engine.set_prayer_times(times);
    if let Some(prayer) = args.prayer {
        engine.force(prayer.into());
    }

    if args.once {
        let snapshot = engine.tick_at(clock.now())?;
        Display::show_snapshot_line(&snapshot);
        return Ok(());
    }

    Display::show_controls();
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    spawn_keyboard_reader(command_tx.clone());
    spawn_interrupt_handler(command_tx.clone());

    let refresher = Refresher::new(&prayer_times, location.coordinates(), clock.now().date());
    let (result, ()) = tokio::join!(
        engine.run(&clock, command_rx),
        render(event_rx, refresher, &clock, command_tx),
    );
    println!();

    result.context("countdown failed")
}

/// Applies command-line overrides to the provider configuration.
fn provider_config(config: &AppConfig, args: &LocationArgs) -> ProviderConfig {
    let mut providers = config.providers.clone();
    if let Some(method) = args.method {
        providers.method = method;
    }
    providers
}

/// Runs `future`, cancelling it if the user presses Ctrl-C first.
async fn with_interrupt<F, T>(future: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    let (request, handle) = CancellableRequest::new(future);
    let run = request.run();
    tokio::pin!(run);

    let interrupted = async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Interrupted, cancelling lookup");
                handle.cancel();
            }
            Err(e) => {
                tracing::warn!("Cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        biased;

        result = &mut run => result?,
        () = interrupted => run.await?,
    }
}

/// Reads commands from stdin on a dedicated thread.
///
/// A plain thread is used so a pending read never delays process exit.
fn spawn_keyboard_reader(commands: mpsc::UnboundedSender<EngineCommand>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let Some(command) = parse_key_command(&line) else {
                continue;
            };
            let quit = command == EngineCommand::Shutdown;
            if commands.send(command).is_err() || quit {
                break;
            }
        }
        tracing::debug!("Keyboard reader stopped");
    });
}

fn spawn_interrupt_handler(commands: mpsc::UnboundedSender<EngineCommand>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = commands.send(EngineCommand::Shutdown);
        }
    });
}

/// Maps a line of keyboard input to an engine command.
fn parse_key_command(line: &str) -> Option<EngineCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "t" | "toggle" => Some(EngineCommand::Toggle),
        "a" | "auto" => Some(EngineCommand::ResumeAutomatic),
        "q" | "quit" | "exit" => Some(EngineCommand::Shutdown),
        _ => None,
    }
}

/// Renders engine events until the engine stops.
///
/// A due prayer-time refresh runs alongside rendering and is cancelled if
/// the engine stops first.
async fn render<P: PrayerTimeProvider, C: Clock>(
    mut events: mpsc::UnboundedReceiver<CountdownEvent>,
    mut refresher: Refresher<'_, P>,
    clock: &C,
    commands: mpsc::UnboundedSender<EngineCommand>,
) {
    while show_event(events.recv().await) {
        let now = clock.now();
        if !refresher.is_due(now) {
            continue;
        }

        let (request, handle) = CancellableRequest::new(refresher.refresh_if_due(now, &commands));
        let refresh = request.run();
        tokio::pin!(refresh);

        loop {
            tokio::select! {
                _ = &mut refresh => break,
                event = events.recv() => {
                    if !show_event(event) {
                        tracing::debug!("Countdown stopped, cancelling prayer-time refresh");
                        handle.cancel();
                        return;
                    }
                }
            }
        }
    }
}

/// Shows one engine event. Returns false once the engine has stopped.
fn show_event(event: Option<CountdownEvent>) -> bool {
    match event {
        Some(CountdownEvent::Tick(snapshot)) => Display::show_snapshot(&snapshot),
        Some(CountdownEvent::Stopped) | None => return false,
        Some(other) => Display::show_event(&other),
    }
    true
}

/// Fetches the new day's prayer times once the local date changes.
struct Refresher<'a, P> {
    provider: &'a P,
    coordinates: Coordinates,
    fetched_for: NaiveDate,
    retry_at: Option<NaiveDateTime>,
}

impl<'a, P: PrayerTimeProvider> Refresher<'a, P> {
    fn new(provider: &'a P, coordinates: Coordinates, fetched_for: NaiveDate) -> Self {
        Self {
            provider,
            coordinates,
            fetched_for,
            retry_at: None,
        }
    }

    fn is_due(&self, now: NaiveDateTime) -> bool {
        now.date() != self.fetched_for && self.retry_at.map_or(true, |at| now >= at)
    }

    async fn refresh_if_due(
        &mut self,
        now: NaiveDateTime,
        commands: &mpsc::UnboundedSender<EngineCommand>,
    ) {
        if !self.is_due(now) {
            return;
        }

        let today = now.date();
        match self.provider.prayer_times(self.coordinates, today).await {
            Ok(times) => {
                tracing::info!("Prayer times refreshed for {}", today);
                self.fetched_for = today;
                self.retry_at = None;
                let _ = commands.send(EngineCommand::SetPrayerTimes(times));
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to refresh prayer times, retrying in {} minutes: {}",
                    REFRESH_RETRY_MINUTES,
                    e
                );
                self.retry_at = Some(now + TimeDelta::minutes(REFRESH_RETRY_MINUTES));
            }
        }
    }
}
