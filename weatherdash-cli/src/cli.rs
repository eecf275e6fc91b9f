use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use std::time::Duration;

use weatherdash_core::{
    Config, FetchOutcome, Query, RetryPolicy, Units, WeatherService, fetch_with_retry,
};

use crate::{render, state::LastSearch};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Terminal weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the API key, units, language and default city.
    Configure,

    /// Show current weather for a city or a coordinate pair.
    Show {
        /// City name; defaults to the last search, then the configured default city.
        #[arg(conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,

        /// Latitude in degrees.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude in degrees.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Retry transient failures using the configured backoff.
        #[arg(long)]
        retry: bool,

        /// Print the normalized record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Periodically refresh the weather for a city.
    Watch {
        city: String,

        /// Seconds between lookups.
        #[arg(long, default_value_t = 60)]
        interval: u64,

        /// Stop after this many lookups.
        #[arg(long)]
        count: Option<u32>,
    },

    /// Interactive prompt; lookups share one in-memory cache.
    Dashboard,

    /// Print the path of the configuration file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, lat, lon, retry, json } => {
                let cfg = Config::load()?;
                let store = last_search();
                let query = match (lat, lon) {
                    (Some(lat), Some(lon)) => Query::coordinates(lat, lon),
                    _ => Query::place(
                        city.unwrap_or_else(|| remembered_city(store.as_ref(), &cfg)),
                    ),
                };
                show(&cfg, store.as_ref(), query, retry, json).await
            }
            Command::Watch { city, interval, count } => {
                watch(&city, Duration::from_secs(interval.max(1)), count).await
            }
            Command::Dashboard => dashboard().await,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn last_search() -> Option<LastSearch> {
    LastSearch::from_platform_dirs()
        .inspect_err(|err| tracing::warn!(error = %err, "no data directory for last search"))
        .ok()
}

/// The last saved search, else the configured default city.
fn remembered_city(store: Option<&LastSearch>, cfg: &Config) -> String {
    store
        .and_then(LastSearch::load)
        .unwrap_or_else(|| cfg.app.default_city.clone())
}

/// Only successful place lookups are remembered.
fn remember(store: Option<&LastSearch>, query: &Query, outcome: &FetchOutcome) {
    if let (Some(store), Query::Place(name), Ok(_)) = (store, query, outcome) {
        store.save(name);
    }
}

fn configure() -> Result<()> {
    let mut cfg = Config::load()?;

    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;
    if !key.trim().is_empty() {
        cfg.set_api_key(key);
    }

    let current = Units::all().iter().position(|u| *u == cfg.api.units).unwrap_or(0);
    cfg.api.units = Select::new("Units:", Units::all().to_vec())
        .with_starting_cursor(current)
        .prompt()?;

    let language = Text::new("Language code:").with_default(&cfg.api.language).prompt()?;
    cfg.api.language = language.trim().to_string();

    let city = Text::new("Default city:").with_default(&cfg.app.default_city).prompt()?;
    if let Err(reason) = Query::place(&city).validate() {
        anyhow::bail!("Invalid default city: {reason}");
    }
    cfg.app.default_city = city.trim().to_string();

    cfg.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(
    cfg: &Config,
    store: Option<&LastSearch>,
    query: Query,
    retry: bool,
    json: bool,
) -> Result<()> {
    let service = WeatherService::from_config(cfg)?;

    let policy = if retry { cfg.retry_policy() } else { RetryPolicy::none() };
    let outcome = fetch_with_retry(&service, &query, policy).await;
    remember(store, &query, &outcome);
    let record = outcome?;

    if json {
        let text = serde_json::to_string_pretty(&record)
            .context("Failed to serialize weather record")?;
        println!("{text}");
    } else {
        print!("{}", render::render_record(&record, cfg));
    }

    Ok(())
}

async fn watch(city: &str, every: Duration, count: Option<u32>) -> Result<()> {
    let cfg = Config::load()?;
    let service = WeatherService::from_config(&cfg)?;
    let query = Query::place(city);

    let mut ticker = tokio::time::interval(every);
    let mut done = 0;

    while count.is_none_or(|limit| done < limit) {
        ticker.tick().await;

        let cached = query.cache_key().is_some_and(|key| service.cache().get(&key).is_some());
        let stamp = chrono::Local::now().format("%H:%M:%S");
        match service.fetch_weather(&query).await {
            Ok(record) => {
                let source = if cached { "cache" } else { "network" };
                println!("[{stamp}] ({source})");
                print!("{}", render::render_record(&record, &cfg));
            }
            Err(err) => eprintln!("[{stamp}] {err}"),
        }

        done += 1;
    }

    Ok(())
}

async fn dashboard() -> Result<()> {
    let cfg = Config::load()?;
    let service = WeatherService::from_config(&cfg)?;
    let store = last_search();
    let mut last_city = remembered_city(store.as_ref(), &cfg);

    println!("Commands: :refresh, :clear, :quit. Press Esc to exit.");
    report(&cfg, service.fetch_weather(&Query::place(&last_city)).await);

    loop {
        let input = match Text::new("City:").with_placeholder(&last_city).prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        match input.trim() {
            ":quit" | ":q" => break,
            ":clear" => {
                service.clear_cache();
                println!("Cache cleared");
            }
            ":refresh" => report(&cfg, service.refresh(&last_city).await),
            city => {
                let query = Query::place(city);
                let outcome = service.fetch_weather(&query).await;
                remember(store.as_ref(), &query, &outcome);
                if outcome.is_ok() {
                    last_city = city.to_string();
                }
                report(&cfg, outcome);
            }
        }
    }

    Ok(())
}

fn report(cfg: &Config, outcome: FetchOutcome) {
    match outcome {
        Ok(record) => print!("{}", render::render_record(&record, cfg)),
        Err(err) => eprintln!("{err}"),
    }
}
