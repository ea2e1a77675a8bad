use std::{sync::Arc, time::Duration};

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use tokio::io::{AsyncBufReadExt, BufReader};
use weather_core::{
    Capabilities, Config, FileStore, Theme, ViewOptions, VisualCrossingProvider, WeatherCache,
    WeatherLookup, WeatherView, config::DEFAULT_ENDPOINT,
};

use crate::display;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather lookup CLI")]
pub struct Cli {
    /// Visual Crossing API key; overrides the configured one.
    #[arg(long, env = "WEATHER_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and endpoint.
    Configure,

    /// Look up current weather for a city and cache it.
    Show {
        /// City name, e.g. "Paris".
        city: String,
    },

    /// Print the last successfully fetched weather.
    Cached,

    /// Interactive lookup: each input line replaces the city text.
    Watch {
        /// Delay after the last input before looking up.
        #[arg(long)]
        debounce_ms: Option<u64>,

        /// Disable the light/dark toggle.
        #[arg(long)]
        no_theme: bool,

        /// Disable `/refresh`.
        #[arg(long)]
        no_refresh: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli { api_key, command } = self;

        match command {
            Command::Configure => configure(),
            Command::Show { city } => show(&city, api_key.as_deref()).await,
            Command::Cached => cached().await,
            Command::Watch {
                debounce_ms,
                no_theme,
                no_refresh,
            } => {
                let config = Config::load()?;
                let options = ViewOptions {
                    debounce: debounce_ms
                        .map(Duration::from_millis)
                        .unwrap_or_else(|| config.debounce()),
                    capabilities: Capabilities {
                        theming: !no_theme,
                        pull_to_refresh: !no_refresh,
                    },
                };
                watch(&config, api_key.as_deref(), options).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("Visual Crossing API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    let endpoint = Text::new("Weather endpoint:")
        .with_default(config.endpoint())
        .prompt()
        .context("Failed to read endpoint")?;

    // Reject an unusable endpoint before it is written to disk.
    VisualCrossingProvider::with_endpoint(api_key.clone(), &endpoint)?;

    config.set_api_key(api_key);
    config.endpoint = (endpoint != DEFAULT_ENDPOINT).then_some(endpoint);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(city: &str, api_key: Option<&str>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let lookup = WeatherLookup::from_config(&config, api_key)?;

    let record = lookup
        .get_weather(city)
        .await
        .map_err(|err| anyhow!(err.user_message()))?;

    println!("{}", display::record_panel(&record, Theme::default()));
    Ok(())
}

async fn cached() -> anyhow::Result<()> {
    let config = Config::load()?;
    let cache = WeatherCache::new(Arc::new(FileStore::new(config.cache_dir()?)));

    match cache.load().await.context("Failed to read cached weather")? {
        Some(record) => println!("{}", display::record_panel(&record, Theme::default())),
        None => println!("No cached weather yet."),
    }
    Ok(())
}

async fn watch(config: &Config, api_key: Option<&str>, options: ViewOptions) -> anyhow::Result<()> {
    let lookup = Arc::new(WeatherLookup::from_config(config, api_key)?);
    let mut view = WeatherView::new(lookup, options);
    let capabilities = view.capabilities();

    let mut updates = view.subscribe();
    let printer = tokio::spawn(async move {
        let mut last = String::new();
        while updates.changed().await.is_ok() {
            let screen = display::render(&updates.borrow_and_update());
            if !screen.is_empty() && screen != last {
                println!("{screen}\n");
            }
            last = screen;
        }
    });

    println!("Type a city name. Commands: /search /refresh /theme /quit");
    view.mount().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        match line.trim() {
            "/quit" => break,
            "/search" => view.search().await,
            "/refresh" if capabilities.pull_to_refresh => view.refresh().await,
            "/refresh" => println!("Refresh is disabled."),
            "/theme" if capabilities.theming => {
                let theme = view.toggle_theme();
                println!("Theme: {theme:?}");
            }
            "/theme" => println!("Theming is disabled."),
            text => view.on_city_changed(text),
        }
    }

    view.unmount();
    drop(view);
    printer.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_watch_flags() {
        let cli = Cli::try_parse_from(["weather", "watch", "--debounce-ms", "250", "--no-theme"])
            .unwrap();

        match cli.command {
            Command::Watch {
                debounce_ms,
                no_theme,
                no_refresh,
            } => {
                assert_eq!(debounce_ms, Some(250));
                assert!(no_theme);
                assert!(!no_refresh);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_requires_city() {
        assert!(Cli::try_parse_from(["weather", "show"]).is_err());
    }

    #[test]
    fn api_key_flag_is_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["weather", "show", "Paris", "--api-key", "KEY"]).unwrap();

        assert_eq!(cli.api_key.as_deref(), Some("KEY"));
        assert!(matches!(cli.command, Command::Show { city } if city == "Paris"));
    }
}
