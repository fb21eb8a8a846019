use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select, Text};
use wxlookup_core::{Config, HourFallback, LocationQuery, lookup_from_config};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wxlookup", version, about = "Current weather for your location or any place")]
pub struct Cli {
    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log pipeline progress to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the weather for the current hour.
    Show {
        /// Place name, e.g. "Tokyo" or "New York". Omit to use your IP location.
        place: Vec<String>,

        /// Print the snapshot as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Interactively edit timezone, candidate count and hour fallback policy.
    Configure,

    /// Print the path of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { place, json } => {
                let config = load_config(self.config.as_deref())?;
                let query = LocationQuery::from_input(&place.join(" "));
                show(&config, &query, json).await
            }
            Command::Configure => {
                let path = config_path(self.config)?;
                configure(&path)
            }
            Command::ConfigPath => {
                println!("{}", config_path(self.config)?.display());
                Ok(())
            }
        }
    }
}

async fn show(config: &Config, query: &LocationQuery, json: bool) -> anyhow::Result<()> {
    let lookup = lookup_from_config(config)?;

    let snapshot = match lookup.resolve(query).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!(error = %e, %query, "weather lookup failed");
            return Err(anyhow::Error::new(e).context(format!("Could not get weather for {query}")));
        }
    };

    if json {
        println!("{}", render::render_json(&snapshot)?);
    } else {
        println!("{}", render::render(&snapshot));
    }

    Ok(())
}

fn configure(path: &Path) -> anyhow::Result<()> {
    let mut config = Config::load_from(path)?;

    let timezone = config.timezone.clone();
    config.timezone = Text::new("Forecast timezone (IANA name):")
        .with_default(&timezone)
        .prompt()
        .context("Failed to read timezone")?;

    config.candidate_count = CustomType::<u8>::new("Geocoding candidates to request:")
        .with_default(config.candidate_count)
        .with_error_message("Enter a number between 1 and 255")
        .prompt()
        .context("Failed to read candidate count")?;

    let current = HourFallback::all()
        .iter()
        .position(|p| *p == config.hour_fallback)
        .unwrap_or(0);
    config.hour_fallback = Select::new(
        "When the forecast has no entry for the current hour:",
        HourFallback::all().to_vec(),
    )
    .with_starting_cursor(current)
    .prompt()
    .context("Failed to read hour fallback policy")?;

    config.validate()?;
    config.save_to(path)?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(p) => Config::load_from(p),
        None => Config::load(),
    }
}

fn config_path(path: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match path {
        Some(p) => Ok(p),
        None => Config::config_file_path(),
    }
}
