//! Batch geocoding of a library address list.
//!
//! Reads `Id`/`Address` rows, looks each address up on Nominatim at most once
//! per second, and writes an id → {lat, lng} JSON file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use batch_geocoder::{run_batch, Config, FixedDelay, NominatimClient};

#[derive(Parser, Debug)]
#[command(name = "geocode")]
#[command(about = "Geocode a CSV of addresses into a JSON coordinate file")]
struct Args {
    /// TOML file with runner settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input CSV with Id and Address columns
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output JSON file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Nominatim search endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// User-Agent sent with every request
    #[arg(long)]
    user_agent: Option<String>,

    /// Pause between consecutive requests, in milliseconds (at least 1000)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Per-request timeout, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Count failed lookups as misses instead of aborting
    #[arg(long)]
    keep_going: bool,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.delay_ms = delay_ms;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        config.keep_going |= self.keep_going;

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for progress lines
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Args::parse().into_config()?;

    info!("Batch Geocoder");
    info!("Endpoint: {}", config.endpoint);
    info!(
        "Input: {}, output: {}",
        config.input.display(),
        config.output.display()
    );

    let client = NominatimClient::new(&config.endpoint, &config.user_agent, config.timeout())
        .context("Failed to create Nominatim client")?;
    let mut gate = FixedDelay::new(config.delay());

    let mut stdout = std::io::stdout().lock();
    let summary = run_batch(&config, &client, &mut gate, &mut stdout)
        .await
        .context("Geocoding run failed")?;

    info!(
        "Done: {} of {} records geocoded ({} failed)",
        summary.written, summary.total, summary.failed
    );

    Ok(())
}
