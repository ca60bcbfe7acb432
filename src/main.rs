use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use configuration::Config;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod loader;
mod render;
mod snapshot;

use loader::SeriesSource;

/// The main entry point for the market snapshot report.
#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; it only carries optional SNAPSHOT__* overrides.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;

    let config = configuration::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // The only place the clock is read; everything below takes the date explicitly.
    let now = Local::now().naive_local();
    let reference_date = cli.as_of.unwrap_or(now.date());
    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.report.data_dir.clone());

    tracing::info!(%reference_date, data_dir = %data_dir.display(), "Building market snapshot.");

    let sources = series_sources(&config, &data_dir);
    let show_progress = std::io::stderr().is_terminal();
    let series = loader::load_all(sources, show_progress).await;

    let report = snapshot::build_snapshot(&config, &series, reference_date, now)
        .context("Failed to assemble the snapshot report")?;

    match cli.format {
        OutputFormat::Table => print!("{}", render::render_report(&report)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("Failed to serialize the report")?;
            println!("{json}");
        }
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Point-in-time performance snapshot across asset classes.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Directory with one JSON series file per instrument (overrides report.data_dir).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Reference date for the report (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Log filter, e.g. "debug" or "analytics=debug". Falls back to RUST_LOG, then "info".
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).context("Invalid --log-level filter")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    // Logs go to stderr so that JSON on stdout stays machine-readable.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// One source per configured instrument, in report order.
fn series_sources(config: &Config, data_dir: &std::path::Path) -> Vec<SeriesSource> {
    config
        .asset_classes
        .iter()
        .flat_map(|class| class.ordered())
        .map(|instrument| SeriesSource {
            symbol: instrument.symbol.clone(),
            path: data_dir.join(instrument.file_name()),
        })
        .collect()
}
