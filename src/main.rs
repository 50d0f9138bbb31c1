mod input;
mod models;
mod report;
mod scrapers;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use scrapers::{scrape_all, HttpFetcher, ScrapeConfig};
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Parser)]
#[command(name = "airbnb-scout")]
#[command(about = "Scrape property details from Airbnb listing pages")]
#[command(version)]
struct Cli {
    /// Listing URLs to scrape; read from --input when none are given
    urls: Vec<String>,

    /// File with one listing URL per line
    #[arg(short, long, default_value = "sample_data.txt")]
    input: PathBuf,

    /// Number of worker threads
    #[arg(short, long, default_value_t = ScrapeConfig::default().workers, value_parser = parse_workers)]
    workers: usize,

    /// Per-request timeout in seconds (0 disables it)
    #[arg(long, default_value_t = ScrapeConfig::default().timeout.map_or(0, |t| t.as_secs()))]
    timeout_secs: u64,

    /// Report format written to stdout
    #[arg(short, long, default_value = "text", value_enum)]
    format: OutputFormat,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long)]
    utc: bool,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Property summaries
    Text,
    /// JSON array of records
    Json,
}

#[derive(Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Cli {
    fn scrape_config(&self) -> ScrapeConfig {
        ScrapeConfig {
            workers: self.workers,
            timeout: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
            ..ScrapeConfig::default()
        }
    }
}

fn parse_workers(value: &str) -> std::result::Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("at least one worker is required".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn init_logging(level: &LogLevel, utc: bool) {
    // Keep HTML parser internals quiet at debug/trace
    let level = match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    // Logs on stderr, report on stdout
    if utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.utc);

    let started = Instant::now();
    info!("🏠 Airbnb Scout");

    let config = cli.scrape_config();

    let urls = if cli.urls.is_empty() {
        input::load_urls(&cli.input)?
    } else {
        cli.urls
    };
    anyhow::ensure!(!urls.is_empty(), "No listing URLs to scrape");

    // Surface a bad client configuration once, before any worker starts
    HttpFetcher::new(&config).context("Invalid HTTP client configuration")?;

    let records = scrape_all(&urls, config.workers, || HttpFetcher::new(&config))?;

    let failed = records.iter().filter(|r| r.is_failed()).count();
    info!(
        records = records.len(),
        failed,
        "✅ Scraped {} of {} listings",
        records.len() - failed,
        records.len()
    );

    let mut stdout = std::io::stdout().lock();
    match cli.format {
        OutputFormat::Text => report::write_text_report(&mut stdout, &records)?,
        OutputFormat::Json => report::write_json_report(&mut stdout, &records)?,
    }
    stdout.flush()?;

    info!(elapsed_ms = started.elapsed().as_millis() as u64, "Execution finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_defaults_match_scrape_config() {
        let config = Cli::parse_from(["airbnb-scout"]).scrape_config();
        let defaults = ScrapeConfig::default();

        assert_eq!(config.workers, defaults.workers);
        assert_eq!(config.timeout, defaults.timeout);
    }

    #[test]
    fn zero_timeout_disables_it() {
        let cli = Cli::parse_from(["airbnb-scout", "--timeout-secs", "0", "-w", "2"]);

        let config = cli.scrape_config();

        assert_eq!(config.timeout, None);
        assert_eq!(config.workers, 2);
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(Cli::try_parse_from(["airbnb-scout", "--workers", "0"]).is_err());
    }
}
