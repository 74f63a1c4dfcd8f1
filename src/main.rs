//! Contact Dedup - Main entry point
//!
//! Reads a JSON contacts export, runs one deduplication pass and prints the
//! report as JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use contact_dedup::repositories::{ContactFeed, JsonFileFeed};
use contact_dedup::services::{DedupService, DedupServiceImpl};
use contact_dedup::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration first so LOG_LEVEL can seed the filter
    let config = Config::from_env();

    let fallback = config
        .as_ref()
        .map(|cfg| cfg.log_level.clone())
        .unwrap_or_else(|_| "error".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!(
                patterns = cfg.ignore_rules.patterns.len(),
                page_size = cfg.page_size,
                "Configuration loaded successfully"
            );
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // A positional argument overrides DEDUP_INPUT
    let input: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.input_path.clone())
        .context("No input file: pass a path or set DEDUP_INPUT")?;

    let feed = JsonFileFeed::from_path(&input)
        .await
        .with_context(|| format!("Failed to load contacts from {}", input.display()))?;
    info!(records = feed.len(), input = %input.display(), "Contacts export loaded");

    let feed = Arc::new(feed) as Arc<dyn ContactFeed>;
    let service = DedupServiceImpl::from_config(feed, &config)?;

    let report = service.run().await?;
    eprintln!("{}", report.summary());

    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);

    info!("Contact Dedup complete");
    Ok(())
}
