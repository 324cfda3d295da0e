//! # Mathraining Harvest
//!
//! Collects achievement data from [Mathraining](https://www.mathraining.be)
//! user pages and turns it into a CSV snapshot or a per-category chart.
//!
//! ## Usage
//!
//! ```sh
//! mathraining_harvest profiles --country 48 --pages 3 -o ./snapshots
//! mathraining_harvest histogram --url https://www.mathraining.be/users/1234
//! ```
//!
//! ## Architecture
//!
//! `profiles` runs a two-phase crawl:
//! 1. **Indexing**: fetch each country listing page and collect profile links
//! 2. **Fetching**: visit every profile and extract its statistics
//!
//! then writes all records to a dated CSV file. `histogram` fetches a single
//! profile, tallies its solved problems and renders them as text bar panels.
//! Pages are fetched one at a time; a page that fails is logged and skipped.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod date;
mod error;
mod locator;
mod models;
mod net;
mod outputs;
mod scrapers;
mod utils;

use cli::{Cli, Command, prompt_for_url};
use config::Settings;
use models::AggregateMatrix;
use net::{HttpFetcher, PageFetcher};
use outputs::chart::{ChartSink, TextChart};
use outputs::csv::write_snapshot;
use outputs::json::write_matrix_json;
use scrapers::{listing, profile, resolutions};
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(user_agent) = args.user_agent {
        settings.user_agent = user_agent;
    }
    let fetcher = HttpFetcher::new(&settings.user_agent)?;

    match args.command {
        Command::Profiles {
            country,
            pages,
            output_dir,
            dataset_name,
            dedupe,
        } => {
            if let Some(country) = country {
                settings.country_id = country;
            }
            if let Some(pages) = pages {
                settings.pages = pages;
            }
            if let Some(dataset_name) = dataset_name {
                settings.dataset_name = dataset_name;
            }
            run_profiles(&fetcher, &settings, &output_dir, dedupe).await?;
        }
        Command::Histogram { url, output, json } => {
            let url = match url {
                Some(url) => url,
                None => prompt_for_url()?,
            };
            run_histogram(&fetcher, &url, output.as_deref(), json.as_deref()).await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");
    Ok(())
}

/// Crawl the listing pages of one country and snapshot every profile to CSV.
async fn run_profiles<F: PageFetcher>(
    fetcher: &F,
    settings: &Settings,
    output_dir: &str,
    dedupe: bool,
) -> Result<(), Box<dyn Error>> {
    // Fail before crawling if the snapshot cannot be written.
    ensure_writable_dir(output_dir).await?;

    let origin = settings.origin_url()?;
    let urls = listing::listing_urls(&settings.origin, settings.country_id, settings.pages);
    info!(country = settings.country_id, pages = urls.len(), "Indexing listing pages");

    let mut entries = listing::index_profiles(fetcher, &origin, &urls).await;
    if dedupe {
        entries = listing::dedupe_entries(entries);
    }
    if entries.is_empty() {
        warn!(country = settings.country_id, "No profiles found; writing an empty snapshot");
    }

    let records = profile::fetch_profiles(fetcher, &entries).await;
    let path = write_snapshot(
        Path::new(output_dir),
        &settings.dataset_name,
        Local::now().date_naive(),
        &records,
    )?;
    info!(path = %path.display(), records = records.len(), "Profile snapshot complete");
    Ok(())
}

/// Tally one profile's solved problems and render them.
///
/// A profile that cannot be fetched renders as an empty chart; only output
/// failures abort.
async fn run_histogram<F: PageFetcher>(
    fetcher: &F,
    url: &str,
    output: Option<&str>,
    json_path: Option<&str>,
) -> Result<AggregateMatrix, Box<dyn Error>> {
    let matrix = resolutions::tally_profile(fetcher, url).await;

    if let Some(json_path) = json_path {
        write_matrix_json(&matrix, Path::new(json_path)).await?;
    }

    match output {
        Some(path) => {
            let mut sink = TextChart::new(File::create(path)?).with_title(url);
            sink.render(&matrix)?;
            info!(%path, "Wrote chart");
        }
        None => {
            let mut sink = TextChart::new(std::io::stdout().lock()).with_title(url);
            sink.render(&matrix)?;
        }
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::testing::StaticFetcher;

    #[tokio::test]
    async fn test_histogram_survives_unreachable_profile() {
        let dir = std::env::temp_dir().join(format!("mathraining_hist_{}", std::process::id()));
        let chart = dir.join("chart.txt");
        let json = dir.join("counts.json");
        std::fs::create_dir_all(&dir).unwrap();

        let matrix = run_histogram(
            &StaticFetcher::default(),
            "https://www.mathraining.be/users/0",
            chart.to_str(),
            json.to_str(),
        )
        .await
        .unwrap();

        assert!(matrix.is_empty());
        let text = std::fs::read_to_string(&chart).unwrap();
        assert!(text.contains("No solved problems to chart."));
        assert!(json.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
