//! # Job Scout
//!
//! A crawl-and-curate pipeline for job listings: searches a job-search
//! engine, extracts structured records page by page, filters them by
//! configurable relevance rules, and merges the survivors into a CSV
//! history that is kept free of duplicates across runs.
//!
//! ## Usage
//!
//! ```sh
//! job_scout crawl --job "data scientist" --city Paris --pages 3
//! # ...flag interesting rows in job_found.csv, then:
//! job_scout enrich
//! ```
//!
//! ## Architecture
//!
//! The crawl follows a pipeline:
//! 1. **Crawl**: submit the search, walk the result pages, extract batches
//! 2. **Filter**: keep the relevant listings, normalized and scrubbed
//! 3. **Merge**: reconcile with the history, old rows win over duplicates
//! 4. **Persist**: write the CSV back
//!
//! The `enrich` pass runs independently against the persisted history and
//! fills in full descriptions for rows flagged by hand.

use clap::Parser;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod crawl;
mod filter;
mod merge;
mod models;
mod session;
mod store;
mod utils;

use cli::{Cli, Command};
use filter::FilterRules;
use session::HttpSession;

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
    info!("job_scout starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let rules = match &args.filter_config {
        Some(path) => FilterRules::load(Path::new(path))?,
        None => FilterRules::default(),
    };
    let history_path = PathBuf::from(&args.history);

    match args.command {
        Command::Crawl { job, city, pages } => {
            // ---- Crawl ----
            let mut session = HttpSession::open()?;
            let batch = crawl::paginate::collect(
                &mut session,
                &job,
                &city,
                pages as usize,
                utils::bounded_jitter,
            )
            .await?;
            info!(count = batch.len(), "Crawl returned listings");

            // ---- Filter ----
            let kept = rules.apply(batch);
            info!(count = kept.len(), "Listings kept after filtering");

            // ---- Merge & persist ----
            let history = store::load(&history_path)?;
            let merged = merge::merge(history, kept);
            let fresh = merged.iter().filter(|record| record.is_new).count();
            store::save(&history_path, &merged)?;
            info!(
                total = merged.len(),
                fresh,
                path = %history_path.display(),
                "History updated"
            );
        }
        Command::Enrich => {
            let mut history = store::load(&history_path)?;
            let mut session = HttpSession::open()?;
            let updated = crawl::enrich::fetch_details(
                &mut session,
                &mut history,
                rules.separator,
                utils::bounded_jitter,
            )
            .await?;

            if updated > 0 {
                store::save(&history_path, &history)?;
            }
            info!(updated, "Enrichment finished");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        "Execution complete"
    );

    Ok(())
}
