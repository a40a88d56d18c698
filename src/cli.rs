//! Command-line interface definitions.
//!
//! Two subcommands cover the two passes: `crawl` runs a search and merges
//! the results into the history, `enrich` revisits the rows flagged in the
//! history file. Options shared by both (history path, filter rules) live
//! on the top-level struct.

use clap::{Parser, Subcommand};

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Crawl the first three result pages for a search
/// job_scout crawl --job "data scientist" --city Paris --pages 3
///
/// # Fetch full descriptions for rows flagged in the history file
/// job_scout enrich
///
/// # Same, against a different history file and rule set
/// job_scout --history ~/jobs/found.csv --filter-config rules.yaml enrich
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the CSV history file
    #[arg(long, env = "JOB_SCOUT_HISTORY", default_value = "job_found.csv")]
    pub history: String,

    /// Optional YAML file overriding the built-in filter rules
    #[arg(long)]
    pub filter_config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crawl search results and merge new listings into the history
    Crawl {
        /// Search term for the job field
        #[arg(short, long)]
        job: String,

        /// Search term for the location field
        #[arg(short, long)]
        city: String,

        /// Result pages to visit, at least 1
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },
    /// Fetch full descriptions for history rows flagged wants_detail
    Enrich,
}
