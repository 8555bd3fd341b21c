pub mod commands;

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use clap::Parser;

use crate::config::{FetchSettings, RunConfig};

#[derive(Parser, Debug)]
#[command(name = "feedpipe", version)]
#[command(about = "Fetch the feeds listed in a manifest and reformat them", long_about = None)]
pub struct Cli {
    /// Feeds manifest (JSON)
    #[arg(short, long, default_value = "rss_feeds.json")]
    pub source: PathBuf,

    /// Destination file
    #[arg(short, long, default_value = "rss.json")]
    pub destination: PathBuf,

    /// Destination file format (JSON or Markdown)
    #[arg(short, long, default_value = "JSON")]
    pub format: String,

    /// Enable output logging information
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of parallel workers for fetching feeds
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Per-feed fetch timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Only keep items published within the last N days
    #[arg(long)]
    pub days: Option<u32>,

    /// Settings file (default: ~/.config/feedpipe/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write a sample manifest to the source path and exit
    #[arg(long)]
    pub init: bool,
}

impl Cli {
    /// Resolve flags on top of file settings. `now` anchors `--days`.
    pub fn run_config(&self, mut fetch: FetchSettings, now: DateTime<Utc>) -> RunConfig {
        if let Some(workers) = self.workers {
            fetch.workers = workers;
        }
        if let Some(timeout) = self.timeout {
            fetch.timeout_secs = timeout;
        }

        RunConfig {
            source_path: self.source.clone(),
            destination_path: self.destination.clone(),
            format: self.format.clone(),
            verbose: self.verbose,
            fetch,
            since: self
                .days
                .map(|days| now - Duration::days(i64::from(days))),
        }
    }
}
