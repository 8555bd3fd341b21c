//! The run orchestrator: manifest → fetch+normalize → encode → write.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::app::{FeedFailure, PipelineError, Result};
use crate::config::{FetchSettings, RunConfig};
use crate::domain::FeedCollection;
use crate::encoder::{self, OutputFormat};
use crate::fetcher::{Fetcher, HttpFetcher, ParallelFetcher};
use crate::manifest;
use crate::normalizer::Normalizer;

/// Where a run currently is.
///
/// Workers parse each feed as soon as its fetch returns, so per-feed
/// normalization happens while the run is in `Fetching`. `Normalizing`
/// is the merge of every worker's outcome into one ordered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Loading,
    /// Fetch and per-feed parse on the worker pool.
    Fetching,
    /// Merging outcomes in manifest order and applying the `since` cut-off.
    Normalizing,
    Encoding,
    Done,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Loading => "loading",
            PipelineState::Fetching => "fetching",
            PipelineState::Normalizing => "normalizing",
            PipelineState::Encoding => "encoding",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of a run that wrote its output. Failed feeds are listed even
/// when the run as a whole succeeded.
#[derive(Debug)]
pub struct RunReport {
    pub destination: PathBuf,
    pub format: OutputFormat,
    pub items: usize,
    pub feeds_total: usize,
    pub feeds_succeeded: usize,
    pub failures: Vec<FeedFailure>,
    pub bytes_written: usize,
}

impl RunReport {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

pub struct Pipeline {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    normalizer: Normalizer,
    state: Mutex<PipelineState>,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self {
            fetcher,
            normalizer: Normalizer::new(),
            state: Mutex::new(PipelineState::Idle),
        }
    }

    /// Pipeline backed by the HTTP fetcher.
    pub fn with_http(settings: &FetchSettings) -> Result<Self> {
        let fetcher = HttpFetcher::new(settings).map_err(PipelineError::HttpClient)?;
        Ok(Self::new(Arc::new(fetcher)))
    }

    pub fn state(&self) -> PipelineState {
        match self.state.lock() {
            Ok(state) => *state,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn transition(&self, next: PipelineState) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        let previous = *state;
        tracing::debug!(from = %previous, to = %next, "Pipeline state change");
        *state = next;
    }

    pub async fn run(&self, config: &RunConfig) -> Result<RunReport> {
        self.transition(PipelineState::Idle);
        let result = self.execute(config).await;
        match &result {
            Ok(_) => self.transition(PipelineState::Done),
            Err(e) => {
                tracing::debug!("Run failed: {}", e);
                self.transition(PipelineState::Failed);
            }
        }
        result
    }

    async fn execute(&self, config: &RunConfig) -> Result<RunReport> {
        // Format errors surface before any manifest or network work.
        let format: OutputFormat = config.format.parse()?;

        self.transition(PipelineState::Loading);
        let descriptors = manifest::load_manifest(&config.source_path)?;
        tracing::info!(
            "Loaded {} feeds from {}",
            descriptors.len(),
            config.source_path.display()
        );

        self.transition(PipelineState::Fetching);
        let parallel = ParallelFetcher::with_workers(
            self.fetcher.clone(),
            config.fetch.workers(),
            config.fetch.timeout(),
        );
        let outcomes = parallel.fetch_all(&descriptors, &self.normalizer).await;

        self.transition(PipelineState::Normalizing);
        let mut collection = FeedCollection::new();
        let mut failures = Vec::new();
        let mut feeds_succeeded = 0;

        for outcome in outcomes {
            match outcome {
                Ok(items) => {
                    feeds_succeeded += 1;
                    collection.extend_feed(items);
                }
                Err(failure) => {
                    tracing::warn!("{}", failure);
                    failures.push(failure);
                }
            }
        }

        if feeds_succeeded == 0 {
            return Err(PipelineError::AllFeedsFailed { failures });
        }

        if let Some(since) = config.since {
            let dropped = collection.retain_since(since);
            if dropped > 0 {
                tracing::debug!(dropped, "Dropped items published before {}", since);
            }
        }

        self.transition(PipelineState::Encoding);
        let bytes = encoder::encode(&collection, format)?;
        write_output(&config.destination_path, &bytes).await?;

        tracing::info!(
            items = collection.len(),
            failed = failures.len(),
            "Wrote {} output to {}",
            format,
            config.destination_path.display()
        );

        Ok(RunReport {
            destination: config.destination_path.clone(),
            format,
            items: collection.len(),
            feeds_total: descriptors.len(),
            feeds_succeeded,
            failures,
            bytes_written: bytes.len(),
        })
    }
}

async fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let output_err = |e| PipelineError::Output {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(output_err)?;
    }
    tokio::fs::write(path, bytes).await.map_err(output_err)
}
