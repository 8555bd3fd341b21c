use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Semaphore};

use crate::app::{FeedFailure, FetchCause, FetchError};
use crate::config::{DEFAULT_TIMEOUT_SECS, DEFAULT_WORKERS};
use crate::domain::{FeedDescriptor, FeedItem};
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;

/// What one descriptor produced: its items, or why it produced none.
pub type FeedOutcome = Result<Vec<FeedItem>, FeedFailure>;

/// Fetches and normalizes many feeds at once, bounded by a worker limit.
pub struct ParallelFetcher {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    semaphore: Arc<Semaphore>,
    timeout: Duration,
}

impl ParallelFetcher {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self::with_workers(
            fetcher,
            DEFAULT_WORKERS,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn with_workers(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        workers: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
            timeout,
        }
    }

    /// Run fetch+normalize for every descriptor.
    ///
    /// The returned outcomes line up index-for-index with `descriptors`,
    /// whatever order the tasks finish in.
    pub async fn fetch_all(
        &self,
        descriptors: &[FeedDescriptor],
        normalizer: &Normalizer,
    ) -> Vec<FeedOutcome> {
        let (tx, mut rx) = mpsc::channel(descriptors.len().max(1));

        for (index, descriptor) in descriptors.iter().cloned().enumerate() {
            let fetcher = self.fetcher.clone();
            let semaphore = self.semaphore.clone();
            let normalizer = normalizer.clone();
            let timeout = self.timeout;
            let tx = tx.clone();

            tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };

                let outcome = fetch_single_feed(&fetcher, descriptor, &normalizer, timeout).await;
                // Receiver only goes away if the caller was dropped.
                let _ = tx.send((index, outcome)).await;
            });
        }
        drop(tx);

        let mut slots: Vec<Option<FeedOutcome>> = Vec::with_capacity(descriptors.len());
        slots.resize_with(descriptors.len(), || None);

        while let Some((index, outcome)) = rx.recv().await {
            slots[index] = Some(outcome);
        }

        slots
            .into_iter()
            .zip(descriptors)
            .map(|(slot, descriptor)| {
                slot.unwrap_or_else(|| {
                    tracing::error!("Worker for {} exited without a result", descriptor.uri);
                    Err(FeedFailure::Aborted(descriptor.clone()))
                })
            })
            .collect()
    }
}

async fn fetch_single_feed(
    fetcher: &Arc<dyn Fetcher + Send + Sync>,
    descriptor: FeedDescriptor,
    normalizer: &Normalizer,
    timeout: Duration,
) -> FeedOutcome {
    let fetched = tokio::time::timeout(timeout, fetcher.fetch(&descriptor)).await;
    let payload = match fetched {
        Ok(result) => result?,
        Err(_) => {
            return Err(FetchError::new(descriptor, FetchCause::Timeout(timeout)).into());
        }
    };

    let items = normalizer.normalize(payload)?;
    tracing::info!("Normalized {} items from {}", items.len(), descriptor.uri);

    Ok(items)
}
