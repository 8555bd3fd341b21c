pub mod http_fetcher;
pub mod parallel;

use async_trait::async_trait;

use crate::app::FetchError;
use crate::domain::{FeedDescriptor, RawFeedPayload};

pub use http_fetcher::HttpFetcher;
pub use parallel::{FeedOutcome, ParallelFetcher};

#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, descriptor: &FeedDescriptor) -> Result<RawFeedPayload, FetchError>;
}
