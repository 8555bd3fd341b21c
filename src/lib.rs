//! # feedpipe
//!
//! Fetches the RSS/Atom/JSON feeds listed in a manifest and rewrites them
//! into a single output file.
//!
//! ## Architecture
//!
//! feedpipe is a short pipeline:
//!
//! ```text
//! Manifest → Fetcher → Normalizer → Encoder → destination file
//! ```
//!
//! - [`manifest`]: reads the list of feeds to process
//! - [`fetcher`]: HTTP client plus a bounded parallel worker pool
//! - [`normalizer`]: converts feed content to canonical items
//! - [`encoder`]: serializes the merged items (JSON, Markdown)
//! - [`pipeline`]: runs the stages and collects per-feed failures
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a sample manifest
//! feedpipe --init --source rss_feeds.json
//!
//! # Fetch everything into rss.json
//! feedpipe --source rss_feeds.json --destination rss.json --format JSON --verbose
//! ```

/// Error types.
///
/// Fatal errors abort a run ([`PipelineError`](app::PipelineError)); per-feed
/// errors ([`FeedFailure`](app::FeedFailure)) are collected and reported.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Run configuration and the optional settings file.
pub mod config;

/// Core domain models.
///
/// - [`FeedDescriptor`](domain::FeedDescriptor): one manifest entry
/// - [`FeedItem`](domain::FeedItem): a canonical feed entry with a SHA256 ID
/// - [`FeedCollection`](domain::FeedCollection): ordered items of a run
pub mod domain;

/// Output formats.
pub mod encoder;

/// Feed fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for feed fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`ParallelFetcher`](fetcher::parallel::ParallelFetcher): Concurrent fetching with semaphore
pub mod fetcher;

/// Manifest loading.
pub mod manifest;

/// Feed parsing and normalization.
///
/// Converts RSS 0.9x/1.0/2.0, Atom 0.3/1.0, and JSON Feed 1.0
/// into canonical [`FeedItem`](domain::FeedItem) structs.
pub mod normalizer;

/// Pipeline orchestration.
pub mod pipeline;
