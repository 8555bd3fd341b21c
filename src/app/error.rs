use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::FeedDescriptor;

/// The manifest could not be turned into a list of descriptors.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed manifest {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("Invalid URI {uri:?} in manifest entry {index}: {source}")]
    InvalidUri {
        index: usize,
        uri: String,
        source: url::ParseError,
    },

    #[error("Manifest {0} contains no feeds")]
    Empty(PathBuf),

    #[error("Refusing to overwrite existing manifest {0}")]
    AlreadyExists(PathBuf),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported output format {requested:?} (supported: json, markdown)")]
pub struct UnsupportedFormatError {
    pub requested: String,
}

#[derive(Error, Debug)]
pub enum FetchCause {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Unsupported URI scheme {0:?}")]
    UnsupportedScheme(String),

    #[error("Invalid URI: {0}")]
    InvalidUri(#[from] url::ParseError),

    #[error("Response larger than {limit} bytes")]
    TooLarge { limit: usize },
}

#[derive(Error, Debug)]
#[error("Failed to fetch {descriptor}: {cause}")]
pub struct FetchError {
    pub descriptor: FeedDescriptor,
    #[source]
    pub cause: FetchCause,
}

impl FetchError {
    pub fn new(descriptor: FeedDescriptor, cause: impl Into<FetchCause>) -> Self {
        Self {
            descriptor,
            cause: cause.into(),
        }
    }
}

#[derive(Error, Debug)]
#[error("Failed to parse {descriptor}: {cause}")]
pub struct ParseError {
    pub descriptor: FeedDescriptor,
    pub cause: String,
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Formatting failed: {0}")]
    Fmt(#[from] fmt::Error),
}

/// Why a single feed contributed nothing to the run.
#[derive(Error, Debug)]
pub enum FeedFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Worker for {0} stopped before reporting a result")]
    Aborted(FeedDescriptor),
}

impl FeedFailure {
    pub fn descriptor(&self) -> &FeedDescriptor {
        match self {
            FeedFailure::Fetch(e) => &e.descriptor,
            FeedFailure::Parse(e) => &e.descriptor,
            FeedFailure::Aborted(descriptor) => descriptor,
        }
    }
}

/// Errors that abort a whole run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormatError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("All {} feeds failed", failures.len())]
    AllFeedsFailed { failures: Vec<FeedFailure> },

    #[error("Failed to write output {path}: {source}")]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
