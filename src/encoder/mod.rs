//! Output encoders for a [`FeedCollection`].

pub mod markdown;

use std::fmt;
use std::str::FromStr;

use crate::app::{EncodeError, UnsupportedFormatError};
use crate::domain::FeedCollection;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = UnsupportedFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(UnsupportedFormatError {
                requested: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("JSON"),
            OutputFormat::Markdown => f.write_str("Markdown"),
        }
    }
}

/// Serialize `collection` in `format`.
pub fn encode(collection: &FeedCollection, format: OutputFormat) -> Result<Vec<u8>, EncodeError> {
    match format {
        OutputFormat::Json => {
            let mut bytes = serde_json::to_vec_pretty(collection)?;
            bytes.push(b'\n');
            Ok(bytes)
        }
        OutputFormat::Markdown => Ok(markdown::render(collection)?.into_bytes()),
    }
}
