use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One manifest entry: where a feed lives and how to label it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedDescriptor {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FeedDescriptor {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            label: None,
        }
    }

    pub fn labeled(uri: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            label: Some(label.into()),
        }
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.uri)
    }
}

impl fmt::Display for FeedDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} <{}>", label, self.uri),
            None => f.write_str(&self.uri),
        }
    }
}

/// Raw bytes fetched for a descriptor, handed to the normalizer by value.
#[derive(Debug, Clone)]
pub struct RawFeedPayload {
    pub descriptor: FeedDescriptor,
    pub bytes: Vec<u8>,
    pub fetched_at: DateTime<Utc>,
}

impl RawFeedPayload {
    pub fn new(descriptor: FeedDescriptor, bytes: Vec<u8>) -> Self {
        Self {
            descriptor,
            bytes,
            fetched_at: Utc::now(),
        }
    }
}
