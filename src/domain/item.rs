use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A feed entry in canonical, format-independent form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: String,
    pub title: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub source_label: String,
}

impl FeedItem {
    pub fn new(
        feed_uri: &str,
        entry_id: &str,
        title: String,
        link: String,
        source_label: String,
    ) -> Self {
        Self {
            id: Self::generate_id(feed_uri, entry_id),
            title,
            link,
            published_at: None,
            summary: None,
            source_label,
        }
    }

    /// Generate a deterministic ID from feed URI and entry ID
    pub fn generate_id(feed_uri: &str, entry_id: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(feed_uri.as_bytes());
        hasher.update(entry_id.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Items from every successful feed, in manifest order then source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedCollection {
    items: Vec<FeedItem>,
}

impl FeedCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one feed's items after everything already collected.
    pub fn extend_feed(&mut self, items: Vec<FeedItem>) {
        self.items.extend(items);
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop items published before `since`. Undated items stay.
    pub fn retain_since(&mut self, since: DateTime<Utc>) -> usize {
        let before = self.items.len();
        self.items
            .retain(|item| item.published_at.is_none_or(|published| published >= since));
        before - self.items.len()
    }
}

impl From<Vec<FeedItem>> for FeedCollection {
    fn from(items: Vec<FeedItem>) -> Self {
        Self { items }
    }
}
