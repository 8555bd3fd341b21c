use chrono::Utc;
use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::ParseError;
use crate::domain::{FeedItem, RawFeedPayload};

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse an RSS, Atom or JSON Feed payload into canonical items.
    ///
    /// Entries without a title or a link are skipped. Optional fields the
    /// source omits stay `None`.
    pub fn normalize(&self, payload: RawFeedPayload) -> Result<Vec<FeedItem>, ParseError> {
        let RawFeedPayload {
            descriptor, bytes, ..
        } = payload;

        let feed = parser::parse(bytes.as_slice()).map_err(|e| ParseError {
            descriptor: descriptor.clone(),
            cause: e.to_string(),
        })?;

        let source_label = descriptor
            .label
            .clone()
            .filter(|label| !label.trim().is_empty())
            .or_else(|| {
                feed.title
                    .map(|t| decode_text(&t.content))
                    .filter(|title| !title.is_empty())
            })
            .unwrap_or_else(|| descriptor.uri.clone());

        let total = feed.entries.len();
        let items: Vec<FeedItem> = feed
            .entries
            .into_iter()
            .filter_map(|entry| {
                let title = entry
                    .title
                    .map(|t| decode_text(&t.content))
                    .filter(|t| !t.is_empty())?;
                let link = entry.links.first().map(|l| l.href.trim().to_string())?;
                if link.is_empty() {
                    return None;
                }

                let entry_id = if entry.id.is_empty() {
                    link.clone()
                } else {
                    entry.id
                };

                let mut item =
                    FeedItem::new(&descriptor.uri, &entry_id, title, link, source_label.clone());
                item.summary = entry
                    .summary
                    .map(|s| decode_text(&s.content))
                    .filter(|s| !s.is_empty());
                item.published_at = entry
                    .published
                    .or(entry.updated)
                    .map(|dt| dt.with_timezone(&Utc));

                Some(item)
            })
            .collect();

        if items.len() < total {
            tracing::debug!(
                skipped = total - items.len(),
                "Skipped entries without title or link in {}",
                descriptor.uri
            );
        }

        Ok(items)
    }
}

fn decode_text(raw: &str) -> String {
    decode_html_entities(raw.trim()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeedDescriptor;
    use chrono::TimeZone;

    const RSS_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <description>A test feed</description>
    <item>
      <title>Test Item 1</title>
      <link>https://example.com/item1</link>
      <guid>item-1</guid>
      <pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate>
      <description>This is item 1</description>
    </item>
    <item>
      <title>Fish &amp;amp; Chips</title>
      <link>https://example.com/item2</link>
      <guid>item-2</guid>
    </item>
    <item>
      <description>No title, no link</description>
    </item>
  </channel>
</rss>"#;

    const ATOM_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Test Feed</title>
  <subtitle>An Atom test feed</subtitle>
  <entry>
    <title>Atom Entry 1</title>
    <link href="https://example.com/atom1"/>
    <id>atom-entry-1</id>
    <updated>2024-01-01T00:00:00Z</updated>
    <summary>This is Atom entry 1</summary>
  </entry>
</feed>"#;

    const JSON_FEED_SAMPLE: &str = r#"{
  "version": "https://jsonfeed.org/version/1.1",
  "title": "JSON Test Feed",
  "items": [
    {
      "id": "json-1",
      "title": "JSON Item 1",
      "url": "https://example.com/json1",
      "content_text": "Body"
    }
  ]
}"#;

    fn payload(descriptor: FeedDescriptor, body: &str) -> RawFeedPayload {
        RawFeedPayload::new(descriptor, body.as_bytes().to_vec())
    }

    #[test]
    fn test_parse_rss() {
        let items = Normalizer::new()
            .normalize(payload(
                FeedDescriptor::new("https://example.com/feed.xml"),
                RSS_SAMPLE,
            ))
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Test Item 1");
        assert_eq!(items[0].link, "https://example.com/item1");
        assert_eq!(items[0].summary.as_deref(), Some("This is item 1"));
        assert_eq!(
            items[0].published_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(items[0].source_label, "Test Feed");
    }

    #[test]
    fn test_missing_optional_fields_stay_absent() {
        let items = Normalizer::new()
            .normalize(payload(
                FeedDescriptor::new("https://example.com/feed.xml"),
                RSS_SAMPLE,
            ))
            .unwrap();

        assert_eq!(items[1].published_at, None);
        assert_eq!(items[1].summary, None);
    }

    #[test]
    fn test_html_entities_decoded() {
        let items = Normalizer::new()
            .normalize(payload(
                FeedDescriptor::new("https://example.com/feed.xml"),
                RSS_SAMPLE,
            ))
            .unwrap();

        assert_eq!(items[1].title, "Fish & Chips");
    }

    #[test]
    fn test_parse_atom_uses_descriptor_label() {
        let items = Normalizer::new()
            .normalize(payload(
                FeedDescriptor::labeled("https://example.com/feed.atom", "My Label"),
                ATOM_SAMPLE,
            ))
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Atom Entry 1");
        assert_eq!(items[0].link, "https://example.com/atom1");
        assert_eq!(items[0].source_label, "My Label");
        assert_eq!(
            items[0].published_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_empty_label_falls_back_to_feed_title() {
        let items = Normalizer::new()
            .normalize(payload(
                FeedDescriptor::labeled("https://example.com/feed.atom", ""),
                ATOM_SAMPLE,
            ))
            .unwrap();

        assert_eq!(items[0].source_label, "Atom Test Feed");
    }

    #[test]
    fn test_untitled_feed_falls_back_to_uri() {
        let body = r#"<rss version="2.0"><channel>
<item><title>Only item</title><link>https://example.com/only</link></item>
</channel></rss>"#;
        let items = Normalizer::new()
            .normalize(payload(FeedDescriptor::new("https://example.com/feed.xml"), body))
            .unwrap();

        assert_eq!(items[0].source_label, "https://example.com/feed.xml");
    }

    #[test]
    fn test_parse_json_feed() {
        let items = Normalizer::new()
            .normalize(payload(
                FeedDescriptor::new("https://example.com/feed.json"),
                JSON_FEED_SAMPLE,
            ))
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "JSON Item 1");
        assert_eq!(items[0].link, "https://example.com/json1");
        assert_eq!(items[0].source_label, "JSON Test Feed");
    }

    #[test]
    fn test_invalid_content_is_parse_error() {
        let descriptor = FeedDescriptor::new("https://example.com/feed.xml");
        let err = Normalizer::new()
            .normalize(payload(descriptor.clone(), "this is not a feed"))
            .unwrap_err();

        assert_eq!(err.descriptor, descriptor);
    }

    #[test]
    fn test_item_id_determinism() {
        let normalizer = Normalizer::new();
        let descriptor = FeedDescriptor::new("https://example.com/feed.xml");
        let items1 = normalizer
            .normalize(payload(descriptor.clone(), RSS_SAMPLE))
            .unwrap();
        let items2 = normalizer
            .normalize(payload(descriptor, RSS_SAMPLE))
            .unwrap();

        assert_eq!(items1, items2);
    }
}
