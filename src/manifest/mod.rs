//! Manifest loading.
//!
//! A manifest is a JSON document listing the feeds to process. Two shapes
//! are accepted:
//!
//! ```json
//! [{ "uri": "https://planetpython.org/rss20.xml", "label": "Planet Python" }]
//! ```
//!
//! or the older label-to-URI map:
//!
//! ```json
//! { "Planet Python": "https://planetpython.org/rss20.xml" }
//! ```

use std::fs;
use std::path::Path;

use serde_json::Value;
use url::Url;

use crate::app::ManifestError;
use crate::domain::FeedDescriptor;

/// Feeds written by [`write_default_manifest`].
pub const DEFAULT_FEEDS: &[(&str, &str)] = &[
    ("Planet Python", "https://planetpython.org/rss20.xml"),
    ("Real Python", "https://realpython.com/atom.xml"),
    ("Schneier on Security", "https://www.schneier.com/blog/atom.xml"),
];

/// Read the manifest at `path` into descriptors, in document order.
pub fn load_manifest(path: &Path) -> Result<Vec<FeedDescriptor>, ManifestError> {
    let content = fs::read_to_string(path).map_err(|e| ManifestError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let descriptors = parse_manifest(&content).map_err(|reason| ManifestError::Malformed {
        path: path.to_path_buf(),
        reason,
    })?;

    if descriptors.is_empty() {
        return Err(ManifestError::Empty(path.to_path_buf()));
    }

    for (index, descriptor) in descriptors.iter().enumerate() {
        Url::parse(&descriptor.uri).map_err(|e| ManifestError::InvalidUri {
            index,
            uri: descriptor.uri.clone(),
            source: e,
        })?;
    }

    tracing::debug!(
        feeds = descriptors.len(),
        "Loaded manifest {}",
        path.display()
    );

    Ok(descriptors)
}

fn parse_manifest(content: &str) -> Result<Vec<FeedDescriptor>, String> {
    let document: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;

    match document {
        Value::Array(entries) => entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                serde_json::from_value::<FeedDescriptor>(entry)
                    .map_err(|e| format!("entry {}: {}", index, e))
            })
            .collect(),
        Value::Object(map) => map
            .into_iter()
            .map(|(label, uri)| match uri {
                Value::String(uri) => Ok(FeedDescriptor::labeled(uri, label)),
                _ => Err(format!("entry {:?}: expected a URI string", label)),
            })
            .collect(),
        _ => Err("expected a list of feeds or a label-to-URI map".to_string()),
    }
}

/// Write a sample manifest to `path`. Never overwrites an existing file.
pub fn write_default_manifest(path: &Path) -> Result<(), ManifestError> {
    if path.exists() {
        return Err(ManifestError::AlreadyExists(path.to_path_buf()));
    }

    let descriptors: Vec<FeedDescriptor> = DEFAULT_FEEDS
        .iter()
        .map(|(label, uri)| FeedDescriptor::labeled(*uri, *label))
        .collect();

    let io_err = |e| ManifestError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let mut content = serde_json::to_string_pretty(&descriptors)
        .map_err(|e| io_err(std::io::Error::other(e)))?;
    content.push('\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, content).map_err(io_err)?;

    Ok(())
}
