use std::fmt::Write;

use crate::domain::FeedCollection;

/// Render a news digest: one section per run of items from the same source.
pub fn render(collection: &FeedCollection) -> Result<String, std::fmt::Error> {
    let mut out = String::from("# News\n");
    let mut current: Option<&str> = None;

    for item in collection.items() {
        if current != Some(item.source_label.as_str()) {
            write!(out, "\n## {}\n", item.source_label)?;
            current = Some(item.source_label.as_str());
        }
        writeln!(out, "* [{}]({})", escape_link_text(&item.title), item.link)?;
    }

    Ok(out)
}

fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}
