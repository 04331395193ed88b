//! Discovered content item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Telegram rejects messages longer than this.
pub const MESSAGE_CHAR_LIMIT: usize = 4096;

/// One discovered content unit with a unique URL.
///
/// Immutable once fetched; the URL is the item's identity for
/// deduplication purposes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Full URL of the article; unique identifier
    pub url: String,

    /// Article title
    pub title: String,

    /// Short summary, empty if the source list page carries none
    #[serde(default)]
    pub summary: String,

    /// Publication timestamp, if the source exposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Create an item with just a URL and title.
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            summary: String::new(),
            published_at: None,
        }
    }

    /// Render the outbound channel message for this item.
    ///
    /// Title, optional summary, then the link, truncated on grapheme
    /// boundaries to Telegram's message limit.
    pub fn message_text(&self) -> String {
        let mut text = String::with_capacity(self.title.len() + self.url.len() + 2);
        text.push_str(self.title.trim());
        if !self.summary.trim().is_empty() {
            text.push_str("\n\n");
            text.push_str(self.summary.trim());
        }
        text.push_str("\n\n");
        text.push_str(&self.url);
        truncate_graphemes(&text, MESSAGE_CHAR_LIMIT)
    }
}

/// Truncate a string to at most `limit` characters without splitting a
/// grapheme cluster, appending an ellipsis when anything was cut.
fn truncate_graphemes(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }

    let mut out = String::new();
    let mut count = 0;
    for g in text.graphemes(true) {
        let chars = g.chars().count();
        if count + chars > limit.saturating_sub(1) {
            break;
        }
        out.push_str(g);
        count += chars;
    }
    out.push('…');
    out
}
