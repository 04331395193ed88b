//! Per-run result types. Nothing here is persisted.

use crate::models::Item;

/// Outcome of one publish attempt.
#[derive(Debug, Clone)]
pub struct PublishResult {
    pub item: Item,
    pub success: bool,
    /// Error text when the publish was skipped
    pub error: Option<String>,
}

impl PublishResult {
    pub fn ok(item: Item) -> Self {
        Self {
            item,
            success: true,
            error: None,
        }
    }

    pub fn failed(item: Item, error: impl Into<String>) -> Self {
        Self {
            item,
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Counters for one end-to-end pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    /// Items returned by the content source
    pub items_fetched: usize,

    /// Items remaining after in-batch and store deduplication
    pub items_new: usize,

    /// Items delivered to the channel
    pub items_published: usize,

    /// Items skipped on transient publish failure
    pub items_skipped: usize,
}

impl RunOutcome {
    /// One-line summary for the run log.
    pub fn summary(&self) -> String {
        format!(
            "fetched {}, new {}, published {}, skipped {}",
            self.items_fetched, self.items_new, self.items_published, self.items_skipped
        )
    }
}
