//! Content source abstraction.
//!
//! The pipeline only ever sees [`ContentSource`]; the concrete scraping
//! rules live behind it so the dedup/publish core can run against a
//! substitute source in tests.

pub mod html_list;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Item;

pub use html_list::HtmlListSource;

/// Source of candidate items.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the current batch of candidate items, oldest-known ordering
    /// preserved as served by the source. May be empty.
    ///
    /// Fails with a fetch error when the source cannot be read at all; the
    /// pipeline treats that as fatal for the run.
    async fn fetch_latest(&self) -> Result<Vec<Item>>;
}
