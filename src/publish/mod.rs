//! Publishing of new items to the channel.
//!
//! No retry lives here: a transient failure is reported upward and the
//! pipeline decides what to do with the item (skip it, keep the run).

pub mod telegram;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Item;

pub use telegram::TelegramPublisher;

/// Delivers one formatted message per item to the channel.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Send the item's message.
    ///
    /// Fails with a transient `Publish` error (rate limit, network) that
    /// affects this item only, or `PublishFatal` when the transport itself
    /// is broken (bad token/chat).
    async fn publish(&self, item: &Item) -> Result<()>;
}

/// Publisher that only logs, for dry runs.
#[derive(Debug, Default)]
pub struct LogPublisher;

#[async_trait]
impl Publisher for LogPublisher {
    async fn publish(&self, item: &Item) -> Result<()> {
        log::info!("[dry-run] would publish: {}", item.url);
        log::debug!("[dry-run] message:\n{}", item.message_text());
        Ok(())
    }
}
