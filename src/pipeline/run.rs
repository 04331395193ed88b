// src/pipeline/run.rs

//! Pipeline orchestrator.
//!
//! One run walks fetch → filter → publish → record and returns counters.
//! Publish order is fetch order; a URL is recorded only after its own
//! publish succeeded, so a crash between the two can at worst repeat a
//! message on the next run, never drop one.

use std::collections::HashSet;

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{Item, PublishResult, RunOutcome};
use crate::notify::Notifier;
use crate::publish::Publisher;
use crate::source::ContentSource;
use crate::store::SeenStore;

/// Execute one run, sending exactly one failure alert if it aborts.
///
/// Successful runs (including empty ones) alert nobody. The error is
/// returned unchanged either way so the caller still controls the exit
/// status.
pub async fn run_with_notifier(
    source: &dyn ContentSource,
    store: &dyn SeenStore,
    publisher: &dyn Publisher,
    notifier: &dyn Notifier,
) -> Result<RunOutcome> {
    match run_pipeline(source, store, publisher).await {
        Ok(outcome) => Ok(outcome),
        Err(error) => {
            notifier.notify_failure(&error.to_string()).await;
            Err(error)
        }
    }
}

/// Execute one end-to-end run.
///
/// Returns the run counters on success (an empty fetch is a success with
/// zero publishes). Any fatal error aborts immediately; the caller is
/// responsible for the single failure notification and the exit status.
pub async fn run_pipeline(
    source: &dyn ContentSource,
    store: &dyn SeenStore,
    publisher: &dyn Publisher,
) -> Result<RunOutcome> {
    // Fetch
    let fetched = source.fetch_latest().await?;
    let mut outcome = RunOutcome {
        items_fetched: fetched.len(),
        ..RunOutcome::default()
    };

    if fetched.is_empty() {
        log::info!("Source returned no items; nothing to do");
        return Ok(outcome);
    }

    // Filter: in-batch duplicates first, then the persistent ledger.
    let deduped = dedup_batch(fetched);

    let mut new_items = Vec::new();
    for item in deduped {
        if store.has(&item.url).await? {
            log::debug!("Already seen: {}", item.url);
        } else {
            new_items.push(item);
        }
    }
    outcome.items_new = new_items.len();
    log::info!("{} new items after deduplication", outcome.items_new);

    // Publish and record, one item at a time, in discovery order.
    let mut results: Vec<PublishResult> = Vec::with_capacity(new_items.len());
    for item in new_items {
        match publisher.publish(&item).await {
            Ok(()) => {
                record_published(store, &item).await?;
                results.push(PublishResult::ok(item));
            }
            Err(error) if !error.is_fatal() => {
                // One bad item must not block the rest of the batch.
                log::warn!("Skipping item after publish failure: {error}");
                results.push(PublishResult::failed(item, error.to_string()));
            }
            Err(error) => return Err(error),
        }
    }

    outcome.items_published = results.iter().filter(|r| r.success).count();
    outcome.items_skipped = results.len() - outcome.items_published;

    log::info!("Run complete: {}", outcome.summary());
    Ok(outcome)
}

/// Record a successfully published item in the seen ledger.
///
/// A duplicate key here means a concurrent run got there first; the
/// message may have gone out twice, but the ledger stays consistent.
async fn record_published(store: &dyn SeenStore, item: &Item) -> Result<()> {
    match store.insert(&item.url, Utc::now()).await {
        Ok(()) => Ok(()),
        Err(AppError::DuplicateKey(url)) => {
            log::debug!("Lost insert race for {url}; already recorded by another run");
            Ok(())
        }
        Err(error) => Err(error),
    }
}

/// Drop repeated URLs within one fetch batch, first occurrence wins.
fn dedup_batch(items: Vec<Item>) -> Vec<Item> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.url.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_batch_first_occurrence_wins() {
        let items = vec![
            Item::new("https://example.com/a", "A first"),
            Item::new("https://example.com/b", "B"),
            Item::new("https://example.com/a", "A second"),
        ];

        let deduped = dedup_batch(items);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].title, "A first");
        assert_eq!(deduped[1].url, "https://example.com/b");
    }

    #[test]
    fn test_dedup_batch_preserves_order() {
        let items: Vec<Item> = (0..10)
            .map(|i| Item::new(format!("https://example.com/{i}"), format!("Item {i}")))
            .collect();
        let deduped = dedup_batch(items.clone());
        assert_eq!(deduped, items);
    }
}
