//! Seen-URL store backends.
//!
//! The store is the single source of truth for deduplication and the only
//! shared mutable resource across overlapping runs; its unique constraint
//! on the URL is the sole cross-run concurrency guard.
//!
//! Available backends:
//! - [`MongoStore`] - MongoDB collection with a unique index (production)
//! - [`MemoryStore`] - In-process map for tests and dry runs

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Persistent set of previously processed URLs.
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Whether the URL has already been recorded.
    ///
    /// Fails with `StoreUnavailable` when the backend cannot be reached.
    async fn has(&self, url: &str) -> Result<bool>;

    /// Record a URL as seen.
    ///
    /// Fails with `DuplicateKey` when the URL is already present (the
    /// store enforces uniqueness itself, callers checking `has` first or
    /// not), and `StoreUnavailable` when the backend cannot be reached.
    async fn insert(&self, url: &str, first_seen_at: DateTime<Utc>) -> Result<()>;
}
