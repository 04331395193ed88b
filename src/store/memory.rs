// src/store/memory.rs

//! In-process seen-URL store for tests and dry runs.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::SeenRecord;
use crate::store::SeenStore;

/// Seen-URL store backed by an in-process map. Nothing survives the
/// process; dry runs always see every item as new.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, SeenRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the store, for tests simulating earlier runs.
    pub fn with_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let now = Utc::now();
        let records = urls
            .into_iter()
            .map(|u| {
                let url: String = u.into();
                (url.clone(), SeenRecord::new(url, now))
            })
            .collect();
        Self {
            records: Mutex::new(records),
        }
    }

    /// Number of recorded URLs.
    pub fn len(&self) -> usize {
        self.records.lock().expect("store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SeenStore for MemoryStore {
    async fn has(&self, url: &str) -> Result<bool> {
        Ok(self
            .records
            .lock()
            .expect("store mutex poisoned")
            .contains_key(url))
    }

    async fn insert(&self, url: &str, first_seen_at: DateTime<Utc>) -> Result<()> {
        let mut records = self.records.lock().expect("store mutex poisoned");
        if records.contains_key(url) {
            return Err(AppError::DuplicateKey(url.to_string()));
        }
        records.insert(url.to_string(), SeenRecord::new(url, first_seen_at));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_then_has() {
        let store = MemoryStore::new();
        assert!(!store.has("https://example.com/a").await.unwrap());

        store
            .insert("https://example.com/a", Utc::now())
            .await
            .unwrap();
        assert!(store.has("https://example.com/a").await.unwrap());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_double_insert_is_duplicate_key() {
        let store = MemoryStore::new();
        store
            .insert("https://example.com/a", Utc::now())
            .await
            .unwrap();

        let err = store
            .insert("https://example.com/a", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateKey(_)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_with_urls_seeds_records() {
        let store = MemoryStore::with_urls(["https://example.com/a"]);
        assert!(store.has("https://example.com/a").await.unwrap());
        assert!(!store.has("https://example.com/b").await.unwrap());
    }
}
