// src/store/mongo.rs

//! MongoDB-backed seen-URL store.
//!
//! One document per URL in the configured collection, with a unique index
//! on `url`. Double inserts surface as E11000 write errors and are mapped
//! to `DuplicateKey`; every other backend failure is `StoreUnavailable`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::error::{AppError, Result};
use crate::models::SeenRecord;
use crate::store::SeenStore;

/// E11000: duplicate key on a unique index.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Ledger document as stored in MongoDB. BSON datetimes are millisecond
/// precision, hence the conversion instead of serializing chrono directly.
#[derive(Debug, Serialize, Deserialize)]
struct SeenDoc {
    url: String,
    first_seen_at: mongodb::bson::DateTime,
}

impl From<&SeenRecord> for SeenDoc {
    fn from(record: &SeenRecord) -> Self {
        Self {
            url: record.url.clone(),
            first_seen_at: mongodb::bson::DateTime::from_millis(
                record.first_seen_at.timestamp_millis(),
            ),
        }
    }
}

/// Seen-URL store backed by a MongoDB collection.
pub struct MongoStore {
    collection: Collection<SeenDoc>,
}

impl MongoStore {
    /// Connect and make sure the unique index on `url` exists.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let client = Client::with_uri_str(&config.connection_string)
            .await
            .map_err(AppError::store_unavailable)?;

        let collection = client
            .database(&config.db_name)
            .collection::<SeenDoc>(&config.collection_name);

        let index = IndexModel::builder()
            .keys(doc! { "url": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        collection
            .create_index(index, None)
            .await
            .map_err(AppError::store_unavailable)?;

        Ok(Self { collection })
    }
}

#[async_trait]
impl SeenStore for MongoStore {
    async fn has(&self, url: &str) -> Result<bool> {
        let found = self
            .collection
            .find_one(doc! { "url": url }, None)
            .await
            .map_err(AppError::store_unavailable)?;
        Ok(found.is_some())
    }

    async fn insert(&self, url: &str, first_seen_at: DateTime<Utc>) -> Result<()> {
        let record = SeenRecord::new(url, first_seen_at);
        let document = SeenDoc::from(&record);

        self.collection
            .insert_one(&document, None)
            .await
            .map_err(|e| map_insert_error(url, e))?;
        Ok(())
    }
}

/// Distinguish the benign unique-index race from real backend failures.
fn map_insert_error(url: &str, error: mongodb::error::Error) -> AppError {
    use mongodb::error::{ErrorKind, WriteFailure};

    if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = &*error.kind {
        if write_error.code == DUPLICATE_KEY_CODE {
            return AppError::DuplicateKey(url.to_string());
        }
    }
    AppError::store_unavailable(error)
}
