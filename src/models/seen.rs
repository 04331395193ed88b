//! Seen-URL ledger record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in the append-only seen-URL ledger.
///
/// Created exactly once per distinct URL, never mutated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeenRecord {
    /// The item URL; unique key of the ledger
    pub url: String,

    /// When this URL was first recorded
    pub first_seen_at: DateTime<Utc>,
}

impl SeenRecord {
    pub fn new(url: impl Into<String>, first_seen_at: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            first_seen_at,
        }
    }
}
