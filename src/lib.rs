// src/lib.rs

//! gkfeed library: scheduled content-ingestion pipeline that posts newly
//! published articles to a Telegram channel, deduplicating against a
//! persistent seen-URL store.

pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod publish;
pub mod source;
pub mod store;
