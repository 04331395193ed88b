// src/error.rs

//! Unified error handling for the ingestion pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Content source unreachable or unparseable; fatal for the run
    #[error("Fetch error for {context}: {message}")]
    Fetch { context: String, message: String },

    /// Seen-URL store unreachable; fatal for the run
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// URL already present in the store; benign concurrent-run race
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Transient publish failure for a single item; that item is skipped
    #[error("Publish error for {url}: {message}")]
    Publish { url: String, message: String },

    /// Transport-level publish failure (bad token/chat); aborts the run
    #[error("Publish transport broken: {0}")]
    PublishFatal(String),

    /// Failure-alert delivery failed; logged only, never escalated
    #[error("Notify error: {0}")]
    Notify(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Create a fetch error with context.
    pub fn fetch(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a store-unavailable error.
    pub fn store_unavailable(message: impl fmt::Display) -> Self {
        Self::StoreUnavailable(message.to_string())
    }

    /// Create a transient publish error for one item.
    pub fn publish(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Publish {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a fatal publish-transport error.
    pub fn publish_fatal(message: impl fmt::Display) -> Self {
        Self::PublishFatal(message.to_string())
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error aborts the run.
    ///
    /// `Publish` is skipped per item and `DuplicateKey` is a tolerated
    /// race; everything else ends the run in the failed state.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Publish { .. } | Self::DuplicateKey(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(AppError::fetch("list page", "timeout").is_fatal());
        assert!(AppError::store_unavailable("connection reset").is_fatal());
        assert!(AppError::publish_fatal("401 Unauthorized").is_fatal());
        assert!(AppError::config("missing TELEGRAM_BOT_TOKEN").is_fatal());

        assert!(!AppError::publish("https://example.com/a", "429").is_fatal());
        assert!(!AppError::DuplicateKey("https://example.com/a".into()).is_fatal());
    }

    #[test]
    fn test_display_includes_context() {
        let err = AppError::fetch("page 2", "connection refused");
        assert_eq!(
            err.to_string(),
            "Fetch error for page 2: connection refused"
        );
    }
}
