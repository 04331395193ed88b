// src/config.rs

//! Runtime configuration.
//!
//! Credentials and namespaces come exclusively from the environment and are
//! collected into one explicit [`Config`] at process start; nothing reads
//! env vars after that. The source definition (which pages to scrape, with
//! which selectors) is an optional TOML file with compiled-in defaults.

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Seen-URL store settings.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// MongoDB connection string
    pub connection_string: String,
    /// Database name
    pub db_name: String,
    /// Collection holding the seen-URL ledger
    pub collection_name: String,
}

/// Telegram transport settings.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot token used by the publisher
    pub bot_token: String,
    /// Channel receiving one message per new item
    pub channel_id: String,
    /// Chat receiving failure alerts; defaults to the publish channel
    pub alert_chat_id: String,
}

/// HTTP fetch tuning.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent: usize,
    pub request_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("gkfeed/", env!("CARGO_PKG_VERSION")).to_string(),
            max_concurrent: 4,
            request_delay_ms: 250,
        }
    }
}

/// Full runtime configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub telegram: TelegramConfig,
    pub fetch: FetchConfig,
}

impl FetchConfig {
    /// Defaults with optional env overrides.
    pub fn from_env() -> Self {
        let mut fetch = Self::default();
        if let Ok(timeout) = env::var("FETCH_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                fetch.timeout_secs = secs;
            }
        }
        if let Ok(concurrent) = env::var("MAX_CONCURRENT") {
            if let Ok(n) = concurrent.parse() {
                fetch.max_concurrent = n;
            }
        }
        if let Ok(delay) = env::var("REQUEST_DELAY_MS") {
            if let Ok(ms) = delay.parse() {
                fetch.request_delay_ms = ms;
            }
        }
        fetch
    }
}

impl Config {
    /// Build configuration from the environment.
    ///
    /// Fails naming the first missing required variable. Fetch tuning is
    /// optional and falls back to defaults.
    pub fn from_env() -> Result<Self> {
        let channel_id = required_var("TELEGRAM_CHANNEL_ID")?;
        let alert_chat_id =
            env::var("TELEGRAM_ALERT_CHAT_ID").unwrap_or_else(|_| channel_id.clone());

        let config = Self {
            store: StoreConfig {
                connection_string: required_var("MONGO_CONNECTION_STRING")?,
                db_name: required_var("DB_NAME")?,
                collection_name: required_var("COLLECTION_NAME")?,
            },
            telegram: TelegramConfig {
                bot_token: required_var("TELEGRAM_BOT_TOKEN")?,
                channel_id,
                alert_chat_id,
            },
            fetch: FetchConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that `from_env` cannot express through presence
    /// alone.
    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.trim().is_empty() {
            return Err(AppError::config("TELEGRAM_BOT_TOKEN is empty"));
        }
        if self.telegram.channel_id.trim().is_empty() {
            return Err(AppError::config("TELEGRAM_CHANNEL_ID is empty"));
        }
        if self.store.connection_string.trim().is_empty() {
            return Err(AppError::config("MONGO_CONNECTION_STRING is empty"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(AppError::config("FETCH_TIMEOUT_SECS must be at least 1"));
        }
        if self.fetch.max_concurrent == 0 {
            return Err(AppError::config("MAX_CONCURRENT must be at least 1"));
        }
        Ok(())
    }
}

fn required_var(name: &str) -> Result<String> {
    env::var(name).map_err(|_| AppError::config(format!("missing env var {name}")))
}

/// Definition of the content source: which list pages to scrape and how to
/// pick article links out of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSpec {
    /// First list page; page N > 1 is fetched at `{base_url}page/N/`
    pub base_url: String,

    /// Number of list pages to walk
    pub pages: u32,

    /// Selector for one article row on a list page
    pub row_selector: String,

    /// Selector for the link inside a row
    pub link_selector: String,

    /// Attribute carrying the link target
    pub attr_name: String,

    /// URLs matching this pattern are dropped before deduplication
    pub exclude_pattern: Option<String>,
}

impl Default for SourceSpec {
    fn default() -> Self {
        Self {
            base_url: "https://www.gktoday.in/current-affairs/".to_string(),
            pages: 3,
            row_selector: "h1#list".to_string(),
            link_selector: "a".to_string(),
            attr_name: "href".to_string(),
            // The quiz posts share the list page but are not articles.
            exclude_pattern: Some("daily-current-affairs-quiz".to_string()),
        }
    }
}

impl SourceSpec {
    /// Load a source spec from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&s)?)
    }

    /// Load a source spec, falling back to defaults.
    ///
    /// An absent file is the normal case (defaults are compiled in) and
    /// stays quiet; an unreadable or malformed file is warned about.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Failed to load source spec {path:?}: {e}");
            log::warn!("Using default source spec.");
            Self::default()
        })
    }

    /// URL of the n-th list page (1-based).
    pub fn page_url(&self, page: u32) -> String {
        if page <= 1 {
            self.base_url.clone()
        } else {
            format!("{}page/{}/", self.base_url, page)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.pages == 0 {
            return Err(AppError::config("source spec: pages must be at least 1"));
        }
        url::Url::parse(&self.base_url)?;
        scraper::Selector::parse(&self.row_selector)
            .map_err(|e| AppError::selector(&self.row_selector, format!("{e:?}")))?;
        scraper::Selector::parse(&self.link_selector)
            .map_err(|e| AppError::selector(&self.link_selector, format!("{e:?}")))?;
        if let Some(pattern) = &self.exclude_pattern {
            regex::Regex::new(pattern)
                .map_err(|e| AppError::config(format!("source spec: bad exclude pattern: {e}")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        Config {
            store: StoreConfig {
                connection_string: "mongodb://localhost:27017".into(),
                db_name: "gkfeed".into(),
                collection_name: "seen_urls".into(),
            },
            telegram: TelegramConfig {
                bot_token: "123:abc".into(),
                channel_id: "@channel".into(),
                alert_chat_id: "@channel".into(),
            },
            fetch: FetchConfig::default(),
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_token() {
        let mut config = sample_config();
        config.telegram.bot_token = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut config = sample_config();
        config.fetch.max_concurrent = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_source_spec_defaults_validate() {
        assert!(SourceSpec::default().validate().is_ok());
    }

    #[test]
    fn test_page_url() {
        let spec = SourceSpec::default();
        assert_eq!(spec.page_url(1), "https://www.gktoday.in/current-affairs/");
        assert_eq!(
            spec.page_url(2),
            "https://www.gktoday.in/current-affairs/page/2/"
        );
    }

    #[test]
    fn test_source_spec_toml_roundtrip() {
        let toml_src = r#"
            base_url = "https://example.com/news/"
            pages = 2
            row_selector = "div.entry"
        "#;
        let spec: SourceSpec = toml::from_str(toml_src).unwrap();
        assert_eq!(spec.base_url, "https://example.com/news/");
        assert_eq!(spec.pages, 2);
        assert_eq!(spec.row_selector, "div.entry");
        // Unspecified fields keep defaults
        assert_eq!(spec.link_selector, "a");
        assert_eq!(spec.attr_name, "href");
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let spec = SourceSpec::load_or_default(Path::new("does/not/exist.toml"));
        assert_eq!(spec.pages, SourceSpec::default().pages);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = SourceSpec::load(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn test_load_malformed_file_is_toml_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("source.toml");
        std::fs::write(&path, "pages = \"not a number\"").unwrap();

        let err = SourceSpec::load(&path).unwrap_err();
        assert!(matches!(err, AppError::Toml(_)));

        // load_or_default falls back instead of failing.
        let spec = SourceSpec::load_or_default(&path);
        assert_eq!(spec.pages, SourceSpec::default().pages);
    }

    #[test]
    fn test_load_reads_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("source.toml");
        std::fs::write(&path, "pages = 5").unwrap();

        let spec = SourceSpec::load(&path).unwrap();
        assert_eq!(spec.pages, 5);
    }
}
