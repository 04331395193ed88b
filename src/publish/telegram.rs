// src/publish/telegram.rs

//! Telegram Bot API publisher.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;

use crate::config::TelegramConfig;
use crate::error::{AppError, Result};
use crate::models::Item;
use crate::publish::Publisher;

const API_BASE: &str = "https://api.telegram.org";
const SEND_TIMEOUT_SECS: u64 = 30;

/// Publisher posting one `sendMessage` call per item.
pub struct TelegramPublisher {
    client: Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramPublisher {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_base: API_BASE.to_string(),
            bot_token: config.bot_token.clone(),
            chat_id: config.channel_id.clone(),
        })
    }

    /// Point the publisher at a different API host, for tests.
    #[cfg(test)]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}

#[async_trait]
impl Publisher for TelegramPublisher {
    async fn publish(&self, item: &Item) -> Result<()> {
        let body = json!({
            "chat_id": self.chat_id,
            "text": item.message_text(),
            "disable_web_page_preview": false,
        });

        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::publish(&item.url, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = response.text().await.unwrap_or_default();
        Err(classify_status(status, &item.url, &detail))
    }
}

/// Map an HTTP status to the item-level vs transport-level split.
///
/// 4xx responses other than 429 mean the token or chat is wrong and every
/// further send would fail the same way, so the run aborts. Rate limits
/// and server errors only cost the current item.
fn classify_status(status: StatusCode, url: &str, detail: &str) -> AppError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            AppError::publish(url, format!("rate limited: {detail}"))
        }
        s if s.is_client_error() => {
            AppError::publish_fatal(format!("Telegram rejected send ({s}): {detail}"))
        }
        s => AppError::publish(url, format!("Telegram error ({s}): {detail}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/a";

    #[test]
    fn test_unauthorized_is_fatal() {
        let err = classify_status(StatusCode::UNAUTHORIZED, URL, "bad token");
        assert!(matches!(err, AppError::PublishFatal(_)));
    }

    #[test]
    fn test_bad_request_is_fatal() {
        let err = classify_status(StatusCode::BAD_REQUEST, URL, "chat not found");
        assert!(matches!(err, AppError::PublishFatal(_)));
    }

    #[test]
    fn test_rate_limit_is_transient() {
        let err = classify_status(StatusCode::TOO_MANY_REQUESTS, URL, "retry later");
        assert!(matches!(err, AppError::Publish { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_server_error_is_transient() {
        let err = classify_status(StatusCode::BAD_GATEWAY, URL, "");
        assert!(matches!(err, AppError::Publish { .. }));
    }

    #[test]
    fn test_endpoint_shape() {
        let config = TelegramConfig {
            bot_token: "123:abc".into(),
            channel_id: "@channel".into(),
            alert_chat_id: "@channel".into(),
        };
        let publisher = TelegramPublisher::new(&config)
            .unwrap()
            .with_api_base("http://localhost:9999");
        assert_eq!(
            publisher.endpoint(),
            "http://localhost:9999/bot123:abc/sendMessage"
        );
    }
}
