// src/notify.rs

//! Best-effort operator alert on pipeline failure.
//!
//! Deliberately independent of the publish path: the notifier builds its
//! own HTTP client and talks to the API directly, so a broken publisher
//! transport does not silently take the alert path down with it. Delivery
//! failures are logged and swallowed; they must never mask the run failure
//! that triggered the alert.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::config::TelegramConfig;
use crate::error::{AppError, Result};

const API_BASE: &str = "https://api.telegram.org";
const NOTIFY_TIMEOUT_SECS: u64 = 15;

/// Failure-alert sink. Called at most once per run, on the fatal path
/// only; implementations never propagate their own delivery errors.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_failure(&self, detail: &str);
}

/// Sends a single failure alert to the operator chat.
pub struct FailureNotifier {
    client: Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl FailureNotifier {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(NOTIFY_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_base: API_BASE.to_string(),
            bot_token: config.bot_token.clone(),
            chat_id: config.alert_chat_id.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }

    async fn send(&self, detail: &str) -> Result<()> {
        let body = json!({
            "chat_id": self.chat_id,
            "text": format!("gkfeed run failed:\n{detail}"),
        });

        self.client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for FailureNotifier {
    /// Deliver the alert, logging any delivery failure at warn.
    async fn notify_failure(&self, detail: &str) {
        match self.send(detail).await {
            Ok(()) => log::info!("Failure alert delivered"),
            Err(e) => log::warn!("{}", AppError::Notify(e.to_string())),
        }
    }
}
