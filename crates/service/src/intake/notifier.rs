//! Outbound notifications for new contact messages.
//!
//! Delivery is best effort: callers log failures and carry on.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// An e-mail shaped message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub to: Vec<String>,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport failed: {0}")]
    Transport(String),
    #[error("notification endpoint answered {0}")]
    Rejected(u16),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// POSTs the notification as JSON to a relay endpoint.
pub struct WebhookNotifier {
    client: Client,
    endpoint: Url,
}

impl WebhookNotifier {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(notification)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}

/// Writes the notification to the log; used when no relay is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(to = ?notification.to, subject = %notification.subject, "notification (log only)");
        Ok(())
    }
}

/// Webhook relay when one is configured, otherwise log-only delivery.
pub fn from_config(cfg: &configs::NotificationConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    match cfg.webhook_url.as_deref() {
        Some(url) => {
            let endpoint = Url::parse(url).map_err(|e| NotifyError::Transport(format!("bad webhook url: {e}")))?;
            let notifier = WebhookNotifier::new(endpoint, Duration::from_secs(10))
                .map_err(|e| NotifyError::Transport(e.to_string()))?;
            Ok(Arc::new(notifier))
        }
        None => Ok(Arc::new(LogNotifier)),
    }
}
