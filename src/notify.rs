use reqwest::Client;

use crate::{
    error::{Res, SyncError},
    types::{WebhookEmbed, WebhookFooter, WebhookMessage},
    warning,
};

pub const APP_NAME: &str = "Playlist Duplicator";
const EMBED_COLOR: u32 = 1947988;
const FOOTER: &str = "Playlist Duplicator keeps a holding playlist in step with its source";

/// Posts run summaries to a Discord-compatible webhook, if one is configured.
pub struct Notifier {
    http: Client,
    webhook_url: Option<String>,
}

impl Notifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            http: Client::new(),
            webhook_url,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Delivers `content`. Without a webhook this does nothing; delivery
    /// failures are logged and never returned.
    pub async fn notify(&self, content: &str) {
        if let Err(e) = self.try_notify(content).await {
            warning!("{}", e);
        }
    }

    pub async fn try_notify(&self, content: &str) -> Res<()> {
        let Some(url) = &self.webhook_url else {
            return Ok(());
        };

        let response = self
            .http
            .post(url)
            .json(&message(content))
            .send()
            .await
            .map_err(|e| SyncError::Notification(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Notification(format!("{status}: {body}")));
        }

        Ok(())
    }
}

pub fn message(content: &str) -> WebhookMessage {
    WebhookMessage {
        username: APP_NAME.to_string(),
        embeds: vec![WebhookEmbed {
            title: APP_NAME.to_string(),
            description: content.to_string(),
            color: EMBED_COLOR,
            footer: WebhookFooter {
                text: FOOTER.to_string(),
            },
        }],
    }
}
