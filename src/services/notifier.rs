// src/services/notifier.rs

//! Alert delivery.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{Alert, Delivery, NotifyConfig};
use crate::utils::{http, preview};

/// Delivers a rendered alert.
///
/// Returns `Delivery::Sent` or `Delivery::Skipped`; failures are errors.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, alert: &Alert) -> Result<Delivery>;
}

/// Webhook body in the Discord embed format.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct WebhookMessage {
    pub content: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub url: String,
    pub description: String,
    pub color: u32,
    pub footer: EmbedFooter,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct EmbedFooter {
    pub text: String,
}

impl From<&Alert> for WebhookMessage {
    fn from(alert: &Alert) -> Self {
        Self {
            content: alert.mention.clone(),
            embeds: vec![Embed {
                title: alert.title.clone(),
                url: alert.url.clone(),
                description: alert.description.clone(),
                color: alert.color,
                footer: EmbedFooter {
                    text: alert.footer.clone(),
                },
            }],
        }
    }
}

/// Posts alerts to a Discord-compatible webhook.
pub struct WebhookNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl WebhookNotifier {
    pub fn new(webhook_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: http::create_webhook_client(timeout_secs)?,
            webhook_url: webhook_url.into(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, alert: &Alert) -> Result<Delivery> {
        let message = WebhookMessage::from(alert);
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&message)
            .send()
            .await
            .map_err(AppError::delivery)?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        log::info!("Webhook response: {} {}", status, preview(&body, 200));

        if status.is_success() {
            Ok(Delivery::Sent)
        } else {
            Err(AppError::delivery(format!("webhook returned {status}")))
        }
    }
}

/// Used when no webhook is configured; logs and drops the alert.
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send(&self, alert: &Alert) -> Result<Delivery> {
        log::warn!("No webhook URL set, skipping alert: {}", alert.title);
        Ok(Delivery::Skipped)
    }
}

/// Pick a notifier for the configuration.
pub fn build_notifier(config: &NotifyConfig) -> Result<Box<dyn Notifier>> {
    match &config.webhook_url {
        Some(url) => Ok(Box::new(WebhookNotifier::new(url, config.timeout_secs)?)),
        None => Ok(Box::new(DisabledNotifier)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::COLOR_AVAILABLE;

    fn alert() -> Alert {
        Alert {
            mention: "@here **Surface 5G availability changed!**".to_string(),
            title: "Surface – 5G".to_string(),
            url: "https://shop.example/surface".to_string(),
            description: "**📦 Available SKUs:**\n\n• **Ultra 5** - 8GB / 256GB SSD - $999"
                .to_string(),
            color: COLOR_AVAILABLE,
            footer: "Total available: 1 SKU(s)".to_string(),
        }
    }

    #[test]
    fn test_webhook_message_shape() {
        let value = serde_json::to_value(WebhookMessage::from(&alert())).unwrap();

        assert_eq!(value["content"], "@here **Surface 5G availability changed!**");
        assert_eq!(value["embeds"][0]["title"], "Surface – 5G");
        assert_eq!(value["embeds"][0]["url"], "https://shop.example/surface");
        assert_eq!(value["embeds"][0]["color"], 65280);
        assert_eq!(value["embeds"][0]["footer"]["text"], "Total available: 1 SKU(s)");
    }

    #[tokio::test]
    async fn test_disabled_notifier_reports_skipped() {
        assert_eq!(DisabledNotifier.send(&alert()).await.unwrap(), Delivery::Skipped);
    }

    #[tokio::test]
    async fn test_build_notifier_without_url_skips() {
        let notifier = build_notifier(&NotifyConfig::default()).unwrap();
        assert_eq!(notifier.send(&alert()).await.unwrap(), Delivery::Skipped);
    }
}
