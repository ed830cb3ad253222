//! Order notification dispatch.
//!
//! The main summary message is sent first and its failure is returned to the
//! caller. Product photos follow one at a time; a failed photo is logged,
//! recorded in the [`DispatchReport`] and skipped.

use std::time::Duration;

use serde::Serialize;

use shopfront_common::config::NotifierConfig;
use shopfront_common::types::Order;

use crate::error::Result;
use crate::format;
use crate::telegram::{ChatChannel, TelegramClient};

/// Outcome of a single product photo send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum ImageOutcome {
    Delivered,
    /// The channel is unconfigured; nothing was sent.
    NotDelivered,
    Failed(String),
}

/// Per-item record of a photo send attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageDelivery {
    pub item_name: String,
    pub url: String,
    pub outcome: ImageOutcome,
}

/// Summary of one `send_order_with_images` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub order_id: i64,
    pub message_delivered: bool,
    pub images: Vec<ImageDelivery>,
}

impl DispatchReport {
    pub fn delivered_images(&self) -> usize {
        self.images
            .iter()
            .filter(|i| i.outcome == ImageOutcome::Delivered)
            .count()
    }

    pub fn failed_images(&self) -> usize {
        self.images
            .iter()
            .filter(|i| matches!(i.outcome, ImageOutcome::Failed(_)))
            .count()
    }
}

/// Renders orders and delivers them to one chat channel.
#[derive(Debug)]
pub struct NotificationDispatcher<C = TelegramClient> {
    channel: C,
    base_url: String,
    image_delay: Duration,
}

impl NotificationDispatcher<TelegramClient> {
    /// Build a dispatcher backed by the Telegram Bot API.
    pub fn from_config(config: &NotifierConfig) -> Result<Self> {
        let channel = TelegramClient::from_config(config)?;
        if !channel.is_configured() {
            tracing::warn!(
                "TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID missing, order notifications are disabled"
            );
        }
        Ok(Self::with_channel(channel, config))
    }
}

impl<C: ChatChannel> NotificationDispatcher<C> {
    pub fn with_channel(channel: C, config: &NotifierConfig) -> Self {
        Self {
            channel,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_delay: Duration::from_millis(config.image_send_delay_ms),
        }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn format_order_notification(&self, order: &Order) -> Result<String> {
        format::format_order_notification(order)
    }

    pub async fn send_message(&self, text: &str) -> Result<bool> {
        self.channel.send_message(text).await
    }

    pub async fn send_product_image(&self, image_url: &str, caption: &str) -> Result<bool> {
        self.channel.send_photo(image_url, caption).await
    }

    /// Absolute URLs pass through; anything else is joined onto the storefront origin.
    pub fn resolve_image_url(&self, image: &str) -> String {
        let image = image.trim();
        if image.starts_with("http://") || image.starts_with("https://") {
            image.to_string()
        } else {
            format!("{}/{}", self.base_url, image.trim_start_matches('/'))
        }
    }

    /// Send the order summary, then one photo per item that has an image.
    ///
    /// Formatting errors and a failed summary send are returned and no photo is
    /// attempted. Photo failures never abort the loop.
    pub async fn send_order_with_images(&self, order: &Order) -> Result<DispatchReport> {
        let items = format::decode_items(order)?;
        let message = format::render_order(order, &items)?;

        let mut report = DispatchReport {
            order_id: order.id,
            message_delivered: false,
            images: Vec::new(),
        };

        report.message_delivered = self.send_message(&message).await?;
        if !report.message_delivered {
            tracing::debug!(order_id = order.id, "Order summary not sent, skipping product images");
            return Ok(report);
        }

        for item in items.iter() {
            let Some(image) = item.image.as_deref().filter(|i| !i.trim().is_empty()) else {
                continue;
            };

            if !report.images.is_empty() && !self.image_delay.is_zero() {
                tokio::time::sleep(self.image_delay).await;
            }

            let url = self.resolve_image_url(image);
            let caption = format::format_image_caption(item);

            let outcome = match self.send_product_image(&url, &caption).await {
                Ok(true) => ImageOutcome::Delivered,
                Ok(false) => ImageOutcome::NotDelivered,
                Err(e) => {
                    tracing::warn!(
                        order_id = order.id,
                        item = %item.name,
                        url = %url,
                        error = %e,
                        "Failed to send product image, skipping"
                    );
                    ImageOutcome::Failed(e.to_string())
                }
            };

            report.images.push(ImageDelivery {
                item_name: item.name.clone(),
                url,
                outcome,
            });
        }

        tracing::info!(
            order_id = order.id,
            images_sent = report.delivered_images(),
            images_failed = report.failed_images(),
            "Order notification dispatched"
        );

        Ok(report)
    }
}
