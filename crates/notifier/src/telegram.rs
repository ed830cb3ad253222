//! Telegram Bot API client.
//!
//! Only the two calls the dispatcher needs are implemented: `sendMessage` and
//! `sendPhoto`, both with HTML parse mode.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use shopfront_common::config::NotifierConfig;

use crate::error::{NotifyError, Result};

const PARSE_MODE_HTML: &str = "HTML";

/// A chat destination that can receive text messages and photos.
///
/// Sends resolve to `Ok(false)` when the channel is not configured, without
/// touching the network.
pub trait ChatChannel: Send + Sync {
    /// Whether sends will actually be attempted.
    fn is_configured(&self) -> bool;

    fn send_message(&self, text: &str) -> impl Future<Output = Result<bool>> + Send;

    fn send_photo(&self, photo_url: &str, caption: &str)
    -> impl Future<Output = Result<bool>> + Send;
}

#[derive(Clone)]
struct Credentials {
    bot_token: String,
    chat_id: String,
}

/// HTTPS client for a single Telegram chat.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    api_url: String,
    credentials: Option<Credentials>,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Debug, Serialize)]
struct SendPhotoRequest<'a> {
    chat_id: &'a str,
    photo: &'a str,
    caption: &'a str,
    parse_mode: &'static str,
}

/// Envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl ApiResponse {
    fn into_result(self) -> Result<()> {
        if self.ok {
            Ok(())
        } else {
            Err(NotifyError::Provider {
                description: self
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            })
        }
    }
}

impl TelegramClient {
    /// Build a client with the configured per-request timeout.
    pub fn from_config(config: &NotifierConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| NotifyError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let credentials = match (&config.telegram_bot_token, &config.telegram_chat_id) {
            (Some(bot_token), Some(chat_id)) => Some(Credentials {
                bot_token: bot_token.clone(),
                chat_id: chat_id.clone(),
            }),
            _ => None,
        };

        Ok(Self {
            http,
            api_url: config.telegram_api_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn endpoint(&self, bot_token: &str, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, bot_token, method)
    }

    fn credentials_or_warn(&self) -> Option<&Credentials> {
        if self.credentials.is_none() {
            tracing::warn!("Telegram credentials not configured, skipping send");
        }
        self.credentials.as_ref()
    }

    /// POST a Bot API method and check the `ok` flag of the answer.
    async fn call<B: Serialize>(&self, bot_token: &str, method: &str, body: &B) -> Result<()> {
        let response = self
            .http
            .post(self.endpoint(bot_token, method))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let api_response: ApiResponse = response.json().await?;
        tracing::debug!(method, status = status.as_u16(), ok = api_response.ok, "Telegram API answered");

        api_response.into_result()
    }
}

impl ChatChannel for TelegramClient {
    fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    async fn send_message(&self, text: &str) -> Result<bool> {
        let Some(creds) = self.credentials_or_warn() else {
            return Ok(false);
        };

        let body = SendMessageRequest {
            chat_id: &creds.chat_id,
            text,
            parse_mode: PARSE_MODE_HTML,
        };
        self.call(&creds.bot_token, "sendMessage", &body).await?;

        tracing::info!(chat_id = %creds.chat_id, "Telegram message sent");
        Ok(true)
    }

    async fn send_photo(&self, photo_url: &str, caption: &str) -> Result<bool> {
        let Some(creds) = self.credentials_or_warn() else {
            return Ok(false);
        };

        let body = SendPhotoRequest {
            chat_id: &creds.chat_id,
            photo: photo_url,
            caption,
            parse_mode: PARSE_MODE_HTML,
        };
        self.call(&creds.bot_token, "sendPhoto", &body).await?;

        tracing::info!(chat_id = %creds.chat_id, photo_url, "Telegram photo sent");
        Ok(true)
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("api_url", &self.api_url)
            .field("configured", &self.credentials.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> NotifierConfig {
        NotifierConfig {
            telegram_bot_token: Some("123:secret".to_string()),
            telegram_chat_id: Some("-1001".to_string()),
            telegram_api_url: "https://api.telegram.org/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint_format() {
        let client = TelegramClient::from_config(&configured()).unwrap();
        assert_eq!(
            client.endpoint("123:secret", "sendMessage"),
            "https://api.telegram.org/bot123:secret/sendMessage"
        );
    }

    #[test]
    fn test_send_message_body_shape() {
        let body = SendMessageRequest {
            chat_id: "-1001",
            text: "<b>hi</b>",
            parse_mode: PARSE_MODE_HTML,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "chat_id": "-1001", "text": "<b>hi</b>", "parse_mode": "HTML" })
        );
    }

    #[test]
    fn test_send_photo_body_shape() {
        let body = SendPhotoRequest {
            chat_id: "-1001",
            photo: "https://shop.example/img/a.png",
            caption: "cap",
            parse_mode: PARSE_MODE_HTML,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "chat_id": "-1001",
                "photo": "https://shop.example/img/a.png",
                "caption": "cap",
                "parse_mode": "HTML"
            })
        );
    }

    #[test]
    fn test_api_response_failure_carries_description() {
        let response: ApiResponse = serde_json::from_str(
            r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#,
        )
        .unwrap();
        match response.into_result() {
            Err(NotifyError::Provider { description }) => {
                assert_eq!(description, "Bad Request: chat not found")
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[test]
    fn test_api_response_failure_without_description() {
        let response: ApiResponse = serde_json::from_str(r#"{"ok":false}"#).unwrap();
        assert!(matches!(
            response.into_result(),
            Err(NotifyError::Provider { description }) if description == "unknown error"
        ));
    }

    #[test]
    fn test_api_response_success() {
        let response: ApiResponse =
            serde_json::from_str(r#"{"ok":true,"result":{"message_id":5}}"#).unwrap();
        assert!(response.into_result().is_ok());
    }

    #[tokio::test]
    async fn test_unconfigured_client_is_noop() {
        let client = TelegramClient::from_config(&NotifierConfig::default()).unwrap();
        assert!(!client.is_configured());
        assert!(!client.send_message("hello").await.unwrap());
        assert!(!client.send_photo("https://x/y.png", "cap").await.unwrap());
    }

    #[test]
    fn test_debug_hides_token() {
        let client = TelegramClient::from_config(&configured()).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("configured: true"));
    }
}
