use super::{HttpClient, HttpRequest};
use crate::config::{ChatId, TelegramConfig};
use crate::error::SendError;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Body of a `sendMessage` call.
#[derive(Debug, Serialize)]
pub struct OutboundMessage<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<&'a ChatId>,
    pub text: &'a str,
    pub disable_web_page_preview: bool,
    pub disable_notification: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
}

impl<'a> OutboundMessage<'a> {
    pub fn new(config: &'a TelegramConfig, text: &'a str) -> Self {
        Self {
            chat_id: config.chat_id.as_ref(),
            text,
            disable_web_page_preview: true,
            disable_notification: false,
            parse_mode: config.parse_mode.map(|mode| mode.as_str()),
        }
    }
}

pub struct TelegramSender {
    config: TelegramConfig,
    client: Arc<dyn HttpClient>,
}

impl TelegramSender {
    pub fn new(config: TelegramConfig, client: Arc<dyn HttpClient>) -> Self {
        Self { config, client }
    }

    /// Post `text` to the configured chat. One attempt, no retries.
    ///
    /// Succeeds only on HTTP 200 with `"ok": true` in the response.
    pub async fn send_message(&self, text: &str) -> Result<(), SendError> {
        let body = serde_json::to_string(&OutboundMessage::new(&self.config, text))?;

        tracing::debug!("[Telegram Webhook] URL: {}", self.config.redacted_url());
        tracing::debug!("[Telegram Webhook] params: {}", body);

        let reply = self
            .client
            .post(HttpRequest {
                url: self.config.send_message_url(),
                headers: vec![("Content-Type".to_string(), "application/json".to_string())],
                body,
            })
            .await?;

        tracing::debug!(
            "[Telegram Webhook] HTTP code: {} (via {})",
            reply.status,
            self.client.name()
        );

        // an unparseable body counts as an empty response
        let response: Value = serde_json::from_str(&reply.body).unwrap_or(Value::Null);

        if reply.status == 200 && response.get("ok") == Some(&Value::Bool(true)) {
            tracing::info!("Sent Telegram message to chat {}", self.chat_label());
            return Ok(());
        }

        match response.get("description").and_then(Value::as_str) {
            Some(description) => Err(SendError::Api(description.to_string())),
            None => Err(SendError::Unknown),
        }
    }

    fn chat_label(&self) -> String {
        self.config
            .chat_id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "<none>".to_string())
    }
}
