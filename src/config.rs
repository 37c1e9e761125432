use crate::error::SendError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Telegram rendering mode for message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Markdown,
    MarkdownV2,
    Html,
}

impl ParseMode {
    /// Case-insensitive lookup; anything unrecognised yields `None`.
    pub fn from_param(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "markdown" => Some(ParseMode::Markdown),
            "markdownv2" => Some(ParseMode::MarkdownV2),
            "html" => Some(ParseMode::Html),
            _ => None,
        }
    }

    /// Value sent in the `parse_mode` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Markdown => "markdown",
            ParseMode::MarkdownV2 => "markdownv2",
            ParseMode::Html => "html",
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Telegram chat identifier. Zabbix substitutes `{ALERT.SENDTO}` either as a
/// bare number or as a quoted string, both are passed through untouched.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ChatId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatId::Numeric(id) => write!(f, "{}", id),
            ChatId::Text(id) => f.write_str(id),
        }
    }
}

/// Parameter object as Zabbix hands it over, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawParams {
    #[serde(rename = "Token")]
    pub token: Option<String>,
    #[serde(rename = "To")]
    pub to: Option<ChatId>,
    /// Kept untyped: a non-string blob degrades the report instead of
    /// rejecting the whole invocation.
    #[serde(rename = "Message")]
    pub message: Option<Value>,
    #[serde(rename = "HTTPProxy")]
    pub http_proxy: Option<String>,
    #[serde(rename = "ParseMode")]
    pub parse_mode: Option<String>,
}

impl RawParams {
    pub fn from_json(json: &str) -> Result<Self, SendError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse mode when the supplied value is one Telegram understands.
    pub fn parse_mode(&self) -> Option<ParseMode> {
        self.parse_mode.as_deref().and_then(ParseMode::from_param)
    }

    /// Check the required fields and normalise the optional ones.
    pub fn validate(self) -> Result<AlertParams, SendError> {
        let parse_mode = self.parse_mode();
        let token = self.token.ok_or(SendError::MissingToken)?;

        Ok(AlertParams {
            token,
            chat_id: self.to,
            message: self.message,
            proxy: self.http_proxy.filter(|proxy| !proxy.is_empty()),
            parse_mode,
        })
    }
}

/// Validated parameters of a single alert.
#[derive(Debug, Clone)]
pub struct AlertParams {
    pub token: String,
    pub chat_id: Option<ChatId>,
    /// Raw metrics blob. Missing or non-string values degrade the message
    /// instead of failing.
    pub message: Option<Value>,
    pub proxy: Option<String>,
    pub parse_mode: Option<ParseMode>,
}

/// Deployment-wide defaults loaded from an optional YAML file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Used when the alert itself carries no `HTTPProxy`.
    #[serde(default)]
    pub proxy: Option<String>,
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout(),
            proxy: None,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            anyhow::bail!(
                "api_base_url must start with http:// or https:// (got '{}')",
                self.api_base_url
            );
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Combine these defaults with one alert's parameters.
    pub fn telegram_for(&self, params: &AlertParams) -> TelegramConfig {
        TelegramConfig {
            api_base_url: self.api_base_url.trim_end_matches('/').to_string(),
            token: params.token.clone(),
            chat_id: params.chat_id.clone(),
            proxy: params
                .proxy
                .clone()
                .or_else(|| self.proxy.clone().filter(|proxy| !proxy.is_empty())),
            parse_mode: params.parse_mode,
            timeout: self.timeout(),
        }
    }
}

/// Everything the sender needs for one `sendMessage` call. Built once per
/// invocation and never mutated.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub api_base_url: String,
    pub token: String,
    pub chat_id: Option<ChatId>,
    pub proxy: Option<String>,
    pub parse_mode: Option<ParseMode>,
    pub timeout: Duration,
}

impl TelegramConfig {
    pub fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base_url, self.token)
    }

    /// URL safe for logging, with the bot token masked.
    pub fn redacted_url(&self) -> String {
        let url = self.send_message_url();
        if self.token.is_empty() {
            return url;
        }
        url.replacen(&self.token, "<TOKEN>", 1)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
