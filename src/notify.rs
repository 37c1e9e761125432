use crate::alerts::{HttpClient, TelegramSender};
use crate::config::{Config, RawParams, TelegramConfig};
use crate::error::SendError;
use crate::message;
use chrono::NaiveDateTime;
use std::sync::Arc;

/// Value handed back to Zabbix when the message was accepted.
pub const SUCCESS: &str = "OK";

/// Run one alert end to end: validate `params_json`, build the report and
/// post it through the client produced by `connect`.
///
/// The token is checked before `connect` is called, so a bad invocation never
/// touches the network.
pub async fn notify<F>(
    params_json: &str,
    settings: &Config,
    now: NaiveDateTime,
    connect: F,
) -> Result<&'static str, SendError>
where
    F: FnOnce(&TelegramConfig) -> Result<Arc<dyn HttpClient>, SendError>,
{
    let params = RawParams::from_json(params_json)?.validate()?;
    let telegram = settings.telegram_for(&params);

    let text = message::build_alert_text(params.message.as_ref(), params.parse_mode, now);

    let client = connect(&telegram)?;
    TelegramSender::new(telegram, client).send_message(&text).await?;

    Ok(SUCCESS)
}
