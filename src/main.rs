mod alerts;
mod cli;
mod config;
mod error;
mod message;
mod notify;

use alerts::{HttpClient, OutboundMessage, ReqwestClient};
use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ParamsInput};
use config::{Config, RawParams};
use error::SendError;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Number of columns the metrics blob is expected to carry.
const EXPECTED_FIELDS: usize = 25;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing. stdout is reserved for the result handed to Zabbix.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Send { input, config } => match handle_send(&input, config.as_deref()).await {
            Ok(result) => {
                println!("{}", result);
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::debug!("[Telegram Webhook] notification failed: {}", e);
                eprintln!("{}", e.report());
                ExitCode::FAILURE
            }
        },
        Commands::Preview { input } => exit_with(handle_preview(&input)),
        Commands::Check { input, config } => exit_with(handle_check(&input, config.as_deref())),
    }
}

fn exit_with(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn handle_send(
    input: &ParamsInput,
    config_path: Option<&Path>,
) -> std::result::Result<&'static str, SendError> {
    let settings = load_settings(config_path).map_err(SendError::Input)?;
    let params_json = read_params(input).map_err(SendError::Input)?;

    notify::notify(&params_json, &settings, message::report_time(), |telegram| {
        let client: Arc<dyn HttpClient> = Arc::new(ReqwestClient::new(telegram)?);
        Ok(client)
    })
    .await
}

fn handle_preview(input: &ParamsInput) -> Result<()> {
    let raw = RawParams::from_json(&read_params(input)?)?;
    let parse_mode = raw.parse_mode();
    let text = message::build_alert_text(raw.message.as_ref(), parse_mode, message::report_time());

    let body = OutboundMessage {
        chat_id: raw.to.as_ref(),
        text: &text,
        disable_web_page_preview: true,
        disable_notification: false,
        parse_mode: parse_mode.map(|mode| mode.as_str()),
    };

    println!("{}", text);
    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", serde_json::to_string_pretty(&body)?);

    if raw.token.is_none() {
        tracing::warn!("Parameter \"Token\" is missing, send would fail");
    }

    Ok(())
}

fn handle_check(input: &ParamsInput, config_path: Option<&Path>) -> Result<()> {
    let settings = load_settings(config_path)?;

    println!("🔧 Settings:");
    println!("  API: {}", settings.api_base_url);
    println!("  Timeout: {}s", settings.timeout_secs);
    match &settings.proxy {
        Some(proxy) => println!("  Proxy: {}", proxy),
        None => println!("  Proxy: none"),
    }

    let raw = RawParams::from_json(&read_params(input)?)?;
    let unknown_mode = raw
        .parse_mode
        .clone()
        .filter(|_| raw.parse_mode().is_none());
    let params = raw.validate()?;
    let telegram = settings.telegram_for(&params);

    println!("\n📨 Parameters:");
    println!("  URL: {}", telegram.redacted_url());
    match &telegram.chat_id {
        Some(chat_id) => println!("  To: {}", chat_id),
        None => println!("  ⚠️  To: missing, Telegram will reject the message"),
    }
    match (&telegram.parse_mode, unknown_mode) {
        (Some(mode), _) => println!("  Parse mode: {}", mode),
        (None, Some(value)) => println!("  ⚠️  Parse mode: '{}' not recognised, sending as plain text", value),
        (None, None) => println!("  Parse mode: none"),
    }
    match &telegram.proxy {
        Some(proxy) => println!("  Proxy: {}", proxy),
        None => println!("  Proxy: none"),
    }

    match params.message.as_ref() {
        Some(Value::String(csv)) => {
            let record = message::MetricsRecord::decode(csv);
            if record.field_count() < EXPECTED_FIELDS {
                println!(
                    "  ⚠️  Message: {} fields (expected {}), missing values will be blank or 0",
                    record.field_count(),
                    EXPECTED_FIELDS
                );
            } else {
                println!("  Message: {} fields", record.field_count());
            }
            println!("    CPU: {}%  Memory: {}%", record.cpu_percent(), record.memory_percent());
            println!(
                "    Top processes: {} CPU, {} memory",
                record.top_cpu().len(),
                record.top_memory().len()
            );
        }
        Some(other) => println!(
            "  ⚠️  Message: expected a string, got {}; an error placeholder will be sent",
            other
        ),
        None => println!("  ⚠️  Message: missing, an error placeholder will be sent"),
    }

    ReqwestClient::new(&telegram).context("Failed to prepare HTTP client")?;

    println!("\n Parameters are valid!");
    Ok(())
}

fn load_settings(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path.to_str().context("Invalid config path")?)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn read_params(input: &ParamsInput) -> Result<String> {
    if let Some(path) = &input.params_file {
        return read_params_file(path);
    }

    match input.params.as_deref() {
        Some(json) if json != "-" => Ok(json.to_string()),
        _ => {
            let mut json = String::new();
            std::io::stdin()
                .read_to_string(&mut json)
                .context("Failed to read parameters from stdin")?;
            Ok(json)
        }
    }
}

fn read_params_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameters from {}", path.display()))
}
