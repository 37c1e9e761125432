mod date;
mod markup;
mod metrics;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde_json::Value;
use std::fmt::Write;

use crate::config::ParseMode;

pub use date::{format_indonesian_date, report_time};
pub use markup::escape_markup;
pub use metrics::{MetricsRecord, ProcessUsage};

/// Headline prepended to every report.
pub const HEADLINE: &str = "Terdeteksi Anomali";

/// Body used when the metrics blob cannot be turned into a report.
pub const FORMAT_ERROR: &str = "Error formatting message. Check Zabbix logs for details.";

pub const NO_MEMORY_DATA: &str = "Tidak ada data proses Memory";

/// Build the final message text: headline, report, then markup escaping
/// for `parse_mode`.
pub fn build_alert_text(
    message: Option<&Value>,
    parse_mode: Option<ParseMode>,
    now: NaiveDateTime,
) -> String {
    let text = format!("{}\n\n{}", HEADLINE, format_metrics_report(message, now));
    escape_markup(&text, parse_mode)
}

/// Render the metrics blob as the Indonesian report body. A missing or
/// non-string blob degrades to [`FORMAT_ERROR`] rather than failing the alert.
pub fn format_metrics_report(message: Option<&Value>, now: NaiveDateTime) -> String {
    match try_format(message, now) {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!("[Telegram Webhook] Error formatting message: {:#}", e);
            FORMAT_ERROR.to_string()
        }
    }
}

fn try_format(message: Option<&Value>, now: NaiveDateTime) -> Result<String> {
    let csv = message
        .context("parameter \"Message\" is missing")?
        .as_str()
        .context("parameter \"Message\" is not a string")?;
    let record = MetricsRecord::decode(csv);
    let mut out = String::new();

    writeln!(out, "{}\n", format_indonesian_date(now))?;

    writeln!(out, "Penggunaan CPU: {}%", record.cpu_percent())?;
    writeln!(out, "Penggunaan Memory: {}%\n", record.memory_percent())?;

    writeln!(out, "Penggunaan Proses Tertinggi pada CPU:")?;
    write_processes(&mut out, &record.top_cpu())?;
    writeln!(out)?;

    writeln!(out, "Penggunaan Proses Tertinggi pada Memory:")?;
    let memory = record.top_memory();
    if memory.is_empty() {
        writeln!(out, "{}", NO_MEMORY_DATA)?;
    } else {
        write_processes(&mut out, &memory)?;
    }
    writeln!(out)?;

    writeln!(out, "Jumlah koneksi aktif pada webserver: {}", record.connections())?;
    write!(
        out,
        "Jumlah permintaan per detik di webserver: {}",
        record.requests_per_sec()
    )?;

    Ok(out)
}

fn write_processes(out: &mut String, processes: &[ProcessUsage]) -> std::fmt::Result {
    for process in processes {
        writeln!(out, "{}. {} = {}%", process.rank, process.name, process.usage)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
