use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use regex::Regex;

/// Placeholder embedded in the message when a date cannot be rendered.
pub const INVALID_DATE: &str = "Tanggal tidak valid";

/// Fixed offset used for the report timestamp (WIB).
pub const UTC_OFFSET_HOURS: i64 = 7;

const MONTHS: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni",
    "Juli", "Agustus", "September", "Oktober", "November", "Desember",
];

/// Something that can be rendered as an Indonesian date.
#[derive(Debug, Clone)]
pub enum DateInput<'a> {
    /// Wall-clock time, rendered as is.
    Moment(NaiveDateTime),
    /// Free text, parsed on a best-effort basis.
    Text(&'a str),
}

impl From<NaiveDateTime> for DateInput<'_> {
    fn from(moment: NaiveDateTime) -> Self {
        DateInput::Moment(moment)
    }
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(text: &'a str) -> Self {
        DateInput::Text(text)
    }
}

/// Current UTC time shifted by the fixed report offset.
pub fn report_time() -> NaiveDateTime {
    (Utc::now() + chrono::Duration::hours(UTC_OFFSET_HOURS)).naive_utc()
}

/// Render `input` as `D Month YYYY, HH:MM`.
///
/// Text that does not parse falls back to the first
/// `YYYY-MM-DD[T ]HH:MM:SS` found in it, then to the current time. Never
/// fails: anything that goes wrong on the way yields [`INVALID_DATE`].
pub fn format_indonesian_date<'a>(input: impl Into<DateInput<'a>>) -> String {
    match resolve(input.into()) {
        Ok(moment) => render(&moment),
        Err(e) => {
            tracing::warn!("[Telegram Webhook] Error formatting date: {:#}", e);
            INVALID_DATE.to_string()
        }
    }
}

fn render(moment: &NaiveDateTime) -> String {
    format!(
        "{} {} {}, {:02}:{:02}",
        moment.day(),
        MONTHS[moment.month0() as usize],
        moment.year(),
        moment.hour(),
        moment.minute()
    )
}

fn resolve(input: DateInput<'_>) -> Result<NaiveDateTime> {
    match input {
        DateInput::Moment(moment) => Ok(moment),
        DateInput::Text(text) => {
            if let Some(moment) = parse_native(text) {
                return Ok(moment);
            }
            match extract_timestamp(text)? {
                Some(moment) => Ok(moment),
                None => Ok(Utc::now().naive_utc()),
            }
        }
    }
}

fn parse_native(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(moment) = NaiveDateTime::parse_from_str(text, format) {
            return Some(moment);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Look for an embedded timestamp. `Ok(None)` means there is none.
///
/// Out of range parts roll over into the next unit the way the JavaScript
/// `Date` constructor does, so `2024-13-40` lands on 9 February 2025.
fn extract_timestamp(text: &str) -> Result<Option<NaiveDateTime>> {
    let re = Regex::new(r"([0-9]{4})-([0-9]{2})-([0-9]{2})[T\s]([0-9]{2}):([0-9]{2}):([0-9]{2})")?;

    let Some(caps) = re.captures(text) else {
        return Ok(None);
    };

    let part = |i: usize| -> Result<i64> {
        caps[i]
            .parse::<i64>()
            .with_context(|| format!("invalid number '{}'", &caps[i]))
    };

    let mut year = part(1)?;
    // two-digit years belong to the 1900s
    if (0..=99).contains(&year) {
        year += 1900;
    }

    let months = year * 12 + part(2)? - 1;
    let offset = chrono::Duration::days(part(3)? - 1)
        + chrono::Duration::hours(part(4)?)
        + chrono::Duration::minutes(part(5)?)
        + chrono::Duration::seconds(part(6)?);

    let moment = i32::try_from(months.div_euclid(12))
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, months.rem_euclid(12) as u32 + 1, 1))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|start| start.checked_add_signed(offset))
        .with_context(|| format!("out of range timestamp '{}'", &caps[0]))?;

    Ok(Some(moment))
}
