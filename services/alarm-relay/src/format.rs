//! Rendering of alarm readings into Telegram MarkdownV2 text

use chrono::NaiveDateTime;

use crate::alarm::{AlarmReading, Lane, Scalar, NOT_AVAILABLE};

/// Characters MarkdownV2 treats as markup
const MARKDOWN_SPECIAL: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

const DATE_WITH_FRACTION: &str = "%Y-%m-%dT%H:%M:%S%.fZ";
const DATE_WITHOUT_FRACTION: &str = "%Y-%m-%dT%H:%M:%SZ";
const DATE_DISPLAY: &str = "%d %B %Y %H:%M:%S";

/// Prefix every MarkdownV2 special character with a backslash.
///
/// Not idempotent: escaping an already escaped string escapes it again.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Render a lane as `"A-1"` when it has exactly two parts, otherwise unchanged
pub fn format_lane(lane: Option<&Lane>) -> String {
    match lane {
        None => NOT_AVAILABLE.to_string(),
        Some(Lane::Raw(raw)) => raw.to_string(),
        Some(Lane::Parts(parts)) => match parts.as_slice() {
            [first, second] => format!("{}-{}", first, second),
            [only] => only.to_string(),
            _ => list_repr(parts),
        },
    }
}

fn list_repr(parts: &[Scalar]) -> String {
    let items: Vec<String> = parts
        .iter()
        .map(|part| match part {
            Scalar::Text(s) => serde_json::Value::String(s.clone()).to_string(),
            Scalar::Number(n) => n.to_string(),
        })
        .collect();
    format!("[{}]", items.join(","))
}

/// Reformat an ISO-8601 `Z` timestamp as `01 March 2024 10:00:00`.
///
/// Anything that does not parse is returned unchanged.
pub fn format_send_date(raw: &str) -> String {
    let pattern = if raw.contains('.') {
        DATE_WITH_FRACTION
    } else {
        DATE_WITHOUT_FRACTION
    };
    match NaiveDateTime::parse_from_str(raw, pattern) {
        Ok(parsed) => parsed.format(DATE_DISPLAY).to_string(),
        Err(e) => {
            tracing::debug!("Keeping raw send_date '{}': {}", raw, e);
            raw.to_string()
        }
    }
}

/// Upper-case the first character and lower-case the rest
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Build the notification text for one reading
pub fn render_alarm(site_name: &str, reading: &AlarmReading) -> String {
    let name = reading
        .name
        .as_deref()
        .map_or_else(|| NOT_AVAILABLE.to_string(), capitalize);
    let lane = format_lane(reading.lane.as_ref());
    let value = reading
        .value
        .as_ref()
        .map_or_else(|| NOT_AVAILABLE.to_string(), ToString::to_string);
    let status = reading.status.as_deref().unwrap_or(NOT_AVAILABLE);
    let date = reading
        .send_date
        .as_deref()
        .map_or_else(|| NOT_AVAILABLE.to_string(), format_send_date);
    let location = reading
        .location
        .as_ref()
        .map_or_else(|| NOT_AVAILABLE.to_string(), ToString::to_string);

    let mut text = String::from("🚨*Alarm Detected*\n\n");
    text.push_str(&format!("{:<10}: {}\n", "Name", escape_markdown(&name)));
    text.push_str(&format!("{:<13}: {}\n", "Line", escape_markdown(&lane)));
    text.push_str(&format!("{:<11}: {} Volt\n", "Value", escape_markdown(&value)));
    text.push_str(&format!("{:<11}: {} 🔴\n", "Status", escape_markdown(status)));
    text.push_str(&format!("{:<12}: {}\n", "Date", escape_markdown(&date)));
    text.push_str(&format!(
        "{:<9}: {} \\- {}\n",
        "Location",
        escape_markdown(site_name),
        escape_markdown(&location)
    ));
    text
}
