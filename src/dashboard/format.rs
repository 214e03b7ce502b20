//! Display formatting
//!
//! Every formatter takes the raw wire string and falls back to showing it
//! unchanged when it does not parse; nothing here fails.

use crate::model::{parse_timestamp, parse_value, SourceType};

/// Direction of a 24h change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    /// Classify a change percent; missing or unparsable counts as flat
    pub fn from_percent(percent: Option<&str>) -> Self {
        match percent.map(parse_value) {
            Some(p) if p > 0.0 => Trend::Up,
            Some(p) if p < 0.0 => Trend::Down,
            _ => Trend::Flat,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "▲",
            Trend::Down => "▼",
            Trend::Flat => "–",
        }
    }
}

/// Current value with the unit convention of its source
pub fn format_current_value(source_type: SourceType, raw: &str) -> String {
    let value = parse_value(raw);
    if !value.is_finite() {
        return raw.to_string();
    }

    match source_type {
        SourceType::Crypto | SourceType::Currency => format!("${:.4}", value),
        SourceType::Stock => format!("${:.2}", value),
        SourceType::Weather => format!("{:.1}°C", value),
    }
}

/// A change field counts as absent when missing or empty
fn present(raw: Option<&str>) -> Option<&str> {
    raw.filter(|r| !r.is_empty())
}

/// 24h change percent, `N/A` when the backend had no history
pub fn format_change_percent(raw: Option<&str>) -> String {
    match present(raw) {
        None => "N/A".to_string(),
        Some(raw) => {
            let value = parse_value(raw);
            if value.is_finite() {
                format!("{:.2}%", value)
            } else {
                raw.to_string()
            }
        }
    }
}

/// Absolute 24h change with explicit sign, e.g. `(+120.5000)`
pub fn format_change_abs(raw: Option<&str>) -> Option<String> {
    let raw = present(raw)?;
    let value = parse_value(raw);
    if !value.is_finite() {
        return Some(format!("({})", raw));
    }
    let sign = if value > 0.0 { "+" } else { "" };
    Some(format!("({}{:.4})", sign, value))
}

/// Y-axis tick label
pub fn format_axis_tick(value: f64) -> String {
    if value >= 1000.0 {
        format!("{:.1}k", value / 1000.0)
    } else if value > 1.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.6}", value)
    }
}

/// Tooltip value label
pub fn format_tooltip_value(value: f64) -> String {
    format!("{:.6}", value)
}

fn format_time(raw: &str, pattern: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// X-axis tick label (`HH:MM`, UTC)
pub fn format_time_tick(raw: &str) -> String {
    format_time(raw, "%H:%M")
}

/// Tooltip time label (`Jan 15, 10:30:00`)
pub fn format_tooltip_time(raw: &str) -> String {
    format_time(raw, "%b %d, %H:%M:%S")
}

/// "Updated" line on a summary card (`Jan 15, 10:30`)
pub fn format_updated_at(raw: &str) -> String {
    format_time(raw, "%b %d, %H:%M")
}
