//! Core data types for the DataDash client
//!
//! This module defines the records exchanged with the backend:
//! - `DataPoint`: A single raw observation
//! - `SummaryData`: Latest known state per (source, symbol)
//! - `ChartData`: One plotted point of a chart series
//! - `Alert`, `NewAlert`, `AlertUpdate`: Threshold rules and their write bodies
//!
//! Numeric values cross the wire as strings and are kept that way here;
//! see [`super::parse`] for the client-side parsing rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::parse::{parse_timestamp, parse_value};

/// Category partitioning all observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Crypto,
    Stock,
    Weather,
    Currency,
}

impl SourceType {
    /// All source types in display order
    pub const ALL: [SourceType; 4] = [
        SourceType::Crypto,
        SourceType::Stock,
        SourceType::Weather,
        SourceType::Currency,
    ];

    /// Wire name (lower-case)
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Crypto => "crypto",
            SourceType::Stock => "stock",
            SourceType::Weather => "weather",
            SourceType::Currency => "currency",
        }
    }

    /// Human-readable label used on summary cards
    pub fn label(&self) -> &'static str {
        match self {
            SourceType::Crypto => "Cryptocurrency",
            SourceType::Stock => "Stock",
            SourceType::Weather => "Weather",
            SourceType::Currency => "Currency",
        }
    }

    /// Capitalised wire name ("Crypto", "Stock", ...) used in titles
    pub fn title(&self) -> &'static str {
        match self {
            SourceType::Crypto => "Crypto",
            SourceType::Stock => "Stock",
            SourceType::Weather => "Weather",
            SourceType::Currency => "Currency",
        }
    }

    /// Series colour for charts of this source
    pub fn chart_color(&self) -> &'static str {
        match self {
            SourceType::Crypto => "#f59e0b",
            SourceType::Stock => "#3b82f6",
            SourceType::Weather => "#10b981",
            SourceType::Currency => "#8b5cf6",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "crypto" => Ok(SourceType::Crypto),
            "stock" => Ok(SourceType::Stock),
            "weather" => Ok(SourceType::Weather),
            "currency" => Ok(SourceType::Currency),
            other => Err(format!(
                "Unknown source type: {}. Use: crypto, stock, weather, currency",
                other
            )),
        }
    }
}

/// Identity of a tracked series: (source type, symbol)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    pub source_type: SourceType,
    pub symbol: String,
}

impl SeriesKey {
    pub fn new(source_type: SourceType, symbol: impl Into<String>) -> Self {
        Self {
            source_type,
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol, self.source_type)
    }
}

/// A single raw observation as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataPoint {
    pub id: i64,
    pub timestamp: String,
    /// Decimal value, string-encoded
    pub value: String,
    pub source_type: SourceType,
    pub symbol: String,
    /// Additional provider data (price, volume, conditions, ...)
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    pub created_at: String,
}

impl DataPoint {
    /// Parsed value; `NaN` when the wire string is not numeric
    pub fn value_f64(&self) -> f64 {
        parse_value(&self.value)
    }

    /// Parsed observation time
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }

    pub fn key(&self) -> SeriesKey {
        SeriesKey::new(self.source_type, self.symbol.clone())
    }
}

/// Latest known state of one (source type, symbol) pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryData {
    pub source_type: SourceType,
    pub symbol: String,
    pub current_value: String,
    /// Absolute 24h change; null when there is not enough history
    #[serde(default)]
    pub change_24h: Option<String>,
    /// Percent 24h change; null when there is not enough history
    #[serde(default)]
    pub change_24h_percent: Option<String>,
    pub last_updated: String,
    #[serde(default)]
    pub total_data_points: u64,
}

impl SummaryData {
    pub fn key(&self) -> SeriesKey {
        SeriesKey::new(self.source_type, self.symbol.clone())
    }

    /// Check whether this summary belongs to the given series
    pub fn matches(&self, key: &SeriesKey) -> bool {
        self.source_type == key.source_type && self.symbol == key.symbol
    }

    pub fn current_value_f64(&self) -> f64 {
        parse_value(&self.current_value)
    }

    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.last_updated)
    }
}

/// One plotted point as returned by the chart endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartData {
    pub timestamp: String,
    pub value: String,
    #[serde(default)]
    pub label: String,
}

impl ChartData {
    pub fn new(
        timestamp: impl Into<String>,
        value: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Threshold condition of an alert rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCondition {
    Above,
    Below,
    ChangeUp,
    ChangeDown,
}

impl AlertCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCondition::Above => "above",
            AlertCondition::Below => "below",
            AlertCondition::ChangeUp => "change_up",
            AlertCondition::ChangeDown => "change_down",
        }
    }
}

impl fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for AlertCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "above" => Ok(AlertCondition::Above),
            "below" => Ok(AlertCondition::Below),
            "change_up" => Ok(AlertCondition::ChangeUp),
            "change_down" => Ok(AlertCondition::ChangeDown),
            other => Err(format!(
                "Unknown alert condition: {}. Use: above, below, change_up, change_down",
                other
            )),
        }
    }
}

/// A threshold rule held by the backend
///
/// Alerts are never evaluated client-side; they are only listed,
/// created, updated and deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub id: i64,
    pub source_type: SourceType,
    pub symbol: String,
    pub condition: AlertCondition,
    pub threshold_value: String,
    pub is_active: bool,
    /// Notification target
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub last_triggered: Option<String>,
    pub created_at: String,
}

/// Body for creating an alert (server assigns id and timestamps)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAlert {
    pub source_type: SourceType,
    pub symbol: String,
    pub condition: AlertCondition,
    pub threshold_value: String,
    pub is_active: bool,
    pub email: String,
}

impl NewAlert {
    pub fn new(
        source_type: SourceType,
        symbol: impl Into<String>,
        condition: AlertCondition,
        threshold_value: impl Into<String>,
    ) -> Self {
        Self {
            source_type,
            symbol: symbol.into(),
            condition,
            threshold_value: threshold_value.into(),
            is_active: true,
            email: String::new(),
        }
    }

    /// Builder method: set notification target
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Builder method: create the alert disabled
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Partial update body; only fields that are set are sent
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AlertUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<AlertCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AlertUpdate {
    pub fn is_empty(&self) -> bool {
        self == &AlertUpdate::default()
    }
}

/// List envelope returned by the paginated endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paginated<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}
