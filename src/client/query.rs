//! Query-string filters for the list endpoints

use serde::Serialize;

use crate::model::{SeriesKey, SourceType};

/// Filter shared by the data point list and chart endpoints
///
/// Unset fields are left out of the query string entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Lookback window in hours
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<u32>,
}

impl SeriesQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter for exactly one series
    pub fn for_key(key: &SeriesKey) -> Self {
        Self {
            source_type: Some(key.source_type),
            symbol: Some(key.symbol.clone()),
            hours: None,
        }
    }

    pub fn source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = Some(source_type);
        self
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn hours(mut self, hours: u32) -> Self {
        self.hours = Some(hours);
        self
    }
}

/// Filter for the alert list endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl AlertQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = Some(source_type);
        self
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}
