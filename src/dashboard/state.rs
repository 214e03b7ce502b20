//! Dashboard view state
//!
//! Plain data: what the view shows right now and the selections that
//! produced it. Mutated by [`super::Dashboard`], read by renderers.

use chrono::{DateTime, Utc};

use super::comparison::ComparisonState;
use crate::analysis::{self, prepare_chart, ChartView, Comparison};
use crate::model::{ChartData, SourceType, SummaryData};

/// Chart colour when no single source is selected
pub const DEFAULT_CHART_COLOR: &str = "#3b82f6";

/// Source / symbol filter of the normal view; `None` means "all"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardFilter {
    source: Option<SourceType>,
    symbol: Option<String>,
}

impl DashboardFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> Option<SourceType> {
        self.source
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    /// Select a source; the symbol goes back to "all"
    pub fn set_source(&mut self, source: Option<SourceType>) {
        self.source = source;
        self.symbol = None;
    }

    pub fn set_symbol(&mut self, symbol: Option<String>) {
        self.symbol = symbol.filter(|s| !s.is_empty());
    }

    pub fn matches(&self, summary: &SummaryData) -> bool {
        self.source.map_or(true, |s| summary.source_type == s)
            && self.symbol.as_deref().map_or(true, |s| summary.symbol == s)
    }
}

/// Headline numbers above the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverviewStats {
    pub total_data_points: u64,
    pub active_sources: usize,
    pub tracked_symbols: usize,
    pub chart_points: usize,
}

/// Everything the dashboard view renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    /// Reconciled summaries
    pub summaries: Vec<SummaryData>,
    /// Raw series for the trend chart
    pub chart: Vec<ChartData>,
    pub filter: DashboardFilter,
    pub loading: bool,
    pub last_updated: Option<DateTime<Utc>>,
    /// `Some` while in comparison mode
    pub comparison: Option<ComparisonState>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_comparison_mode(&self) -> bool {
        self.comparison.is_some()
    }

    /// Comparison needs two distinct series to pick from
    pub fn can_compare(&self) -> bool {
        self.summaries.len() >= 2
    }

    /// Source filter choices (besides "all"), in summary order
    pub fn source_options(&self) -> Vec<SourceType> {
        analysis::source_options(&self.summaries)
    }

    /// Symbol filter choices (besides "all") for the selected source
    pub fn symbol_options(&self) -> Vec<String> {
        let mut symbols: Vec<String> = Vec::new();
        for summary in &self.summaries {
            if self.filter.source().map_or(true, |s| summary.source_type == s)
                && !symbols.contains(&summary.symbol)
            {
                symbols.push(summary.symbol.clone());
            }
        }
        symbols
    }

    /// Summary cards that pass the filter
    pub fn filtered_summaries(&self) -> Vec<&SummaryData> {
        self.summaries
            .iter()
            .filter(|s| self.filter.matches(s))
            .collect()
    }

    /// Overview numbers; computed over all summaries, not the filter
    pub fn stats(&self) -> OverviewStats {
        OverviewStats {
            total_data_points: self.summaries.iter().map(|s| s.total_data_points).sum(),
            active_sources: self.source_options().len(),
            tracked_symbols: self.summaries.len(),
            chart_points: self.chart.len(),
        }
    }

    pub fn chart_view(&self) -> ChartView {
        prepare_chart(&self.chart)
    }

    /// e.g. "All Data Trend (24h)" or "Crypto - BTC Trend (24h)"
    pub fn chart_title(&self, hours: u32) -> String {
        let mut title = match self.filter.source() {
            Some(source) => source.title().to_string(),
            None => "All Data".to_string(),
        };
        if let Some(symbol) = self.filter.symbol() {
            title.push_str(" - ");
            title.push_str(symbol);
        }
        title.push_str(&format!(" Trend ({}h)", hours));
        title
    }

    pub fn chart_color(&self) -> &'static str {
        self.filter
            .source()
            .map(|s| s.chart_color())
            .unwrap_or(DEFAULT_CHART_COLOR)
    }

    /// Comparison of the selected sides, when in comparison mode
    pub fn comparison_result(&self) -> Option<Comparison> {
        self.comparison.as_ref()?.comparison(&self.summaries)
    }
}
