//! Comparison mode
//!
//! Two panels, each with its own selection, chart and loading flag. A
//! panel's chart is fetched on its own; the other side never waits for
//! it and never sees its failures.

use crate::analysis::{
    compare, default_selections, prepare_chart, ChartView, Comparison, Selection, Side,
};
use crate::client::{ClientResult, DashboardApi, SeriesQuery};
use crate::model::{ChartData, SeriesKey, SummaryData};

/// One half of the comparison view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonPanel {
    pub selection: Selection,
    pub chart: Vec<ChartData>,
    pub loading: bool,
}

impl ComparisonPanel {
    fn with_selection(selection: Selection) -> Self {
        Self {
            selection,
            ..Default::default()
        }
    }

    pub fn chart_view(&self) -> ChartView {
        prepare_chart(&self.chart)
    }

    /// Text shown in place of an empty chart
    pub fn placeholder(&self) -> &'static str {
        if self.loading {
            "Loading..."
        } else {
            "Select an item to view chart"
        }
    }

    pub fn title(&self) -> String {
        match (self.selection.symbol(), self.selection.source_type()) {
            (Some(symbol), Some(source)) => format!("{} ({})", symbol, source),
            (None, Some(source)) => format!("({})", source),
            _ => String::new(),
        }
    }

    pub fn chart_color(&self) -> &'static str {
        self.selection
            .source_type()
            .map(|s| s.chart_color())
            .unwrap_or("#6b7280")
    }
}

/// Result of one side's chart fetch
#[derive(Debug)]
pub struct SideUpdate {
    pub side: Side,
    /// Series that was requested, which may no longer be the selection
    pub key: SeriesKey,
    pub result: ClientResult<Vec<ChartData>>,
}

/// Fetch the chart for one side
pub async fn fetch_side(
    api: &dyn DashboardApi,
    side: Side,
    key: SeriesKey,
    hours: u32,
) -> SideUpdate {
    let query = SeriesQuery::for_key(&key).hours(hours);
    tracing::debug!(side = side.as_str(), series = %key, "Fetching comparison chart");
    let result = api.chart_data(&query).await;
    SideUpdate { side, key, result }
}

/// Comparison mode state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonState {
    pub left: ComparisonPanel,
    pub right: ComparisonPanel,
}

impl ComparisonState {
    /// Open comparison mode, preselecting the first two summaries
    pub fn open(summaries: &[SummaryData]) -> Self {
        match default_selections(summaries) {
            Some((left, right)) => Self {
                left: ComparisonPanel::with_selection(left),
                right: ComparisonPanel::with_selection(right),
            },
            None => Self::default(),
        }
    }

    pub fn panel(&self, side: Side) -> &ComparisonPanel {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn panel_mut(&mut self, side: Side) -> &mut ComparisonPanel {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Relative difference of the two sides, if both resolve
    pub fn comparison(&self, summaries: &[SummaryData]) -> Option<Comparison> {
        compare(summaries, &self.left.selection, &self.right.selection)
    }

    /// Mark a side as loading and return the series to fetch for it
    ///
    /// `None` (and no loading flag) while the side's selection is incomplete.
    pub fn begin_fetch(&mut self, side: Side) -> Option<SeriesKey> {
        let panel = self.panel_mut(side);
        let key = panel.selection.key()?;
        panel.loading = true;
        Some(key)
    }

    /// Store a finished fetch
    ///
    /// There is no staleness check: whatever arrives last is shown, even
    /// when the side's selection changed while the request was in flight.
    /// A failed fetch keeps the previous chart.
    pub fn apply(&mut self, update: SideUpdate) -> ClientResult<()> {
        let panel = self.panel_mut(update.side);
        panel.loading = false;
        panel.chart = update.result?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use crate::model::SourceType;

    fn summary(source: SourceType, symbol: &str) -> SummaryData {
        SummaryData {
            source_type: source,
            symbol: symbol.to_string(),
            current_value: "10".to_string(),
            change_24h: None,
            change_24h_percent: None,
            last_updated: "2024-01-15T10:00:00Z".to_string(),
            total_data_points: 1,
        }
    }

    fn summaries() -> Vec<SummaryData> {
        vec![
            summary(SourceType::Crypto, "BTC"),
            summary(SourceType::Stock, "AAPL"),
            summary(SourceType::Crypto, "ETH"),
        ]
    }

    fn point(value: &str) -> ChartData {
        ChartData::new("2024-01-15T10:00:00Z", value, "x")
    }

    #[test]
    fn test_open_defaults() {
        let cmp = ComparisonState::open(&summaries());
        assert_eq!(
            cmp.left.selection.key(),
            Some(SeriesKey::new(SourceType::Crypto, "BTC"))
        );
        assert_eq!(
            cmp.right.selection.key(),
            Some(SeriesKey::new(SourceType::Stock, "AAPL"))
        );
        assert_eq!(cmp.left.title(), "BTC (crypto)");
        assert_eq!(cmp.right.chart_color(), "#3b82f6");

        let empty = ComparisonState::open(&summaries()[..1]);
        assert!(empty.left.selection.key().is_none());
        assert_eq!(empty.right.placeholder(), "Select an item to view chart");
        assert_eq!(empty.right.title(), "");
    }

    #[test]
    fn test_fetch_lifecycle() {
        let mut cmp = ComparisonState::open(&summaries());

        let key = cmp.begin_fetch(Side::Left).unwrap();
        assert_eq!(key.symbol, "BTC");
        assert!(cmp.left.loading);
        assert_eq!(cmp.left.placeholder(), "Loading...");
        assert!(!cmp.right.loading);

        cmp.apply(SideUpdate {
            side: Side::Left,
            key,
            result: Ok(vec![point("5")]),
        })
        .unwrap();
        assert!(!cmp.left.loading);
        assert!(!cmp.left.chart_view().is_empty());
    }

    #[test]
    fn test_failure_only_touches_its_side() {
        let mut cmp = ComparisonState::open(&summaries());
        cmp.left.chart = vec![point("1")];
        let left = cmp.begin_fetch(Side::Left).unwrap();
        cmp.begin_fetch(Side::Right).unwrap();

        let result = cmp.apply(SideUpdate {
            side: Side::Left,
            key: left,
            result: Err(ClientError::Timeout),
        });
        assert!(matches!(result, Err(ClientError::Timeout)));
        assert!(!cmp.left.loading);
        assert_eq!(cmp.left.chart.len(), 1);
        assert!(cmp.right.loading);
    }

    #[test]
    fn test_begin_fetch_requires_complete_selection() {
        let mut cmp = ComparisonState::default();
        cmp.left.selection.set_source_type(Some(SourceType::Crypto));
        assert!(cmp.begin_fetch(Side::Left).is_none());
        assert!(!cmp.left.loading);
        assert_eq!(cmp.left.title(), "(crypto)");
    }

    #[test]
    fn test_late_response_overwrites_newer_selection() {
        let mut cmp = ComparisonState::open(&summaries());
        let btc = cmp.begin_fetch(Side::Left).unwrap();

        cmp.left.selection.set_source_type(Some(SourceType::Crypto));
        cmp.left.selection.set_symbol(Some("ETH".to_string()));
        let eth = cmp.begin_fetch(Side::Left).unwrap();

        cmp.apply(SideUpdate { side: Side::Left, key: eth, result: Ok(vec![point("2500")]) })
            .unwrap();
        cmp.apply(SideUpdate { side: Side::Left, key: btc, result: Ok(vec![point("40000")]) })
            .unwrap();

        assert_eq!(cmp.left.selection.symbol(), Some("ETH"));
        assert_eq!(cmp.left.chart[0].value, "40000");
    }

    #[test]
    fn test_comparison_uses_both_selections() {
        let s = summaries();
        let mut cmp = ComparisonState::open(&s);
        assert_eq!(cmp.comparison(&s).unwrap().difference, 0.0);

        cmp.right.selection.set_source_type(None);
        assert!(cmp.comparison(&s).is_none());
    }
}
