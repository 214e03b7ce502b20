//! Comparison Engine (pure part)
//!
//! Selection state for the two comparison sides and the relative
//! difference between their current values. The fetch orchestration that
//! drives the per-side charts lives in [`crate::dashboard::comparison`].

use serde::Serialize;

use crate::model::{SeriesKey, SourceType, SummaryData};

/// Which half of the comparison view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// One side's selection: a source type, then a symbol within it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    source_type: Option<SourceType>,
    symbol: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully resolved selection
    pub fn of(key: &SeriesKey) -> Self {
        Self {
            source_type: Some(key.source_type),
            symbol: Some(key.symbol.clone()),
        }
    }

    pub fn source_type(&self) -> Option<SourceType> {
        self.source_type
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    /// Choose a source type; always clears the symbol
    pub fn set_source_type(&mut self, source_type: Option<SourceType>) {
        self.source_type = source_type;
        self.symbol = None;
    }

    /// Choose a symbol; ignored (returns false) until a source is chosen
    pub fn set_symbol(&mut self, symbol: Option<String>) -> bool {
        if self.source_type.is_none() {
            return false;
        }
        self.symbol = symbol.filter(|s| !s.is_empty());
        true
    }

    /// The series this selection points at, if complete
    pub fn key(&self) -> Option<SeriesKey> {
        match (self.source_type, &self.symbol) {
            (Some(source_type), Some(symbol)) => Some(SeriesKey::new(source_type, symbol.clone())),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.key().is_some()
    }
}

/// Relative comparison of two current values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    pub left_value: f64,
    pub right_value: f64,
    /// left - right
    pub difference: f64,
    /// difference / right * 100; not guarded against right == 0
    pub percent_difference: f64,
    /// difference > 0
    pub is_higher: bool,
}

impl Comparison {
    /// Compare two summaries' current values
    pub fn between(left: &SummaryData, right: &SummaryData) -> Self {
        let left_value = left.current_value_f64();
        let right_value = right.current_value_f64();
        let difference = left_value - right_value;
        let percent_difference = (difference / right_value) * 100.0;

        Self {
            left_value,
            right_value,
            difference,
            percent_difference,
            is_higher: difference > 0.0,
        }
    }
}

/// Find the summary for a series
pub fn find_summary<'a>(summaries: &'a [SummaryData], key: &SeriesKey) -> Option<&'a SummaryData> {
    summaries.iter().find(|s| s.matches(key))
}

/// Compare two selections against the reconciled summaries
///
/// `None` when either side is incomplete or has no matching summary.
pub fn compare(
    summaries: &[SummaryData],
    left: &Selection,
    right: &Selection,
) -> Option<Comparison> {
    let left = find_summary(summaries, &left.key()?)?;
    let right = find_summary(summaries, &right.key()?)?;
    Some(Comparison::between(left, right))
}

/// Distinct source types in summary order
pub fn source_options(summaries: &[SummaryData]) -> Vec<SourceType> {
    let mut seen = Vec::new();
    for summary in summaries {
        if !seen.contains(&summary.source_type) {
            seen.push(summary.source_type);
        }
    }
    seen
}

/// Symbols available for a source type, in summary order
pub fn symbol_options(summaries: &[SummaryData], source_type: SourceType) -> Vec<String> {
    summaries
        .iter()
        .filter(|s| s.source_type == source_type)
        .map(|s| s.symbol.clone())
        .collect()
}

/// Initial selections when entering comparison mode
///
/// The first two summaries, or nothing when fewer than two exist.
pub fn default_selections(summaries: &[SummaryData]) -> Option<(Selection, Selection)> {
    match summaries {
        [first, second, ..] => Some((Selection::of(&first.key()), Selection::of(&second.key()))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(source: SourceType, symbol: &str, value: &str) -> SummaryData {
        SummaryData {
            source_type: source,
            symbol: symbol.to_string(),
            current_value: value.to_string(),
            change_24h: None,
            change_24h_percent: None,
            last_updated: "2024-01-15T10:00:00Z".to_string(),
            total_data_points: 10,
        }
    }

    fn sample() -> Vec<SummaryData> {
        vec![
            summary(SourceType::Crypto, "BTC", "40000"),
            summary(SourceType::Crypto, "ETH", "2500"),
            summary(SourceType::Stock, "AAPL", "180"),
            summary(SourceType::Currency, "USD-EUR", "0"),
        ]
    }

    fn sel(source: SourceType, symbol: &str) -> Selection {
        Selection::of(&SeriesKey::new(source, symbol))
    }

    #[test]
    fn test_basic_comparison() {
        let summaries = sample();
        let cmp = compare(
            &summaries,
            &sel(SourceType::Crypto, "ETH"),
            &sel(SourceType::Stock, "AAPL"),
        )
        .unwrap();

        assert_eq!(cmp.difference, 2320.0);
        assert!((cmp.percent_difference - 2320.0 / 180.0 * 100.0).abs() < 1e-9);
        assert!(cmp.is_higher);
    }

    #[test]
    fn test_symmetry() {
        let summaries = sample();
        let a = sel(SourceType::Crypto, "BTC");
        let b = sel(SourceType::Crypto, "ETH");

        let ab = compare(&summaries, &a, &b).unwrap();
        let ba = compare(&summaries, &b, &a).unwrap();

        // Differences are exact negations
        assert_eq!(ab.difference, -ba.difference);
        assert!(ab.is_higher);
        assert!(!ba.is_higher);

        // Percent differences use different denominators
        assert_eq!(ab.percent_difference, 1500.0);
        assert_eq!(ba.percent_difference, -93.75);
        assert_ne!(ab.percent_difference, -ba.percent_difference);
    }

    #[test]
    fn test_equal_values_not_higher() {
        let summaries = vec![
            summary(SourceType::Stock, "A", "10"),
            summary(SourceType::Stock, "B", "10"),
        ];
        let cmp = compare(
            &summaries,
            &sel(SourceType::Stock, "A"),
            &sel(SourceType::Stock, "B"),
        )
        .unwrap();
        assert_eq!(cmp.difference, 0.0);
        assert_eq!(cmp.percent_difference, 0.0);
        assert!(!cmp.is_higher);
    }

    #[test]
    fn test_zero_denominator_is_non_finite() {
        let summaries = sample();
        let zero = sel(SourceType::Currency, "USD-EUR");

        let positive = compare(&summaries, &sel(SourceType::Stock, "AAPL"), &zero).unwrap();
        assert_eq!(positive.percent_difference, f64::INFINITY);

        let summaries_with_zero_left = vec![
            summary(SourceType::Currency, "A", "0"),
            summary(SourceType::Currency, "B", "0"),
        ];
        let nan = compare(
            &summaries_with_zero_left,
            &sel(SourceType::Currency, "A"),
            &sel(SourceType::Currency, "B"),
        )
        .unwrap();
        assert!(nan.percent_difference.is_nan());

        let negative = compare(
            &[
                summary(SourceType::Currency, "A", "-3"),
                summary(SourceType::Currency, "B", "0"),
            ],
            &sel(SourceType::Currency, "A"),
            &sel(SourceType::Currency, "B"),
        )
        .unwrap();
        assert_eq!(negative.percent_difference, f64::NEG_INFINITY);
    }

    #[test]
    fn test_unparsable_value_propagates_nan() {
        let summaries = vec![
            summary(SourceType::Weather, "Oslo", "n/a"),
            summary(SourceType::Weather, "Rome", "20"),
        ];
        let cmp = compare(
            &summaries,
            &sel(SourceType::Weather, "Oslo"),
            &sel(SourceType::Weather, "Rome"),
        )
        .unwrap();
        assert!(cmp.difference.is_nan());
        assert!(!cmp.is_higher);
    }

    #[test]
    fn test_missing_side_yields_none() {
        let summaries = sample();
        let complete = sel(SourceType::Crypto, "BTC");

        assert!(compare(&summaries, &Selection::new(), &complete).is_none());
        assert!(compare(&summaries, &complete, &Selection::new()).is_none());

        let mut source_only = Selection::new();
        source_only.set_source_type(Some(SourceType::Crypto));
        assert!(compare(&summaries, &complete, &source_only).is_none());

        let unknown = sel(SourceType::Stock, "TSLA");
        assert!(compare(&summaries, &complete, &unknown).is_none());
    }

    #[test]
    fn test_changing_source_resets_symbol() {
        let mut selection = sel(SourceType::Crypto, "BTC");
        assert!(selection.is_complete());

        selection.set_source_type(Some(SourceType::Stock));
        assert_eq!(selection.source_type(), Some(SourceType::Stock));
        assert_eq!(selection.symbol(), None);
        assert!(selection.key().is_none());

        assert!(selection.set_symbol(Some("AAPL".to_string())));
        assert_eq!(selection.key(), Some(SeriesKey::new(SourceType::Stock, "AAPL")));
    }

    #[test]
    fn test_symbol_requires_source() {
        let mut selection = Selection::new();
        assert!(!selection.set_symbol(Some("BTC".to_string())));
        assert_eq!(selection.symbol(), None);

        selection.set_source_type(Some(SourceType::Crypto));
        assert!(selection.set_symbol(Some(String::new())));
        assert_eq!(selection.symbol(), None);
    }

    #[test]
    fn test_options() {
        let summaries = sample();
        assert_eq!(
            source_options(&summaries),
            vec![SourceType::Crypto, SourceType::Stock, SourceType::Currency]
        );
        assert_eq!(
            symbol_options(&summaries, SourceType::Crypto),
            vec!["BTC".to_string(), "ETH".to_string()]
        );
        assert!(symbol_options(&summaries, SourceType::Weather).is_empty());
    }

    #[test]
    fn test_default_selections() {
        let summaries = sample();
        let (left, right) = default_selections(&summaries).unwrap();
        assert_eq!(left, sel(SourceType::Crypto, "BTC"));
        assert_eq!(right, sel(SourceType::Crypto, "ETH"));

        assert!(default_selections(&summaries[..1]).is_none());
        assert!(default_selections(&[]).is_none());
    }
}
