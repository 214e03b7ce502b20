//! Chart Data Transformer
//!
//! Turns a raw chart series into something a renderer can draw directly:
//! points parsed and sorted by time, a padded Y-axis domain, and the two
//! display hints (stable series, per-point markers).
//!
//! Parse failures are carried, not dropped: an unparsable value is `NaN`
//! and an unparsable timestamp is `None`. A `NaN` value poisons the
//! domain the same way `Math.min`/`Math.max` would.

use serde::Serialize;

use crate::model::{parse_epoch_millis, parse_value, ChartData};

/// Fraction of the value range used as padding above and below
pub const RANGE_PADDING: f64 = 0.10;
/// Padding below this fraction of the maximum counts as collapsed
pub const MIN_PADDING_RATIO: f64 = 0.001;
/// Replacement padding (fraction of the maximum) for collapsed ranges
pub const FLAT_PADDING_RATIO: f64 = 0.005;
/// Range below this fraction of the maximum marks the series as stable
pub const STABLE_RATIO: f64 = 0.0001;
/// Series with at most this many points always show markers
pub const MARKER_POINT_LIMIT: usize = 10;

/// One render-ready point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Unix milliseconds; `None` if the wire timestamp did not parse
    pub timestamp: Option<i64>,
    /// Wire timestamp, kept for display fallback
    pub raw_timestamp: String,
    /// Parsed value; `NaN` if the wire value did not parse
    pub value: f64,
    pub label: String,
}

/// Y-axis bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YDomain {
    pub min: f64,
    pub max: f64,
}

impl YDomain {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// A non-empty, render-ready series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub points: Vec<ChartPoint>,
    pub domain: YDomain,
    pub min_value: f64,
    pub max_value: f64,
    /// Range is negligible relative to the maximum
    pub stable: bool,
    /// Whether to draw a marker on every point
    pub show_markers: bool,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Footer line shown under the chart
    pub fn caption(&self) -> String {
        let mut caption = format!("Showing {} data points over time", self.points.len());
        if self.stable {
            caption.push_str(" • Stable values (minimal variation)");
        }
        caption
    }
}

/// Transformer output: either a drawable series or the explicit empty state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChartView {
    NoData,
    Series(ChartSeries),
}

impl ChartView {
    pub fn series(&self) -> Option<&ChartSeries> {
        match self {
            ChartView::Series(series) => Some(series),
            ChartView::NoData => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ChartView::NoData)
    }
}

/// Prepare a chart series for rendering
///
/// Empty input short-circuits to [`ChartView::NoData`] without touching
/// the domain math.
pub fn prepare_chart(data: &[ChartData]) -> ChartView {
    if data.is_empty() {
        return ChartView::NoData;
    }

    let mut points: Vec<ChartPoint> = data
        .iter()
        .map(|item| ChartPoint {
            timestamp: parse_epoch_millis(&item.timestamp),
            raw_timestamp: item.timestamp.clone(),
            value: parse_value(&item.value),
            label: item.label.clone(),
        })
        .collect();

    // Stable sort; unparsable timestamps go last in input order
    points.sort_by_key(|p| (p.timestamp.is_none(), p.timestamp));

    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let (min_value, max_value) = value_bounds(&values);
    let domain = y_domain(min_value, max_value);
    let stable = is_stable(min_value, max_value);
    let show_markers = points.len() <= MARKER_POINT_LIMIT || stable;

    ChartView::Series(ChartSeries {
        points,
        domain,
        min_value,
        max_value,
        stable,
        show_markers,
    })
}

/// Minimum and maximum, `NaN` if any value is `NaN`
///
/// Callers must pass a non-empty slice.
fn value_bounds(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
            if v.is_nan() || min.is_nan() {
                (f64::NAN, f64::NAN)
            } else {
                (min.min(v), max.max(v))
            }
        })
}

/// Padding around the value range
///
/// 10% of the range, raised to 0.5% of the maximum when that would be
/// under 0.1% of the maximum so a flat line still gets vertical room.
pub fn axis_padding(min_value: f64, max_value: f64) -> f64 {
    let padding = (max_value - min_value) * RANGE_PADDING;
    if padding < max_value * MIN_PADDING_RATIO {
        max_value * FLAT_PADDING_RATIO
    } else {
        padding
    }
}

/// Y-axis domain `[max(0, min - padding), max + padding]`
///
/// The floor at zero assumes non-negative magnitudes. A `NaN` bound
/// stays `NaN`.
pub fn y_domain(min_value: f64, max_value: f64) -> YDomain {
    let padding = axis_padding(min_value, max_value);
    let lower = min_value - padding;

    YDomain {
        min: if lower.is_nan() { f64::NAN } else { lower.max(0.0) },
        max: max_value + padding,
    }
}

/// Whether the series is flat enough to hint "stable values"
pub fn is_stable(min_value: f64, max_value: f64) -> bool {
    (max_value - min_value) < max_value * STABLE_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(view: &ChartView) -> &ChartSeries {
        view.series().expect("expected a series")
    }

    fn point(ts: &str, value: &str) -> ChartData {
        ChartData::new(ts, value, "BTC")
    }

    const T1: &str = "2024-01-15T10:00:00Z";
    const T2: &str = "2024-01-15T10:05:00Z";
    const T3: &str = "2024-01-15T10:10:00Z";

    #[test]
    fn test_empty_input_is_no_data() {
        let view = prepare_chart(&[]);
        assert_eq!(view, ChartView::NoData);
        assert!(view.is_empty());
        assert!(view.series().is_none());
    }

    #[test]
    fn test_sorts_and_scales() {
        let view = prepare_chart(&[point(T3, "5"), point(T1, "1"), point(T2, "3")]);
        let s = series(&view);

        let values: Vec<f64> = s.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 3.0, 5.0]);

        let raw: Vec<&str> = s.points.iter().map(|p| p.raw_timestamp.as_str()).collect();
        assert_eq!(raw, vec![T1, T2, T3]);

        assert!((s.domain.min - 0.6).abs() < 1e-9);
        assert!((s.domain.max - 5.4).abs() < 1e-9);
        assert!(!s.stable);
        assert!(s.show_markers);
    }

    #[test]
    fn test_sort_is_non_decreasing_for_any_permutation() {
        let base = [
            point(T1, "1"),
            point(T2, "2"),
            point(T3, "3"),
            point("2024-01-15T09:55:00Z", "4"),
        ];

        let permutations: [[usize; 4]; 6] = [
            [0, 1, 2, 3],
            [3, 2, 1, 0],
            [1, 3, 0, 2],
            [2, 0, 3, 1],
            [3, 0, 2, 1],
            [1, 2, 3, 0],
        ];

        for perm in permutations {
            let input: Vec<ChartData> = perm.iter().map(|&i| base[i].clone()).collect();
            let view = prepare_chart(&input);
            let ts: Vec<i64> = series(&view)
                .points
                .iter()
                .map(|p| p.timestamp.unwrap())
                .collect();
            assert!(ts.windows(2).all(|w| w[0] <= w[1]), "not sorted: {:?}", ts);
        }
    }

    #[test]
    fn test_sort_is_stable_for_equal_timestamps() {
        let input = vec![
            ChartData::new(T2, "1", "first"),
            ChartData::new(T1, "0", "earliest"),
            ChartData::new(T2, "2", "second"),
        ];
        let view = prepare_chart(&input);
        let labels: Vec<&str> = series(&view).points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["earliest", "first", "second"]);
    }

    #[test]
    fn test_unparsable_timestamps_kept_and_sorted_last() {
        let input = vec![
            ChartData::new("garbage", "1", "a"),
            ChartData::new(T2, "2", "b"),
            ChartData::new("", "3", "c"),
            ChartData::new(T1, "4", "d"),
        ];
        let view = prepare_chart(&input);
        let s = series(&view);

        assert_eq!(s.len(), 4);
        let labels: Vec<&str> = s.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["d", "b", "a", "c"]);
        assert!(s.points[2].timestamp.is_none());
        assert_eq!(s.points[2].raw_timestamp, "garbage");
    }

    #[test]
    fn test_domain_contains_every_value() {
        let inputs: Vec<Vec<&str>> = vec![
            vec!["43250.12", "43100.5", "43399.99"],
            vec!["0.00001234", "0.00001301"],
            vec!["1.0842", "1.0842"],
            vec!["0", "0.5", "12"],
            vec!["21.5"],
        ];

        for values in inputs {
            let data: Vec<ChartData> = values
                .iter()
                .enumerate()
                .map(|(i, v)| ChartData::new(format!("2024-01-15T10:0{}:00Z", i), *v, "x"))
                .collect();
            let view = prepare_chart(&data);
            let s = series(&view);
            for p in &s.points {
                assert!(s.domain.contains(p.value), "{} not in {:?}", p.value, s.domain);
            }
        }
    }

    #[test]
    fn test_flat_series_padding_does_not_collapse() {
        let view = prepare_chart(&[
            point(T1, "100.00"),
            point(T2, "100.001"),
            point(T3, "100.0005"),
        ]);
        let s = series(&view);

        assert!(s.domain.min < s.domain.max);
        // 0.5% of the maximum
        let expected_padding = 100.001 * FLAT_PADDING_RATIO;
        assert!((s.domain.max - (100.001 + expected_padding)).abs() < 1e-9);
        assert!((s.domain.min - (100.0 - expected_padding)).abs() < 1e-9);
        assert!(s.stable);
    }

    #[test]
    fn test_single_point_gets_padding() {
        let view = prepare_chart(&[point(T1, "200")]);
        let s = series(&view);
        assert_eq!(
            s.domain,
            YDomain {
                min: 199.0,
                max: 201.0
            }
        );
        assert!(s.stable);
        assert!(s.show_markers);
    }

    #[test]
    fn test_domain_floored_at_zero() {
        let view = prepare_chart(&[point(T1, "0.1"), point(T2, "10")]);
        let s = series(&view);
        assert_eq!(s.domain.min, 0.0);
        assert!((s.domain.max - 10.99).abs() < 1e-9);
    }

    #[test]
    fn test_all_zero_series() {
        // Nothing to pad against: the domain degenerates to [0, 0]
        let view = prepare_chart(&[point(T1, "0"), point(T2, "0")]);
        let s = series(&view);
        assert_eq!(s.domain, YDomain { min: 0.0, max: 0.0 });
        assert!(!s.stable);
    }

    #[test]
    fn test_markers_hidden_for_long_varied_series() {
        let data: Vec<ChartData> = (0..11)
            .map(|i| {
                ChartData::new(
                    format!("2024-01-15T10:{:02}:00Z", i),
                    format!("{}", 100 + i * 10),
                    "x",
                )
            })
            .collect();
        let view = prepare_chart(&data);
        let s = series(&view);
        assert!(!s.stable);
        assert!(!s.show_markers);

        let ten = prepare_chart(&data[..10]);
        assert!(series(&ten).show_markers);
    }

    #[test]
    fn test_markers_shown_for_long_stable_series() {
        let data: Vec<ChartData> = (0..30)
            .map(|i| ChartData::new(format!("2024-01-15T10:{:02}:00Z", i), "1.0842", "EUR"))
            .collect();
        let view = prepare_chart(&data);
        let s = series(&view);
        assert!(s.stable);
        assert!(s.show_markers);
        assert!(s.caption().ends_with("Stable values (minimal variation)"));
    }

    #[test]
    fn test_nan_value_propagates_to_domain() {
        let view = prepare_chart(&[point(T1, "5"), point(T2, "n/a"), point(T3, "7")]);
        let s = series(&view);

        assert_eq!(s.len(), 3);
        assert!(s.points[1].value.is_nan());
        assert!(s.min_value.is_nan());
        assert!(s.domain.min.is_nan());
        assert!(s.domain.max.is_nan());
        assert!(!s.stable);
    }

    #[test]
    fn test_caption() {
        let view = prepare_chart(&[point(T1, "1"), point(T2, "3")]);
        assert_eq!(series(&view).caption(), "Showing 2 data points over time");
    }
}
