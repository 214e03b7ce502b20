//! Plain-text rendering of the dashboard
//!
//! Used by the `datadash` watcher. Output is line-oriented so it reads
//! the same in a terminal and in a log file.

use std::fmt::Write;

use super::comparison::{ComparisonPanel, ComparisonState};
use super::format::{
    format_axis_tick, format_change_abs, format_change_percent, format_current_value,
    format_time_tick, format_tooltip_time, format_tooltip_value, format_updated_at, Trend,
};
use super::state::{DashboardState, OverviewStats};
use crate::analysis::{ChartSeries, ChartView, Comparison};
use crate::model::SummaryData;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const NO_DATA: &str = "No data available";

/// One summary card on a single line
pub fn render_card(summary: &SummaryData) -> String {
    let percent = summary.change_24h_percent.as_deref();
    let mut line = format!(
        "{:<10} {:<15} {:>16}  {} {}",
        summary.symbol,
        summary.source_type.label(),
        format_current_value(summary.source_type, &summary.current_value),
        Trend::from_percent(percent).arrow(),
        format_change_percent(percent),
    );
    if let Some(abs) = format_change_abs(summary.change_24h.as_deref()) {
        line.push(' ');
        line.push_str(&abs);
    }
    line.push_str(&format!("  Updated {}", format_updated_at(&summary.last_updated)));
    line
}

pub fn render_stats(stats: &OverviewStats) -> String {
    format!(
        "Data points: {}  Sources: {}  Symbols: {}  Chart points: {}",
        stats.total_data_points, stats.active_sources, stats.tracked_symbols, stats.chart_points
    )
}

/// Map values onto block characters within the domain
///
/// Values outside the domain (or `NaN`) render as a space.
pub fn sparkline(series: &ChartSeries) -> String {
    let span = series.domain.span();
    series
        .points
        .iter()
        .map(|p| {
            if !series.domain.contains(p.value) {
                return ' ';
            }
            let ratio = if span > 0.0 {
                (p.value - series.domain.min) / span
            } else {
                0.5
            };
            let level = (ratio * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

/// Title, axis range, sparkline and caption of a chart
///
/// When markers are on, every point is listed as well.
pub fn render_chart(title: &str, view: &ChartView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", title);

    let series = match view {
        ChartView::NoData => {
            let _ = writeln!(out, "{}", NO_DATA);
            return out;
        }
        ChartView::Series(series) => series,
    };

    let first = series.points.first().map(|p| p.raw_timestamp.as_str()).unwrap_or("");
    let last = series.points.last().map(|p| p.raw_timestamp.as_str()).unwrap_or("");
    let _ = writeln!(
        out,
        "[{} .. {}]  {} -> {}",
        format_axis_tick(series.domain.min),
        format_axis_tick(series.domain.max),
        format_time_tick(first),
        format_time_tick(last),
    );
    let _ = writeln!(out, "{}", sparkline(series));

    if series.show_markers {
        for point in &series.points {
            let _ = writeln!(
                out,
                "  ● {}  {}",
                format_tooltip_time(&point.raw_timestamp),
                format_tooltip_value(point.value)
            );
        }
    }

    let _ = writeln!(out, "{}", series.caption());
    out
}

/// One-line verdict for a comparison
pub fn render_comparison_result(left: &str, right: &str, cmp: &Comparison) -> String {
    let direction = if cmp.is_higher { "higher" } else { "lower" };
    format!(
        "{} is {:.2}% {} than {} (difference {:.4})",
        left,
        cmp.percent_difference.abs(),
        direction,
        right,
        cmp.difference
    )
}

fn render_panel(out: &mut String, panel: &ComparisonPanel) {
    let title = panel.title();
    if panel.chart.is_empty() {
        let _ = writeln!(out, "== {} ==", title);
        let _ = writeln!(out, "{}", panel.placeholder());
    } else {
        out.push_str(&render_chart(&title, &panel.chart_view()));
    }
}

fn render_comparison(out: &mut String, state: &DashboardState, cmp: &ComparisonState) {
    let _ = writeln!(out, "-- Comparison --");
    render_panel(out, &cmp.left);
    render_panel(out, &cmp.right);
    if let Some(result) = cmp.comparison(&state.summaries) {
        let _ = writeln!(
            out,
            "{}",
            render_comparison_result(&cmp.left.title(), &cmp.right.title(), &result)
        );
    }
}

/// Full screen: status line, stats, cards, then the trend or comparison view
pub fn render_dashboard(state: &DashboardState, chart_hours: u32) -> String {
    let mut out = String::new();

    let status = match (state.loading, state.last_updated) {
        (true, _) => "Loading...".to_string(),
        (false, Some(at)) => format!("Last updated {}", at.format("%H:%M:%S")),
        (false, None) => "Waiting for data".to_string(),
    };
    let _ = writeln!(out, "DataDash  {}", status);
    let _ = writeln!(out, "{}", render_stats(&state.stats()));
    let _ = writeln!(out);

    let cards = state.filtered_summaries();
    if cards.is_empty() {
        let _ = writeln!(out, "{}", NO_DATA);
    }
    for summary in cards {
        let _ = writeln!(out, "{}", render_card(summary));
    }
    let _ = writeln!(out);

    match &state.comparison {
        Some(cmp) => render_comparison(&mut out, state, cmp),
        None => out.push_str(&render_chart(&state.chart_title(chart_hours), &state.chart_view())),
    }
    out
}
