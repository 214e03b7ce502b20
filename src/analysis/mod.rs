//! Data shaping between the API client and the view
//!
//! - **reconcile**: one summary per (source type, symbol), latest wins
//! - **chart**: sorted, parsed series with a padded Y-axis domain
//! - **comparison**: two-side selection and relative difference

pub mod chart;
pub mod comparison;
pub mod reconcile;

pub use chart::{prepare_chart, ChartPoint, ChartSeries, ChartView, YDomain};
pub use comparison::{
    compare, default_selections, find_summary, source_options, symbol_options, Comparison,
    Selection, Side,
};
pub use reconcile::reconcile_summaries;
