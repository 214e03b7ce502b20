//! DataDash data model
//!
//! Records exchanged with the backend and the client-side rules for
//! parsing their string-encoded numbers and timestamps.

pub mod parse;
pub mod types;

pub use parse::{parse_epoch_millis, parse_timestamp, parse_value};
pub use types::{
    Alert, AlertCondition, AlertUpdate, ChartData, DataPoint, NewAlert, Paginated, SeriesKey,
    SourceType, SummaryData,
};
