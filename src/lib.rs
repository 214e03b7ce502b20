//! # DataDash
//!
//! Client and terminal dashboard for time-series readings (crypto, stock,
//! weather, currency) served by the DataDash REST backend.
//!
//! ## Features
//!
//! - **Typed API client**: summaries, chart series, data points and alerts
//! - **Reconciliation**: one summary per series, most recent wins
//! - **Chart shaping**: time-sorted points with a padded Y-axis domain
//! - **Comparison**: two independently fetched series and their relative difference
//! - **Polling**: periodic refresh with a start/stop scheduler
//!
//! ## Modules
//!
//! - [`model`]: wire records and value/timestamp parsing
//! - [`client`]: HTTP client behind the [`DashboardApi`] trait
//! - [`analysis`]: reconciler, chart transformer, comparison engine
//! - [`dashboard`]: view state, controller, scheduler, text rendering
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use datadash::{ClientConfig, Dashboard, DashboardClient, DashboardConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DashboardClient::new(ClientConfig::default())?;
//!     let dashboard = Dashboard::new(Arc::new(client), DashboardConfig::default());
//!
//!     if dashboard.refresh().await {
//!         let state = dashboard.snapshot().await;
//!         println!("{} series tracked", state.summaries.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod model;

pub use model::{
    parse_timestamp, parse_value, Alert, AlertCondition, AlertUpdate, ChartData, DataPoint,
    NewAlert, Paginated, SeriesKey, SourceType, SummaryData,
};

pub use client::{
    AlertQuery, ClientConfig, ClientError, ClientResult, DashboardApi, DashboardClient,
    SeriesQuery,
};

pub use analysis::{
    compare, prepare_chart, reconcile_summaries, ChartSeries, ChartView, Comparison, Selection,
    Side,
};

pub use dashboard::{
    Dashboard, DashboardEvent, DashboardFilter, DashboardState, PollScheduler, SchedulerStatus,
};

pub use config::{ApiConfig, Config, ConfigError, DashboardConfig, LoggingConfig};
