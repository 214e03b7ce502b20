//! Dashboard
//!
//! View state, the controller that fills it from the API, comparison
//! mode, the polling scheduler and text rendering.
//!
//! ## Fetch cycle
//!
//! 1. Fetch summaries, reconcile (latest per series wins), store
//! 2. Outside comparison mode: fetch the filtered trend chart, store
//! 3. In comparison mode: refetch each side's chart independently
//! 4. Stamp `last_updated`
//!
//! Errors end the cycle early and are logged; the previous data stays.

pub mod comparison;
pub mod controller;
pub mod format;
pub mod render;
pub mod scheduler;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use comparison::{fetch_side, ComparisonPanel, ComparisonState, SideUpdate};
pub use controller::{Dashboard, DashboardEvent};
pub use render::render_dashboard;
pub use scheduler::{PollScheduler, SchedulerStatus};
pub use state::{DashboardFilter, DashboardState, OverviewStats, DEFAULT_CHART_COLOR};
