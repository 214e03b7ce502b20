//! DataDash API Client
//!
//! Typed access to the backend REST API.
//!
//! ## Operations
//!
//! | Operation        | Endpoint                              |
//! |------------------|---------------------------------------|
//! | List data points | `GET /api/datapoints/`                |
//! | Chart series     | `GET /api/datapoints/chart_data/`     |
//! | Summary          | `GET /api/datapoints/summary/`        |
//! | List alerts      | `GET /api/alerts/`                    |
//! | Create alert     | `POST /api/alerts/`                   |
//! | Update alert     | `PATCH /api/alerts/{id}/`             |
//! | Delete alert     | `DELETE /api/alerts/{id}/`            |

mod error;
mod http;
mod query;

pub use error::{ClientError, ClientResult};
pub use http::{ClientConfig, DashboardClient, REQUEST_ID_HEADER};
pub use query::{AlertQuery, SeriesQuery};

use async_trait::async_trait;

use crate::model::{Alert, AlertUpdate, ChartData, DataPoint, NewAlert, Paginated, SummaryData};

/// The remote operations the dashboard depends on
///
/// [`DashboardClient`] is the HTTP implementation; the dashboard
/// controller, comparison session and scheduler only see this trait.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// List raw data points
    async fn list_data_points(&self, query: &SeriesQuery) -> ClientResult<Paginated<DataPoint>>;

    /// Fetch a chart-ready series
    async fn chart_data(&self, query: &SeriesQuery) -> ClientResult<Vec<ChartData>>;

    /// Fetch the per-series summary list
    async fn summary(&self) -> ClientResult<Vec<SummaryData>>;

    /// List alert rules
    async fn list_alerts(&self, query: &AlertQuery) -> ClientResult<Paginated<Alert>>;

    /// Create an alert rule
    async fn create_alert(&self, alert: &NewAlert) -> ClientResult<Alert>;

    /// Partially update an alert rule
    async fn update_alert(&self, id: i64, update: &AlertUpdate) -> ClientResult<Alert>;

    /// Delete an alert rule
    async fn delete_alert(&self, id: i64) -> ClientResult<()>;
}
