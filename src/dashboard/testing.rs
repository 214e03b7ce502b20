//! In-memory `DashboardApi` for controller and scheduler tests

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::client::{AlertQuery, ClientError, ClientResult, DashboardApi, SeriesQuery};
use crate::model::{
    Alert, AlertUpdate, ChartData, DataPoint, NewAlert, Paginated, SourceType, SummaryData,
};

pub(crate) fn summary(source: SourceType, symbol: &str, value: &str, updated: &str) -> SummaryData {
    SummaryData {
        source_type: source,
        symbol: symbol.to_string(),
        current_value: value.to_string(),
        change_24h: None,
        change_24h_percent: None,
        last_updated: updated.to_string(),
        total_data_points: 10,
    }
}

pub(crate) fn chart(values: &[&str]) -> Vec<ChartData> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| ChartData::new(format!("2024-01-15T{:02}:00:00Z", i), *v, "fake"))
        .collect()
}

/// Charts are keyed by requested symbol; `""` answers unfiltered queries
#[derive(Default)]
pub(crate) struct FakeApi {
    summaries: Vec<SummaryData>,
    summary_delay: Duration,
    charts: HashMap<String, Vec<ChartData>>,
    chart_delays: HashMap<String, Duration>,
    failing_charts: HashSet<String>,
    fail_summary: AtomicBool,
    fail_charts: AtomicBool,
    summary_calls: AtomicUsize,
    chart_queries: Mutex<Vec<SeriesQuery>>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_summaries(mut self, summaries: Vec<SummaryData>) -> Self {
        self.summaries = summaries;
        self
    }

    pub(crate) fn with_summary_delay(mut self, delay: Duration) -> Self {
        self.summary_delay = delay;
        self
    }

    pub(crate) fn with_chart(mut self, symbol: &str, data: Vec<ChartData>) -> Self {
        self.charts.insert(symbol.to_string(), data);
        self
    }

    pub(crate) fn with_chart_delay(mut self, symbol: &str, delay: Duration) -> Self {
        self.chart_delays.insert(symbol.to_string(), delay);
        self
    }

    pub(crate) fn with_failing_chart(mut self, symbol: &str) -> Self {
        self.failing_charts.insert(symbol.to_string());
        self
    }

    pub(crate) fn set_fail_summary(&self, fail: bool) {
        self.fail_summary.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn set_fail_charts(&self, fail: bool) {
        self.fail_charts.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn chart_queries(&self) -> Vec<SeriesQuery> {
        self.chart_queries.lock().unwrap().clone()
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl DashboardApi for FakeApi {
    async fn list_data_points(&self, _query: &SeriesQuery) -> ClientResult<Paginated<DataPoint>> {
        Err(ClientError::Unavailable)
    }

    async fn chart_data(&self, query: &SeriesQuery) -> ClientResult<Vec<ChartData>> {
        self.chart_queries.lock().unwrap().push(query.clone());
        let symbol = query.symbol.clone().unwrap_or_default();
        pause(self.chart_delays.get(&symbol).copied().unwrap_or_default()).await;

        if self.fail_charts.load(Ordering::SeqCst) || self.failing_charts.contains(&symbol) {
            return Err(ClientError::ApiError {
                status: 500,
                message: "chart unavailable".to_string(),
            });
        }
        Ok(self.charts.get(&symbol).cloned().unwrap_or_default())
    }

    async fn summary(&self) -> ClientResult<Vec<SummaryData>> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        pause(self.summary_delay).await;

        if self.fail_summary.load(Ordering::SeqCst) {
            return Err(ClientError::Unavailable);
        }
        Ok(self.summaries.clone())
    }

    async fn list_alerts(&self, _query: &AlertQuery) -> ClientResult<Paginated<Alert>> {
        Err(ClientError::Unavailable)
    }

    async fn create_alert(&self, _alert: &NewAlert) -> ClientResult<Alert> {
        Err(ClientError::Unavailable)
    }

    async fn update_alert(&self, _id: i64, _update: &AlertUpdate) -> ClientResult<Alert> {
        Err(ClientError::Unavailable)
    }

    async fn delete_alert(&self, _id: i64) -> ClientResult<()> {
        Err(ClientError::Unavailable)
    }
}
