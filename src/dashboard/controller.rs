//! Dashboard controller
//!
//! Owns the view state and runs the fetch cycles against a
//! [`DashboardApi`]. Renderers subscribe to [`DashboardEvent`]s and read
//! snapshots; nothing here blocks on the view.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;

use super::comparison::{fetch_side, ComparisonState};
use super::state::{DashboardFilter, DashboardState};
use crate::analysis::{reconcile_summaries, Side};
use crate::client::{ClientResult, DashboardApi, SeriesQuery};
use crate::config::DashboardConfig;
use crate::model::{SeriesKey, SourceType};

const EVENT_CAPACITY: usize = 64;

/// Something the view should redraw for
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    Refreshed,
    RefreshFailed(String),
    SideUpdated(Side),
    SideFailed { side: Side, error: String },
}

/// Dashboard state plus the operations that change it
pub struct Dashboard {
    api: Arc<dyn DashboardApi>,
    state: Arc<RwLock<DashboardState>>,
    config: DashboardConfig,
    events: broadcast::Sender<DashboardEvent>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn DashboardApi>, config: DashboardConfig) -> Self {
        Self::with_filter(api, config, DashboardFilter::new())
    }

    /// Start with a filter already applied; nothing is fetched yet
    pub fn with_filter(
        api: Arc<dyn DashboardApi>,
        config: DashboardConfig,
        filter: DashboardFilter,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let state = DashboardState {
            filter,
            ..DashboardState::new()
        };
        Self {
            api,
            state: Arc::new(RwLock::new(state)),
            config,
            events,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Copy of the current state for rendering
    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    /// Run one fetch cycle: summaries, then the trend chart
    ///
    /// In comparison mode the trend chart is skipped and both comparison
    /// sides are refetched instead. Failures are logged and leave the
    /// previous data in place. Returns whether the cycle succeeded.
    pub async fn refresh(&self) -> bool {
        let (filter, comparison_mode) = {
            let mut state = self.state.write().await;
            state.loading = true;
            (state.filter.clone(), state.is_comparison_mode())
        };

        let outcome = self.fetch_cycle(filter, comparison_mode).await;
        self.state.write().await.loading = false;

        match outcome {
            Ok(()) => {
                let _ = self.events.send(DashboardEvent::Refreshed);
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching dashboard data");
                let _ = self.events.send(DashboardEvent::RefreshFailed(e.to_string()));
                false
            }
        }
    }

    async fn fetch_cycle(
        &self,
        filter: DashboardFilter,
        comparison_mode: bool,
    ) -> ClientResult<()> {
        let raw = self.api.summary().await?;
        let received = raw.len();
        let summaries = reconcile_summaries(raw);
        tracing::debug!(received, kept = summaries.len(), "Summaries reconciled");
        self.state.write().await.summaries = summaries;

        if comparison_mode {
            self.refresh_comparison_sides().await;
        } else {
            let mut query = SeriesQuery::new().hours(self.config.chart_hours);
            if let Some(source) = filter.source() {
                query = query.source_type(source);
            }
            if let Some(symbol) = filter.symbol() {
                query = query.symbol(symbol);
            }
            let chart = self.api.chart_data(&query).await?;
            self.state.write().await.chart = chart;
        }

        self.state.write().await.last_updated = Some(Utc::now());
        Ok(())
    }

    /// Filter the view by source (resets the symbol) and refetch
    pub async fn set_source_filter(&self, source: Option<SourceType>) -> bool {
        self.state.write().await.filter.set_source(source);
        self.refresh().await
    }

    /// Filter the view by symbol and refetch
    pub async fn set_symbol_filter(&self, symbol: Option<String>) -> bool {
        self.state.write().await.filter.set_symbol(symbol);
        self.refresh().await
    }

    /// Switch to comparison mode with the first two summaries selected
    ///
    /// The summaries are refetched first; if that fails the stored ones
    /// are used. `None` when fewer than two summaries are available.
    /// Otherwise returns the handles of the per-side chart fetches.
    pub async fn enter_comparison(&self) -> Option<Vec<JoinHandle<()>>> {
        match self.api.summary().await {
            Ok(raw) => self.state.write().await.summaries = reconcile_summaries(raw),
            Err(e) => tracing::warn!(error = %e, "Using stored summaries for comparison"),
        }

        {
            let mut state = self.state.write().await;
            if !state.can_compare() {
                tracing::warn!(summaries = state.summaries.len(), "Not enough series to compare");
                return None;
            }
            let opened = ComparisonState::open(&state.summaries);
            state.comparison = Some(opened);
        }
        tracing::info!("Entered comparison mode");
        Some(self.refresh_comparison_sides().await)
    }

    /// Back to the normal view; refetches the trend chart
    pub async fn exit_comparison(&self) -> bool {
        self.state.write().await.comparison = None;
        tracing::info!("Left comparison mode");
        self.refresh().await
    }

    /// Pick a source for one side; clears that side's symbol, no fetch
    pub async fn select_comparison_source(&self, side: Side, source: Option<SourceType>) -> bool {
        let mut state = self.state.write().await;
        match state.comparison.as_mut() {
            Some(cmp) => {
                cmp.panel_mut(side).selection.set_source_type(source);
                true
            }
            None => false,
        }
    }

    /// Pick a symbol for one side and fetch its chart
    ///
    /// Only that side is fetched. Returns the fetch handle, or `None` when
    /// not in comparison mode or the selection is incomplete.
    pub async fn select_comparison_symbol(
        &self,
        side: Side,
        symbol: Option<String>,
    ) -> Option<JoinHandle<()>> {
        let key = {
            let mut state = self.state.write().await;
            let cmp = state.comparison.as_mut()?;
            if !cmp.panel_mut(side).selection.set_symbol(symbol) {
                return None;
            }
            cmp.begin_fetch(side)?
        };
        Some(self.spawn_side_fetch(side, key))
    }

    async fn refresh_comparison_sides(&self) -> Vec<JoinHandle<()>> {
        let keys: Vec<(Side, SeriesKey)> = {
            let mut state = self.state.write().await;
            let Some(cmp) = state.comparison.as_mut() else {
                return Vec::new();
            };
            [Side::Left, Side::Right]
                .into_iter()
                .filter_map(|side| cmp.begin_fetch(side).map(|key| (side, key)))
                .collect()
        };

        keys.into_iter()
            .map(|(side, key)| self.spawn_side_fetch(side, key))
            .collect()
    }

    fn spawn_side_fetch(&self, side: Side, key: SeriesKey) -> JoinHandle<()> {
        let api = self.api.clone();
        let state = self.state.clone();
        let events = self.events.clone();
        let hours = self.config.comparison_hours;

        tokio::spawn(async move {
            let update = fetch_side(api.as_ref(), side, key, hours).await;
            let applied = state
                .write()
                .await
                .comparison
                .as_mut()
                .map(|cmp| cmp.apply(update));

            match applied {
                Some(Ok(())) => {
                    let _ = events.send(DashboardEvent::SideUpdated(side));
                }
                Some(Err(e)) => {
                    tracing::error!(
                        side = side.as_str(),
                        error = %e,
                        "Error fetching comparison chart"
                    );
                    let _ = events.send(DashboardEvent::SideFailed {
                        side,
                        error: e.to_string(),
                    });
                }
                None => {
                    tracing::debug!(side = side.as_str(), "Comparison closed before chart arrived");
                }
            }
        })
    }
}
