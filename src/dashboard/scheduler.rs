//! Poll Scheduler
//!
//! Re-runs the dashboard fetch cycle on a fixed interval. The first
//! cycle starts immediately. Each tick spawns its own refresh, so a slow
//! backend can have several cycles in flight at once.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;

use super::controller::Dashboard;
use crate::config::DashboardConfig;

/// Shortest accepted polling interval
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Current state of the poller
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchedulerStatus {
    pub running: bool,
    pub ticks: u64,
    pub last_tick: Option<DateTime<Utc>>,
}

/// Periodic refresh driver for a [`Dashboard`]
pub struct PollScheduler {
    dashboard: Arc<Dashboard>,
    interval: Duration,
    status: Arc<RwLock<SchedulerStatus>>,
    shutdown: watch::Sender<bool>,
}

impl PollScheduler {
    pub fn new(dashboard: Arc<Dashboard>, interval: Duration) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            dashboard,
            interval: interval.max(MIN_INTERVAL),
            status: Arc::new(RwLock::new(SchedulerStatus::default())),
            shutdown,
        }
    }

    pub fn from_config(dashboard: Arc<Dashboard>, config: &DashboardConfig) -> Self {
        Self::new(dashboard, Duration::from_secs(config.refresh_interval_secs))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn status(&self) -> SchedulerStatus {
        self.status.read().await.clone()
    }

    /// Start the polling loop
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        self.shutdown.send_replace(false);
        let mut shutdown = self.shutdown.subscribe();

        tokio::spawn(async move {
            self.status.write().await.running = true;
            tracing::info!(interval_secs = self.interval.as_secs(), "Poll scheduler started");

            let mut ticker = tokio::time::interval(self.interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => self.tick().await,
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            self.status.write().await.running = false;
            tracing::info!("Poll scheduler stopped");
        })
    }

    /// Stop the polling loop; refreshes already in flight still finish
    pub fn stop(&self) {
        self.shutdown.send_replace(true);
    }

    async fn tick(&self) {
        {
            let mut status = self.status.write().await;
            status.ticks += 1;
            status.last_tick = Some(Utc::now());
        }

        let dashboard = self.dashboard.clone();
        tokio::spawn(async move {
            if !dashboard.refresh().await {
                tracing::warn!("Scheduled refresh failed");
            }
        });
    }
}
