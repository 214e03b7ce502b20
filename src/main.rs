//! DataDash watcher
//!
//! Polls the backend on the configured interval and prints the dashboard
//! (summary cards plus the trend chart, or the comparison view) after
//! every update.

use anyhow::Context;
use clap::Parser;
use datadash::dashboard::render_dashboard;
use datadash::{
    logging, ClientConfig, Config, Dashboard, DashboardClient, DashboardEvent, DashboardFilter,
    PollScheduler, SourceType,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

#[derive(Parser)]
#[command(name = "datadash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal dashboard for crypto, stock, weather and currency readings")]
struct Args {
    /// Config file (default: search the usual locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend URL, overrides the config
    #[arg(long)]
    api_url: Option<String>,

    /// Only show one source type
    #[arg(long)]
    source: Option<SourceType>,

    /// Only show one symbol
    #[arg(long)]
    symbol: Option<String>,

    /// Start in comparison mode
    #[arg(long)]
    compare: bool,

    /// Fetch once, print, and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &args.api_url {
        config.api.base_url = url.clone();
    }

    logging::init(&config.logging);
    tracing::info!("DataDash v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(api = %config.api.base_url, "Using backend");

    let client = DashboardClient::new(ClientConfig::from(&config.api))
        .context("Failed to create API client")?;

    let mut filter = DashboardFilter::new();
    filter.set_source(args.source);
    filter.set_symbol(args.symbol.clone());

    let dashboard = Arc::new(Dashboard::with_filter(
        Arc::new(client),
        config.dashboard.clone(),
        filter,
    ));

    if args.once {
        run_once(&dashboard, args.compare).await
    } else {
        watch(dashboard, args.compare).await
    }
}

async fn run_once(dashboard: &Dashboard, compare: bool) -> anyhow::Result<()> {
    if !dashboard.refresh().await {
        anyhow::bail!("Failed to fetch dashboard data");
    }

    if compare {
        match dashboard.enter_comparison().await {
            Some(handles) => {
                for handle in handles {
                    handle.await?;
                }
            }
            None => tracing::warn!("Comparison needs at least two series"),
        }
    }

    print!("{}", render_dashboard(&dashboard.snapshot().await, dashboard.config().chart_hours));
    Ok(())
}

async fn watch(dashboard: Arc<Dashboard>, compare: bool) -> anyhow::Result<()> {
    let mut events = dashboard.subscribe();
    let scheduler = Arc::new(PollScheduler::from_config(dashboard.clone(), dashboard.config()));
    let handle = scheduler.clone().start();
    let mut pending_compare = compare;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(DashboardEvent::RefreshFailed(error)) => {
                    eprintln!("Refresh failed: {}", error);
                }
                Ok(DashboardEvent::SideFailed { side, error }) => {
                    eprintln!("Comparison {} side failed: {}", side.as_str(), error);
                }
                Ok(DashboardEvent::Refreshed) if pending_compare => {
                    pending_compare = false;
                    if dashboard.enter_comparison().await.is_none() {
                        tracing::warn!("Comparison needs at least two series");
                    }
                    draw(&dashboard).await;
                }
                Ok(_) => draw(&dashboard).await,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Dropped dashboard events");
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down...");
                break;
            }
        }
    }

    scheduler.stop();
    handle.await?;
    Ok(())
}

async fn draw(dashboard: &Dashboard) {
    let screen = render_dashboard(&dashboard.snapshot().await, dashboard.config().chart_hours);
    if std::io::stdout().is_terminal() {
        // Clear screen and move the cursor home
        print!("\x1B[2J\x1B[H");
    }
    print!("{}", screen);
}
