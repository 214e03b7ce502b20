//! DataDash CLI
//!
//! One-shot commands against the DataDash backend:
//! - Show reconciled summaries
//! - Show a chart series or raw data points
//! - Compare two series
//! - Manage alert rules

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use datadash::analysis::{compare, prepare_chart, Selection};
use datadash::dashboard::format::{format_change_percent, format_current_value, format_updated_at};
use datadash::dashboard::render::{render_chart, render_comparison_result};
use datadash::{
    logging, reconcile_summaries, AlertCondition, AlertQuery, AlertUpdate, ChartData, Config,
    DashboardApi, DashboardClient, DashboardFilter, NewAlert, SeriesKey, SeriesQuery, SourceType,
    SummaryData,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "datadash-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Command-line access to the DataDash backend")]
#[command(long_about = "Query crypto, stock, weather and currency readings from a DataDash \
    backend,\ncompare two series, and manage alert rules.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: search the usual locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Latest value per series
    Summary {
        /// Source type (crypto, stock, weather, currency)
        #[arg(short, long)]
        source: Option<SourceType>,
        /// Symbol
        #[arg(long)]
        symbol: Option<String>,
    },

    /// Chart series for the last N hours
    Chart {
        #[arg(short, long)]
        source: Option<SourceType>,
        #[arg(long)]
        symbol: Option<String>,
        /// Lookback window in hours
        #[arg(long, default_value = "24")]
        hours: u32,
    },

    /// Raw data points
    Points {
        #[arg(short, long)]
        source: Option<SourceType>,
        #[arg(long)]
        symbol: Option<String>,
        /// Lookback window in hours (default: backend default)
        #[arg(long)]
        hours: Option<u32>,
    },

    /// Compare the current values and charts of two series
    Compare {
        left_source: SourceType,
        left_symbol: String,
        right_source: SourceType,
        right_symbol: String,
        /// Lookback window in hours
        #[arg(long, default_value = "24")]
        hours: u32,
    },

    /// Manage alert rules
    Alerts {
        #[command(subcommand)]
        command: AlertCommands,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum AlertCommands {
    /// List alert rules
    List {
        #[arg(short, long)]
        source: Option<SourceType>,
        #[arg(long)]
        symbol: Option<String>,
        /// Only active (true) or inactive (false) rules
        #[arg(long)]
        active: Option<bool>,
    },

    /// Create an alert rule
    Create {
        source: SourceType,
        symbol: String,
        /// above, below, change_up, change_down
        condition: AlertCondition,
        threshold: String,
        #[arg(long, default_value = "")]
        email: String,
        /// Create the rule disabled
        #[arg(long)]
        inactive: bool,
    },

    /// Change fields of an alert rule
    Update {
        id: i64,
        #[arg(long)]
        condition: Option<AlertCondition>,
        #[arg(long)]
        threshold: Option<String>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        email: Option<String>,
    },

    /// Delete an alert rule
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_ref());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    logging::init(&config.logging);

    let client = DashboardClient::new((&config.api).into()).context("Failed to create API client")?;
    let format = cli.format;

    match cli.command {
        Commands::Summary { source, symbol } => {
            let summaries = reconcile_summaries(client.summary().await?);
            let mut filter = DashboardFilter::new();
            filter.set_source(source);
            filter.set_symbol(symbol);
            let rows: Vec<SummaryData> = summaries
                .into_iter()
                .filter(|s| filter.matches(s))
                .collect();

            match format {
                OutputFormat::Json => print_json(&rows)?,
                OutputFormat::Csv => print_csv(&rows)?,
                OutputFormat::Table => print_summary_table(&rows),
            }
        }

        Commands::Chart {
            source,
            symbol,
            hours,
        } => {
            let query = series_query(source, symbol, Some(hours));
            let data = client.chart_data(&query).await?;

            match format {
                OutputFormat::Json => print_json(&prepare_chart(&data))?,
                OutputFormat::Csv => print_csv(&data)?,
                OutputFormat::Table => {
                    let title = chart_title(&query, hours);
                    print!("{}", render_chart(&title, &prepare_chart(&data)));
                }
            }
        }

        Commands::Points {
            source,
            symbol,
            hours,
        } => {
            let page = client.list_data_points(&series_query(source, symbol, hours)).await?;

            match format {
                OutputFormat::Json => print_json(&page)?,
                OutputFormat::Csv => {
                    let rows: Vec<ChartData> = page
                        .results
                        .iter()
                        .map(|p| {
                            ChartData::new(p.timestamp.clone(), p.value.clone(), p.symbol.clone())
                        })
                        .collect();
                    print_csv(&rows)?;
                }
                OutputFormat::Table => {
                    if page.results.is_empty() {
                        println!("No data points for the selected filter");
                    } else {
                        println!(
                            "{:<8} {:<22} {:<10} {:<10} {}",
                            "ID", "Timestamp", "Source", "Symbol", "Value"
                        );
                        println!("{}", "-".repeat(70));
                        for point in &page.results {
                            println!(
                                "{:<8} {:<22} {:<10} {:<10} {}",
                                point.id,
                                format_updated_at(&point.timestamp),
                                point.source_type,
                                point.symbol,
                                format_current_value(point.source_type, &point.value)
                            );
                        }
                        if let Some(count) = page.count {
                            println!();
                            println!("Showing {} of {}", page.results.len(), count);
                        }
                    }
                }
            }
        }

        Commands::Compare {
            left_source,
            left_symbol,
            right_source,
            right_symbol,
            hours,
        } => {
            let left = SeriesKey::new(left_source, left_symbol);
            let right = SeriesKey::new(right_source, right_symbol);
            run_compare(&client, &left, &right, hours, format).await?;
        }

        Commands::Alerts { command } => run_alerts(&client, command, format).await?,

        Commands::Config { .. } => {}
    }

    Ok(())
}

fn series_query(
    source: Option<SourceType>,
    symbol: Option<String>,
    hours: Option<u32>,
) -> SeriesQuery {
    SeriesQuery {
        source_type: source,
        symbol: symbol.filter(|s| !s.is_empty()),
        hours,
    }
}

fn chart_title(query: &SeriesQuery, hours: u32) -> String {
    let mut title = query
        .source_type
        .map(|s| s.title().to_string())
        .unwrap_or_else(|| "All Data".to_string());
    if let Some(symbol) = &query.symbol {
        title.push_str(&format!(" - {}", symbol));
    }
    format!("{} Trend ({}h)", title, hours)
}

#[derive(Serialize)]
struct CompareOutput<'a> {
    left: &'a SeriesKey,
    right: &'a SeriesKey,
    comparison: Option<datadash::Comparison>,
    left_chart: datadash::ChartView,
    right_chart: datadash::ChartView,
}

async fn run_compare(
    client: &DashboardClient,
    left: &SeriesKey,
    right: &SeriesKey,
    hours: u32,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let left_query = SeriesQuery::for_key(left).hours(hours);
    let right_query = SeriesQuery::for_key(right).hours(hours);

    let (summaries, left_chart, right_chart) = tokio::join!(
        client.summary(),
        client.chart_data(&left_query),
        client.chart_data(&right_query),
    );
    let summaries = reconcile_summaries(summaries?);

    // A failed side still lets the other side and the numbers print
    let left_chart = left_chart.unwrap_or_else(|e| {
        tracing::error!(series = %left, error = %e, "Error fetching comparison chart");
        Vec::new()
    });
    let right_chart = right_chart.unwrap_or_else(|e| {
        tracing::error!(series = %right, error = %e, "Error fetching comparison chart");
        Vec::new()
    });

    let comparison = compare(&summaries, &Selection::of(left), &Selection::of(right));

    match format {
        OutputFormat::Json => print_json(&CompareOutput {
            left,
            right,
            comparison,
            left_chart: prepare_chart(&left_chart),
            right_chart: prepare_chart(&right_chart),
        })?,
        OutputFormat::Csv => print_csv(&comparison.into_iter().collect::<Vec<_>>())?,
        OutputFormat::Table => {
            print!("{}", render_chart(&left.to_string(), &prepare_chart(&left_chart)));
            println!();
            print!("{}", render_chart(&right.to_string(), &prepare_chart(&right_chart)));
            println!();
            match comparison {
                Some(result) => println!(
                    "{}",
                    render_comparison_result(&left.to_string(), &right.to_string(), &result)
                ),
                None => println!("No current value for one of the series"),
            }
        }
    }
    Ok(())
}

async fn run_alerts(
    client: &DashboardClient,
    command: AlertCommands,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match command {
        AlertCommands::List {
            source,
            symbol,
            active,
        } => {
            let query = AlertQuery {
                source_type: source,
                symbol,
                is_active: active,
            };
            let page = client.list_alerts(&query).await?;

            match format {
                OutputFormat::Json => print_json(&page)?,
                OutputFormat::Csv => print_csv(&page.results)?,
                OutputFormat::Table => {
                    if page.results.is_empty() {
                        println!("No alert rules defined.");
                        println!();
                        println!("Create one with:");
                        println!("  datadash-cli alerts create crypto BTC above 50000");
                        return Ok(());
                    }
                    println!(
                        "{:<6} {:<10} {:<10} {:<12} {:<14} {:<7} {}",
                        "ID",
                        "Source",
                        "Symbol",
                        "Condition",
                        "Threshold",
                        "Active",
                        "Last triggered"
                    );
                    println!("{}", "-".repeat(80));
                    for alert in &page.results {
                        println!(
                            "{:<6} {:<10} {:<10} {:<12} {:<14} {:<7} {}",
                            alert.id,
                            alert.source_type,
                            alert.symbol,
                            alert.condition,
                            alert.threshold_value,
                            if alert.is_active { "yes" } else { "no" },
                            alert
                                .last_triggered
                                .as_deref()
                                .map(format_updated_at)
                                .unwrap_or_else(|| "-".to_string())
                        );
                    }
                }
            }
        }

        AlertCommands::Create {
            source,
            symbol,
            condition,
            threshold,
            email,
            inactive,
        } => {
            let mut alert = NewAlert::new(source, symbol, condition, threshold).email(email);
            if inactive {
                alert = alert.inactive();
            }
            let created = client.create_alert(&alert).await?;
            match format {
                OutputFormat::Json => print_json(&created)?,
                _ => println!(
                    "Created alert {}: {} ({}) {} {}",
                    created.id,
                    created.symbol,
                    created.source_type,
                    created.condition,
                    created.threshold_value
                ),
            }
        }

        AlertCommands::Update {
            id,
            condition,
            threshold,
            active,
            email,
        } => {
            let update = AlertUpdate {
                condition,
                threshold_value: threshold,
                is_active: active,
                email,
                ..Default::default()
            };
            if update.is_empty() {
                anyhow::bail!(
                    "Nothing to update. Pass at least one of --condition, --threshold, \
                     --active, --email"
                );
            }
            let updated = client.update_alert(id, &update).await?;
            match format {
                OutputFormat::Json => print_json(&updated)?,
                _ => println!("Updated alert {}", updated.id),
            }
        }

        AlertCommands::Delete { id } => {
            client.delete_alert(id).await?;
            println!("Deleted alert {}", id);
        }
    }
    Ok(())
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let config = datadash::config::generate_default_config();

    match output {
        Some(path) => {
            // Create parent directory if needed
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", config),
    }
    Ok(())
}

fn print_summary_table(rows: &[SummaryData]) {
    if rows.is_empty() {
        println!("No data available");
        return;
    }

    println!(
        "{:<10} {:<15} {:>16} {:>10} {:<14} {}",
        "Symbol", "Source", "Value", "24h", "Updated", "Points"
    );
    println!("{}", "-".repeat(80));

    for row in rows {
        println!(
            "{:<10} {:<15} {:>16} {:>10} {:<14} {}",
            row.symbol,
            row.source_type.label(),
            format_current_value(row.source_type, &row.current_value),
            format_change_percent(row.change_24h_percent.as_deref()),
            format_updated_at(&row.last_updated),
            row.total_data_points
        );
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_csv<T: Serialize>(rows: &[T]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
