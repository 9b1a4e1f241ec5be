use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use hp_trends_core::{
    cohort::CohortComparison,
    config::Config,
    db,
    pipelines::{self, ImprovementReport},
    render::RETEST_LABELS,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Athlete performance-test trend reports", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// TOML configuration file (must exist). Without it, ./hp-trends.toml is
    /// read when present and built-in defaults are used otherwise
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory the charts are written to (overrides the config file)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Average peak takeoff force improvement across retests (bar + line chart)
    Improvement,
    /// Compare pitch-speed cohorts on seven metrics (radar chart)
    Radar,
    /// Run both reports
    All,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.global)?;
    let pool = connect_pool().await?;

    let outcome = match cli.command {
        Command::Improvement => handle_improvement(&pool, &config).await,
        Command::Radar => handle_radar(&pool, &config).await,
        Command::All => match handle_improvement(&pool, &config).await {
            Ok(()) => handle_radar(&pool, &config).await,
            Err(err) => Err(err),
        },
    };

    pool.close().await;
    outcome
}

fn load_config(args: &GlobalArgs) -> Result<Config> {
    let path = args.config.as_deref();
    let mut config = Config::load(path).with_context(|| match path {
        Some(path) => format!("failed to load config from {}", path.display()),
        None => "failed to load default configuration".to_string(),
    })?;
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }
    Ok(config)
}

async fn connect_pool() -> Result<db::DbPool> {
    dotenvy::dotenv().ok();
    let database_url = db::database_url_from_env()
        .context("DATABASE_URL (or HP_TRENDS_DATABASE_URL) must be set")?;
    db::connect(&database_url)
        .await
        .context("failed to connect to the test database")
}

async fn handle_improvement(pool: &db::DbPool, config: &Config) -> Result<()> {
    let report = pipelines::run_improvement(pool, config)
        .await
        .context("improvement report failed")?;
    println!("{}", improvement_table(&report));
    info!(
        path = %config.improvement_chart_path().display(),
        "Improvement report complete"
    );
    Ok(())
}

async fn handle_radar(pool: &db::DbPool, config: &Config) -> Result<()> {
    let comparison = pipelines::run_cohort(pool, config)
        .await
        .context("cohort report failed")?;
    println!("{}", cohort_table(&comparison));
    info!(
        path = %config.radar_chart_path().display(),
        "Cohort report complete"
    );
    Ok(())
}

fn improvement_table(report: &ImprovementReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Assessment",
        "Avg increase (N)",
        "Athletes",
        "Avg increase, outliers removed (N)",
        "Athletes, outliers removed",
    ]);
    for (idx, label) in RETEST_LABELS.iter().enumerate() {
        table.add_row(vec![
            label.to_string(),
            format!("{:.2}", report.before_outliers.averages[idx]),
            report.before_outliers.counts[idx].to_string(),
            format!("{:.2}", report.after_outliers.averages[idx]),
            report.after_outliers.counts[idx].to_string(),
        ]);
    }
    table
}

fn cohort_table(comparison: &CohortComparison) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Metric".to_string(),
        "Min".to_string(),
        format!("Avg {}+ mph (n={})", comparison.lower.min_speed_mph, comparison.lower.size),
        format!("Avg {}+ mph (n={})", comparison.upper.min_speed_mph, comparison.upper.size),
        format!("{}+ %", comparison.lower.min_speed_mph),
        format!("{}+ %", comparison.upper.min_speed_mph),
    ]);
    for metric in &comparison.metrics {
        table.add_row(vec![
            metric.metric.label.to_string(),
            format!("{:.1}", metric.min),
            format!("{:.1}", metric.lower_mean),
            format!("{:.1}", metric.upper_mean),
            format!("{:.1}", metric.normalized_lower),
            format!("{:.1}", metric.normalized_upper),
        ]);
    }
    table
}
