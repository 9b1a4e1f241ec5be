//! End-to-end report runs: fetch, derive, render.

use polars::prelude::DataFrame;
use tracing::info;

use crate::{
    cleaning::clean_test_records,
    cohort::{compare_cohorts, CohortComparison},
    columns::DIFF_COLUMNS,
    config::Config,
    db::DbPool,
    error::Result,
    improvement::{derive_improvements, ImprovementSummary},
    outliers::{remove_outliers, OutlierPass},
    render, source,
};

#[derive(Debug, Clone)]
pub struct ImprovementReport {
    pub cleaned_rows: usize,
    pub athletes: usize,
    pub before_outliers: ImprovementSummary,
    pub after_outliers: ImprovementSummary,
    pub passes: Vec<OutlierPass>,
    /// Per-athlete rows that survived every outlier pass.
    pub table: DataFrame,
}

/// Raw test rows -> improvement averages before and after outlier removal.
pub fn improvement_report(
    raw: &DataFrame,
    excluded_athletes: &[String],
) -> Result<ImprovementReport> {
    let cleaned = clean_test_records(raw, excluded_athletes)?;
    let table = derive_improvements(&cleaned)?;

    let before_outliers = ImprovementSummary::from_table(&table)?;
    log_summary("Average increase from Test1", &before_outliers);

    let (filtered, passes) = remove_outliers(&table, &DIFF_COLUMNS)?;
    let after_outliers = ImprovementSummary::from_table(&filtered)?;
    log_summary(
        "Average increase from Test1 (post-outlier-removal)",
        &after_outliers,
    );

    Ok(ImprovementReport {
        cleaned_rows: cleaned.height(),
        athletes: table.height(),
        before_outliers,
        after_outliers,
        passes,
        table: filtered,
    })
}

fn log_summary(message: &str, summary: &ImprovementSummary) {
    let [avg_1_2, avg_1_3, avg_1_4] = summary.averages;
    let [count_1_2, count_1_3, count_1_4] = summary.counts;
    info!(
        avg_1_2,
        avg_1_3,
        avg_1_4,
        count_1_2,
        count_1_3,
        count_1_4,
        "{message}"
    );
}

pub async fn run_improvement(pool: &DbPool, config: &Config) -> Result<ImprovementReport> {
    let raw = source::fetch_test_records(pool, &config.table).await?;
    let report = improvement_report(&raw, &config.excluded_athletes)?;
    render::render_improvement_chart(
        &config.improvement_chart_path(),
        report.after_outliers.averages,
    )?;
    Ok(report)
}

pub async fn run_cohort(pool: &DbPool, config: &Config) -> Result<CohortComparison> {
    let records =
        source::fetch_cohort_records(pool, &config.table, config.cohort.lower_mph).await?;
    let comparison = compare_cohorts(&records, config.cohort.lower_mph, config.cohort.upper_mph)?;
    render::render_radar_chart(&config.radar_chart_path(), &comparison)?;
    Ok(comparison)
}
