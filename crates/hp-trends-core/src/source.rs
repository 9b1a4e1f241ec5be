//! Loads test rows from the relational store into polars frames.

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use sqlx::{mysql::MySqlRow, Row};
use tracing::info;

use crate::columns::{
    quote_ident, ATHLETE_ID, ATHLETE_NAME, COHORT_METRICS, PEAK_TAKEOFF_FORCE, PITCH_SPEED,
    TEST_DATE,
};
use crate::db::DbPool;
use crate::error::Result;

/// One row of the improvement report's input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestRecord {
    pub athlete: Option<String>,
    pub athlete_name: Option<String>,
    /// ISO `YYYY-MM-DD` when the store holds a real date; free text otherwise.
    pub test_date: Option<String>,
    pub peak_takeoff_force: Option<f64>,
}

/// One row of the cohort report's input. `metrics` follows `COHORT_METRICS`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CohortRecord {
    pub metrics: [Option<f64>; 7],
    pub pitch_speed_mph: Option<f64>,
}

/// `SELECT *` from the test table, keeping the columns the improvement report reads.
pub async fn fetch_test_records(pool: &DbPool, table: &str) -> Result<DataFrame> {
    let sql = format!("SELECT * FROM {}", quote_table(table));
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    info!(rows = rows.len(), table, "Fetched test records");

    let records = rows
        .iter()
        .map(decode_test_record)
        .collect::<Result<Vec<_>>>()?;
    test_records_frame(&records)
}

/// Rows at or above `min_speed_mph`, restricted to the seven cohort metrics and pitch speed.
pub async fn fetch_cohort_records(
    pool: &DbPool,
    table: &str,
    min_speed_mph: f64,
) -> Result<DataFrame> {
    let sql = cohort_query(table);
    let rows = sqlx::query(&sql)
        .bind(min_speed_mph)
        .fetch_all(pool)
        .await?;
    info!(rows = rows.len(), min_speed_mph, "Fetched cohort records");

    let records = rows
        .iter()
        .map(decode_cohort_record)
        .collect::<Result<Vec<_>>>()?;
    cohort_records_frame(&records)
}

pub fn cohort_query(table: &str) -> String {
    let mut columns: Vec<String> = COHORT_METRICS
        .iter()
        .map(|metric| quote_ident(metric.column))
        .collect();
    columns.push(quote_ident(PITCH_SPEED));

    format!(
        "SELECT {} FROM {} WHERE {} >= ?",
        columns.join(", "),
        quote_table(table),
        quote_ident(PITCH_SPEED)
    )
}

/// Quote `table` or `schema.table`.
pub fn quote_table(table: &str) -> String {
    table
        .split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}

pub fn test_records_frame(records: &[TestRecord]) -> Result<DataFrame> {
    let df = df![
        ATHLETE_ID => records.iter().map(|r| r.athlete.clone()).collect::<Vec<_>>(),
        ATHLETE_NAME => records.iter().map(|r| r.athlete_name.clone()).collect::<Vec<_>>(),
        TEST_DATE => records.iter().map(|r| r.test_date.clone()).collect::<Vec<_>>(),
        PEAK_TAKEOFF_FORCE => records
            .iter()
            .map(|r| finite(r.peak_takeoff_force))
            .collect::<Vec<_>>(),
    ]?;
    Ok(df)
}

pub fn cohort_records_frame(records: &[CohortRecord]) -> Result<DataFrame> {
    let mut columns: Vec<Column> = COHORT_METRICS
        .iter()
        .enumerate()
        .map(|(idx, metric)| {
            let values: Vec<Option<f64>> =
                records.iter().map(|r| finite(r.metrics[idx])).collect();
            Series::new(metric.column.into(), values).into()
        })
        .collect();
    columns.push(
        Series::new(
            PITCH_SPEED.into(),
            records
                .iter()
                .map(|r| finite(r.pitch_speed_mph))
                .collect::<Vec<_>>(),
        )
        .into(),
    );
    Ok(DataFrame::new(columns)?)
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn decode_test_record(row: &MySqlRow) -> Result<TestRecord> {
    Ok(TestRecord {
        athlete: get_text(row, ATHLETE_ID)?,
        athlete_name: get_text(row, ATHLETE_NAME)?,
        test_date: get_date_text(row, TEST_DATE)?,
        peak_takeoff_force: get_f64(row, PEAK_TAKEOFF_FORCE)?,
    })
}

fn decode_cohort_record(row: &MySqlRow) -> Result<CohortRecord> {
    let mut metrics = [None; 7];
    for (slot, metric) in metrics.iter_mut().zip(COHORT_METRICS.iter()) {
        *slot = get_f64(row, metric.column)?;
    }
    Ok(CohortRecord {
        metrics,
        pitch_speed_mph: get_f64(row, PITCH_SPEED)?,
    })
}

// A missing column is fatal; a type other than the preferred one falls through
// to the next decoder.
fn get_f64(row: &MySqlRow, column: &str) -> Result<Option<f64>> {
    match row.try_get::<Option<f64>, _>(column) {
        Ok(value) => return Ok(value),
        Err(sqlx::Error::ColumnDecode { .. }) => {}
        Err(err) => return Err(err.into()),
    }
    if let Ok(value) = row.try_get::<Option<f32>, _>(column) {
        return Ok(value.map(f64::from));
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(column) {
        return Ok(value.map(|v| v as f64));
    }
    if let Ok(value) = row.try_get::<Option<u64>, _>(column) {
        return Ok(value.map(|v| v as f64));
    }
    // DECIMAL arrives as text on the wire.
    let text: Option<String> = row.try_get_unchecked(column)?;
    Ok(text.and_then(|t| t.trim().parse::<f64>().ok()))
}

fn get_text(row: &MySqlRow, column: &str) -> Result<Option<String>> {
    match row.try_get::<Option<String>, _>(column) {
        Ok(value) => return Ok(value),
        Err(sqlx::Error::ColumnDecode { .. }) => {}
        Err(err) => return Err(err.into()),
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(column) {
        return Ok(value.map(|v| v.to_string()));
    }
    let value: Option<u64> = row.try_get(column)?;
    Ok(value.map(|v| v.to_string()))
}

fn get_date_text(row: &MySqlRow, column: &str) -> Result<Option<String>> {
    match row.try_get::<Option<NaiveDate>, _>(column) {
        Ok(value) => return Ok(value.map(|d| d.format("%Y-%m-%d").to_string())),
        Err(sqlx::Error::ColumnDecode { .. }) => {}
        Err(err) => return Err(err.into()),
    }
    if let Ok(value) = row.try_get::<Option<NaiveDateTime>, _>(column) {
        return Ok(value.map(|dt| dt.date().format("%Y-%m-%d").to_string()));
    }
    get_text(row, column)
}
