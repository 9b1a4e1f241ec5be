use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use tracing::{info, warn};

use crate::columns::{ATHLETE_ID, ATHLETE_NAME, PEAK_TAKEOFF_FORCE, TEST_DATE};
use crate::error::Result;

const TEST_DATE_FORMAT: &str = "%Y-%m-%d";
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Prepare raw test rows for the improvement report.
///
/// Steps run in this order, each one a total filter:
/// 1. drop rows without a finite peak takeoff force reading (`NaN` counts as missing)
/// 2. keep athletes with more than one remaining row (rows without a name go too)
/// 3. project to id, name, date, and peak takeoff force
/// 4. parse `test_date`; unparsable dates become null
/// 5. stable sort by (name, date) with null dates last
/// 6. drop athletes named in `excluded_athletes`
///
/// A row whose date could not be parsed is kept and ends up as that athlete's
/// latest test.
pub fn clean_test_records(df: &DataFrame, excluded_athletes: &[String]) -> Result<DataFrame> {
    let input_rows = df.height();

    let with_metric = drop_missing_readings(df)?;
    let repeated = retain_repeat_athletes(&with_metric)?;
    let projected = repeated.select([ATHLETE_ID, ATHLETE_NAME, TEST_DATE, PEAK_TAKEOFF_FORCE])?;
    let dated = parse_test_dates(&projected)?;
    let sorted = dated.sort(
        [ATHLETE_NAME, TEST_DATE],
        SortMultipleOptions::default()
            .with_maintain_order(true)
            .with_nulls_last(true),
    )?;
    let cleaned = drop_excluded_athletes(&sorted, excluded_athletes)?;

    info!(
        input_rows,
        with_metric = with_metric.height(),
        repeat_athletes = repeated.height(),
        output_rows = cleaned.height(),
        "Cleaned test records"
    );
    Ok(cleaned)
}

/// Drop rows whose peak takeoff force is null, `NaN` or infinite.
pub fn drop_missing_readings(df: &DataFrame) -> Result<DataFrame> {
    let forces = df.column(PEAK_TAKEOFF_FORCE)?.f64()?;
    let mask: BooleanChunked = forces
        .into_iter()
        .map(|force| force.is_some_and(f64::is_finite))
        .collect();
    Ok(df.filter(&mask)?)
}

/// Keep rows whose athlete name occurs more than once.
pub fn retain_repeat_athletes(df: &DataFrame) -> Result<DataFrame> {
    let names = df.column(ATHLETE_NAME)?.str()?;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names.into_iter().flatten() {
        *counts.entry(name).or_default() += 1;
    }

    let mask: BooleanChunked = names
        .into_iter()
        .map(|name| name.is_some_and(|n| counts.get(n).copied().unwrap_or(0) > 1))
        .collect();
    Ok(df.filter(&mask)?)
}

/// Replace the `test_date` text column with a `Date` column.
pub fn parse_test_dates(df: &DataFrame) -> Result<DataFrame> {
    let raw = df.column(TEST_DATE)?.str()?;
    let mut unparsable = 0usize;
    let days: Vec<Option<i32>> = raw
        .into_iter()
        .map(|value| {
            let parsed = value.and_then(parse_test_date);
            if value.is_some() && parsed.is_none() {
                unparsable += 1;
            }
            parsed.map(|date| date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
        })
        .collect();

    if unparsable > 0 {
        warn!(
            unparsable,
            "Test dates could not be parsed; those tests sort after dated ones"
        );
    }

    let dates = Series::new(TEST_DATE.into(), days).cast(&DataType::Date)?;
    let mut output = df.clone();
    output.with_column(dates)?;
    Ok(output)
}

pub fn parse_test_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, TEST_DATE_FORMAT).ok()
}

pub fn drop_excluded_athletes(df: &DataFrame, excluded_athletes: &[String]) -> Result<DataFrame> {
    if excluded_athletes.is_empty() {
        return Ok(df.clone());
    }

    let excluded: HashSet<&str> = excluded_athletes.iter().map(String::as_str).collect();
    let names = df.column(ATHLETE_NAME)?.str()?;
    let mask: BooleanChunked = names
        .into_iter()
        .map(|name| name.map_or(true, |n| !excluded.contains(n)))
        .collect();
    Ok(df.filter(&mask)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_force_is_a_missing_reading() {
        let df = df![
            PEAK_TAKEOFF_FORCE => [
                Some(10.0),
                Some(f64::NAN),
                None,
                Some(f64::NEG_INFINITY),
                Some(0.0),
            ],
        ]
        .unwrap();
        let kept = drop_missing_readings(&df).unwrap();
        let forces: Vec<Option<f64>> = kept
            .column(PEAK_TAKEOFF_FORCE)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(forces, vec![Some(10.0), Some(0.0)]);
    }

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(
            parse_test_date("2024-03-09"),
            NaiveDate::from_ymd_opt(2024, 3, 9)
        );
        assert_eq!(parse_test_date("03/09/2024"), None);
        assert_eq!(parse_test_date("2024-02-30"), None);
        assert_eq!(parse_test_date(""), None);
    }
}
