use polars::prelude::*;

use hp_trends_core::cleaning::clean_test_records;
use hp_trends_core::columns::{ATHLETE_ID, ATHLETE_NAME, PEAK_TAKEOFF_FORCE, TEST_DATE};
use hp_trends_core::source::{test_records_frame, TestRecord};

fn record(id: &str, name: &str, date: Option<&str>, force: Option<f64>) -> TestRecord {
    TestRecord {
        athlete: Some(id.to_string()),
        athlete_name: Some(name.to_string()),
        test_date: date.map(str::to_string),
        peak_takeoff_force: force,
    }
}

fn names(df: &DataFrame) -> Vec<String> {
    df.column(ATHLETE_NAME)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|name| name.unwrap_or_default().to_string())
        .collect()
}

fn forces(df: &DataFrame) -> Vec<Option<f64>> {
    df.column(PEAK_TAKEOFF_FORCE)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

fn dates(df: &DataFrame) -> Vec<Option<String>> {
    df.column(TEST_DATE)
        .unwrap()
        .cast(&DataType::String)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|d| d.map(str::to_string))
        .collect()
}

#[test]
fn single_qualifying_test_excludes_athlete() -> PolarsResult<()> {
    let raw = test_records_frame(&[
        record("1", "Solo", Some("2024-01-01"), Some(100.0)),
        record("2", "Pair", Some("2024-01-01"), Some(200.0)),
        record("2", "Pair", Some("2024-02-01"), Some(210.0)),
        // Two rows, but only one has a reading.
        record("3", "Half", Some("2024-01-01"), Some(300.0)),
        record("3", "Half", Some("2024-02-01"), None),
    ])
    .unwrap();

    let cleaned = clean_test_records(&raw, &[]).unwrap();
    assert_eq!(names(&cleaned), vec!["Pair", "Pair"]);
    Ok(())
}

#[test]
fn output_is_projected_and_sorted_by_name_then_date() -> PolarsResult<()> {
    let raw = test_records_frame(&[
        record("2", "Bea", Some("2024-03-01"), Some(3.0)),
        record("1", "Al", Some("2024-02-01"), Some(2.0)),
        record("2", "Bea", Some("2024-01-01"), Some(1.0)),
        record("1", "Al", Some("2023-12-01"), Some(1.0)),
    ])
    .unwrap();

    let cleaned = clean_test_records(&raw, &[]).unwrap();
    let columns: Vec<String> = cleaned
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(
        columns,
        vec![ATHLETE_ID, ATHLETE_NAME, TEST_DATE, PEAK_TAKEOFF_FORCE]
    );
    assert_eq!(cleaned.column(TEST_DATE)?.dtype(), &DataType::Date);
    assert_eq!(names(&cleaned), vec!["Al", "Al", "Bea", "Bea"]);
    assert_eq!(
        dates(&cleaned),
        vec![
            Some("2023-12-01".to_string()),
            Some("2024-02-01".to_string()),
            Some("2024-01-01".to_string()),
            Some("2024-03-01".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn unparsable_dates_sort_after_dated_tests() -> PolarsResult<()> {
    let raw = test_records_frame(&[
        record("1", "Cy", Some("not a date"), Some(99.0)),
        record("1", "Cy", Some("2024-05-01"), Some(20.0)),
        record("1", "Cy", None, Some(98.0)),
        record("1", "Cy", Some("2024-01-01"), Some(10.0)),
    ])
    .unwrap();

    let cleaned = clean_test_records(&raw, &[]).unwrap();
    assert_eq!(cleaned.height(), 4);
    assert_eq!(
        forces(&cleaned),
        vec![Some(10.0), Some(20.0), Some(99.0), Some(98.0)]
    );
    assert_eq!(cleaned.column(TEST_DATE)?.null_count(), 2);
    Ok(())
}

#[test]
fn excluded_names_never_appear() -> PolarsResult<()> {
    let raw = test_records_frame(&[
        record("1", "Zack Jones", Some("2024-01-01"), Some(1.0)),
        record("1", "Zack Jones", Some("2024-02-01"), Some(2.0)),
        record("1", "Zack Jones", Some("2024-03-01"), Some(3.0)),
        record("2", "Zack Jonesy", Some("2024-01-01"), Some(1.0)),
        record("2", "Zack Jonesy", Some("2024-02-01"), Some(2.0)),
    ])
    .unwrap();

    let cleaned = clean_test_records(&raw, &["Zack Jones".to_string()]).unwrap();
    assert_eq!(names(&cleaned), vec!["Zack Jonesy", "Zack Jonesy"]);
    Ok(())
}

#[test]
fn rows_without_a_name_are_dropped() -> PolarsResult<()> {
    let mut nameless = record("9", "", Some("2024-01-01"), Some(1.0));
    nameless.athlete_name = None;
    let raw = test_records_frame(&[nameless.clone(), nameless]).unwrap();

    let cleaned = clean_test_records(&raw, &[]).unwrap();
    assert_eq!(cleaned.height(), 0);
    Ok(())
}
