use std::collections::BTreeMap;

use polars::prelude::*;

use crate::columns::{
    ATHLETE_NAME, DIFF_1_2, DIFF_1_3, DIFF_1_4, DIFF_COLUMNS, PEAK_TAKEOFF_FORCE, TEST_COLUMNS,
};
use crate::error::Result;
use crate::stats;

/// One athlete's peak takeoff force readings in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySeries {
    pub athlete_name: String,
    pub values: Vec<f64>,
}

/// First four tests of an athlete and the change from the first test to each later one.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityImprovement {
    pub athlete_name: String,
    pub tests: [Option<f64>; 4],
    pub diff_1_2: Option<f64>,
    pub diff_1_3: Option<f64>,
    pub diff_1_4: Option<f64>,
}

/// The `n`th (1-based) value of a chronologically ordered series.
pub fn nth_test(values: &[f64], n: usize) -> Option<f64> {
    n.checked_sub(1).and_then(|idx| values.get(idx).copied())
}

fn difference(later: Option<f64>, first: Option<f64>) -> Option<f64> {
    Some(later? - first?)
}

impl EntityImprovement {
    pub fn from_series(series: &EntitySeries) -> Self {
        let tests = [1, 2, 3, 4].map(|n| nth_test(&series.values, n));
        Self {
            athlete_name: series.athlete_name.clone(),
            diff_1_2: difference(tests[1], tests[0]),
            diff_1_3: difference(tests[2], tests[0]),
            diff_1_4: difference(tests[3], tests[0]),
            tests,
        }
    }
}

/// Group a cleaned frame by athlete name, preserving row order within each athlete.
///
/// The frame must already be sorted chronologically per athlete. Rows with a
/// null name or a missing or non-finite reading are skipped. Output is ordered
/// by name.
pub fn athlete_series(cleaned: &DataFrame) -> Result<Vec<EntitySeries>> {
    let names = cleaned.column(ATHLETE_NAME)?.str()?;
    let values = cleaned.column(PEAK_TAKEOFF_FORCE)?.f64()?;

    let mut grouped: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (name, value) in names.into_iter().zip(values) {
        if let (Some(name), Some(value)) = (name, value.filter(|v| v.is_finite())) {
            grouped.entry(name).or_default().push(value);
        }
    }

    Ok(grouped
        .into_iter()
        .map(|(name, values)| EntitySeries {
            athlete_name: name.to_string(),
            values,
        })
        .collect())
}

/// One row per athlete: name, Test1..Test4, diff_1_2, diff_1_3, diff_1_4.
pub fn improvement_table(improvements: &[EntityImprovement]) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(8);
    columns.push(
        Series::new(
            ATHLETE_NAME.into(),
            improvements
                .iter()
                .map(|row| row.athlete_name.as_str())
                .collect::<Vec<_>>(),
        )
        .into(),
    );
    for (idx, name) in TEST_COLUMNS.iter().enumerate() {
        let values: Vec<Option<f64>> = improvements.iter().map(|row| row.tests[idx]).collect();
        columns.push(Series::new((*name).into(), values).into());
    }
    columns.push(
        Series::new(
            DIFF_1_2.into(),
            improvements.iter().map(|row| row.diff_1_2).collect::<Vec<_>>(),
        )
        .into(),
    );
    columns.push(
        Series::new(
            DIFF_1_3.into(),
            improvements.iter().map(|row| row.diff_1_3).collect::<Vec<_>>(),
        )
        .into(),
    );
    columns.push(
        Series::new(
            DIFF_1_4.into(),
            improvements.iter().map(|row| row.diff_1_4).collect::<Vec<_>>(),
        )
        .into(),
    );

    Ok(DataFrame::new(columns)?)
}

/// Cleaned test rows -> per-athlete improvement table.
pub fn derive_improvements(cleaned: &DataFrame) -> Result<DataFrame> {
    let improvements: Vec<EntityImprovement> = athlete_series(cleaned)?
        .iter()
        .map(EntityImprovement::from_series)
        .collect();
    improvement_table(&improvements)
}

/// Average improvement per retest and how many athletes contributed to each.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImprovementSummary {
    /// Means of diff_1_2, diff_1_3, diff_1_4. `NaN` where no athlete has the value.
    pub averages: [f64; 3],
    pub counts: [usize; 3],
}

impl ImprovementSummary {
    pub fn from_table(table: &DataFrame) -> Result<Self> {
        let mut averages = [f64::NAN; 3];
        let mut counts = [0usize; 3];
        for (idx, column) in DIFF_COLUMNS.iter().enumerate() {
            averages[idx] = stats::column_mean(table, column)?;
            counts[idx] = stats::column_count(table, column)?;
        }
        Ok(Self { averages, counts })
    }
}
