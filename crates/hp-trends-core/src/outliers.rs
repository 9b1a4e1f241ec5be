use polars::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::stats;

/// Rows further than this many sample standard deviations from the mean are dropped.
pub const SIGMA_LIMIT: f64 = 3.0;

/// What one filtering pass saw and removed.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierPass {
    pub column: String,
    pub mean: f64,
    pub std: f64,
    pub lower: f64,
    pub upper: f64,
    pub rows_before: usize,
    pub rows_after: usize,
}

impl OutlierPass {
    pub fn removed(&self) -> usize {
        self.rows_before - self.rows_after
    }
}

/// Drop every row whose `column` value is outside `mean ± 3σ` of that column.
///
/// Bounds are inclusive. Rows with a null or `NaN` in `column` are dropped too,
/// and when σ is undefined (fewer than two values) no row survives.
pub fn filter_column(table: &DataFrame, column: &str) -> Result<(DataFrame, OutlierPass)> {
    let values = table.column(column)?.f64()?;
    let mean = stats::mean(values);
    let std = stats::sample_std(values);
    let lower = mean - SIGMA_LIMIT * std;
    let upper = mean + SIGMA_LIMIT * std;

    // Plain f64 comparisons so NaN bounds reject everything.
    let mask: BooleanChunked = values
        .into_iter()
        .map(|value| value.is_some_and(|v| v.is_finite() && v >= lower && v <= upper))
        .collect();
    let filtered = table.filter(&mask)?;

    let pass = OutlierPass {
        column: column.to_string(),
        mean,
        std,
        lower,
        upper,
        rows_before: table.height(),
        rows_after: filtered.height(),
    };
    debug!(
        column,
        mean,
        std,
        lower,
        upper,
        rows_before = pass.rows_before,
        rows_after = pass.rows_after,
        "Outlier pass"
    );
    Ok((filtered, pass))
}

/// Run [`filter_column`] for each column in order, each pass on the survivors
/// of the previous one. A row is removed as a whole, so order matters.
pub fn remove_outliers(table: &DataFrame, columns: &[&str]) -> Result<(DataFrame, Vec<OutlierPass>)> {
    let mut working = table.clone();
    let mut passes = Vec::with_capacity(columns.len());
    for column in columns {
        let (next, pass) = filter_column(&working, column)?;
        working = next;
        passes.push(pass);
    }
    Ok((working, passes))
}
