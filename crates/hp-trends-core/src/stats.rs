//! Descriptive statistics over nullable float columns.
//!
//! Nulls and non-finite readings are skipped everywhere. Statistics with no
//! defined inputs are `NaN`, never zero.

use polars::prelude::*;

use crate::error::Result;

/// Copy of `values` with `NaN` and `±inf` replaced by nulls.
pub fn finite_only(values: &Float64Chunked) -> Float64Chunked {
    values
        .into_iter()
        .map(|value| value.filter(|v| v.is_finite()))
        .collect()
}

pub fn mean(values: &Float64Chunked) -> f64 {
    finite_only(values).mean().unwrap_or(f64::NAN)
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &Float64Chunked) -> f64 {
    finite_only(values).std(1).unwrap_or(f64::NAN)
}

/// Minimum over readings that are neither null nor exactly zero.
///
/// Zero is how the test systems record "not measured", so it is not a real
/// observation for these metrics.
pub fn min_excluding_zero(values: &Float64Chunked) -> f64 {
    values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite() && *v != 0.0)
        .fold(None, |acc: Option<f64>, v| {
            Some(acc.map_or(v, |current| current.min(v)))
        })
        .unwrap_or(f64::NAN)
}

pub fn column_mean(df: &DataFrame, column: &str) -> Result<f64> {
    Ok(mean(df.column(column)?.f64()?))
}

pub fn column_sample_std(df: &DataFrame, column: &str) -> Result<f64> {
    Ok(sample_std(df.column(column)?.f64()?))
}

/// Number of finite, non-null values in `column`.
pub fn column_count(df: &DataFrame, column: &str) -> Result<usize> {
    let values = df.column(column)?.f64()?;
    Ok(values.into_iter().flatten().filter(|v| v.is_finite()).count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunked(values: &[Option<f64>]) -> Float64Chunked {
        values.iter().copied().collect()
    }

    #[test]
    fn mean_skips_nulls() {
        assert_eq!(mean(&chunked(&[Some(1.0), None, Some(3.0)])), 2.0);
    }

    #[test]
    fn mean_of_all_missing_is_nan() {
        assert!(mean(&chunked(&[None, None])).is_nan());
        assert!(mean(&chunked(&[])).is_nan());
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        let std = sample_std(&chunked(&[Some(2.0), Some(4.0), None, Some(6.0)]));
        assert!((std - 2.0).abs() < 1e-9);
        assert!(sample_std(&chunked(&[Some(5.0)])).is_nan());
    }

    #[test]
    fn min_treats_zero_as_missing() {
        let values = chunked(&[Some(0.0), Some(12.5), None, Some(7.0), Some(0.0)]);
        assert_eq!(min_excluding_zero(&values), 7.0);
        assert!(min_excluding_zero(&chunked(&[Some(0.0), None])).is_nan());
    }

    #[test]
    fn nan_readings_count_as_missing() {
        let values = chunked(&[Some(f64::NAN), Some(2.0), Some(4.0), Some(f64::INFINITY)]);
        assert_eq!(mean(&values), 3.0);
        assert!((sample_std(&values) - 2.0_f64.sqrt()).abs() < 1e-9);
        assert_eq!(min_excluding_zero(&values), 2.0);
        assert!(mean(&chunked(&[Some(f64::NAN)])).is_nan());
    }

    #[test]
    fn count_skips_nan() {
        let df = df![
            "diff" => [Some(1.0), None, Some(f64::NAN), Some(3.0)],
        ]
        .unwrap();
        assert_eq!(column_count(&df, "diff").unwrap(), 2);
    }

    #[test]
    fn min_keeps_negative_readings() {
        assert_eq!(min_excluding_zero(&chunked(&[Some(-1.5), Some(2.0)])), -1.5);
    }
}
