//! Pitch-speed cohort statistics and their 0-100 normalization for the radar chart.

use polars::prelude::*;
use tracing::{info, warn};

use crate::columns::{CohortMetric, COHORT_METRICS, PITCH_SPEED};
use crate::error::Result;
use crate::stats;

const METRIC_COUNT: usize = COHORT_METRICS.len();

/// Per-metric means for throwers at or above `min_speed_mph`.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortStatistics {
    pub min_speed_mph: f64,
    pub size: usize,
    /// Ordered as `COHORT_METRICS`; `NaN` where the cohort has no readings.
    pub means: [f64; METRIC_COUNT],
}

/// One radar axis: raw values and their normalized positions.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMetric {
    pub metric: CohortMetric,
    pub min: f64,
    pub lower_mean: f64,
    pub upper_mean: f64,
    pub range: f64,
    pub normalized_min: f64,
    pub normalized_lower: f64,
    pub normalized_upper: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CohortComparison {
    pub lower: CohortStatistics,
    pub upper: CohortStatistics,
    pub metrics: Vec<NormalizedMetric>,
}

/// Rows with a pitch speed at or above `min_speed_mph`. Null speeds are dropped.
pub fn select_cohort(df: &DataFrame, min_speed_mph: f64) -> Result<DataFrame> {
    let speeds = df.column(PITCH_SPEED)?.f64()?;
    let mask: BooleanChunked = speeds
        .into_iter()
        .map(|speed| speed.is_some_and(|s| s >= min_speed_mph))
        .collect();
    Ok(df.filter(&mask)?)
}

pub fn cohort_statistics(cohort: &DataFrame, min_speed_mph: f64) -> Result<CohortStatistics> {
    let mut means = [f64::NAN; METRIC_COUNT];
    for (slot, metric) in means.iter_mut().zip(COHORT_METRICS.iter()) {
        *slot = stats::column_mean(cohort, metric.column)?;
    }
    Ok(CohortStatistics {
        min_speed_mph,
        size: cohort.height(),
        means,
    })
}

/// Per-metric minimum with zero readings treated as missing.
pub fn cohort_minimums(cohort: &DataFrame) -> Result<[f64; METRIC_COUNT]> {
    let mut minimums = [f64::NAN; METRIC_COUNT];
    for (slot, metric) in minimums.iter_mut().zip(COHORT_METRICS.iter()) {
        *slot = stats::min_excluding_zero(cohort.column(metric.column)?.f64()?);
    }
    Ok(minimums)
}

/// Distance from the minimum to the reference mean. A zero range is replaced by
/// 1, which flattens that axis: every value sits at `(value - min) * 100`.
pub fn normalization_range(reference_mean: f64, min: f64) -> f64 {
    let range = reference_mean - min;
    if range == 0.0 {
        1.0
    } else {
        range
    }
}

/// `value` as a percentage of `range`, anchored at `min`.
pub fn normalize(value: f64, min: f64, range: f64) -> f64 {
    (value - min) / range * 100.0
}

/// Means for both cohorts, minima over the lower cohort, and the normalized
/// radar positions. The upper cohort is cut from the lower one, so it is
/// always a subset.
pub fn compare_cohorts(
    records: &DataFrame,
    lower_mph: f64,
    upper_mph: f64,
) -> Result<CohortComparison> {
    let lower_cohort = select_cohort(records, lower_mph)?;
    let upper_cohort = select_cohort(&lower_cohort, upper_mph)?;

    if lower_cohort.height() == 0 {
        warn!(lower_mph, "No throwers in the lower cohort");
    }
    if upper_cohort.height() == 0 {
        warn!(upper_mph, "No throwers in the upper cohort");
    }

    let lower = cohort_statistics(&lower_cohort, lower_mph)?;
    let upper = cohort_statistics(&upper_cohort, upper_mph)?;
    let minimums = cohort_minimums(&lower_cohort)?;

    let metrics = COHORT_METRICS
        .iter()
        .enumerate()
        .map(|(idx, metric)| {
            let min = minimums[idx];
            let range = normalization_range(lower.means[idx], min);
            NormalizedMetric {
                metric: *metric,
                min,
                lower_mean: lower.means[idx],
                upper_mean: upper.means[idx],
                range,
                normalized_min: normalize(min, min, range),
                normalized_lower: normalize(lower.means[idx], min, range),
                normalized_upper: normalize(upper.means[idx], min, range),
            }
        })
        .collect();

    info!(
        lower_size = lower.size,
        upper_size = upper.size,
        "Computed cohort statistics"
    );
    Ok(CohortComparison {
        lower,
        upper,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_range_is_replaced_by_one() {
        assert_eq!(normalization_range(50.0, 50.0), 1.0);
        assert_eq!(normalize(50.0, 50.0, normalization_range(50.0, 50.0)), 0.0);
        assert_eq!(normalization_range(80.0, 50.0), 30.0);
    }

    #[test]
    fn missing_inputs_stay_nan() {
        assert!(normalization_range(f64::NAN, 1.0).is_nan());
        assert!(normalize(5.0, f64::NAN, 1.0).is_nan());
    }

    #[test]
    fn reference_mean_maps_to_one_hundred() {
        let range = normalization_range(120.0, 20.0);
        assert_eq!(normalize(120.0, 20.0, range), 100.0);
        assert_eq!(normalize(70.0, 20.0, range), 50.0);
    }
}
