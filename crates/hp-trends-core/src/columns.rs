//! Column identifiers used by the `hp_tests` table.
//!
//! The store encodes units and aggregation method in each column name, so
//! these are treated as opaque strings and matched exactly.

pub const ATHLETE_ID: &str = "athlete";
pub const ATHLETE_NAME: &str = "athlete_name";
pub const TEST_DATE: &str = "test_date";

/// Peak takeoff force in newtons, mean across plyo push-up trials.
pub const PEAK_TAKEOFF_FORCE: &str = "peak_takeoff_force_[n]_mean_pp";

pub const BODY_WEIGHT: &str = "body_weight_[lbs]";
pub const CMJ_PEAK_POWER: &str = "peak_power_[w]_mean_cmj";
pub const SJ_PEAK_POWER: &str = "peak_power_[w]_mean_sj";
pub const HOP_TEST_RSI: &str = "best_rsi_(flight/contact_time)_mean_ht";
pub const IMTP_NET_PEAK_FORCE: &str = "net_peak_vertical_force_[n]_max_imtp";
pub const PITCHING_MAX_HSS: &str = "pitching_max_hss";
pub const PITCH_SPEED: &str = "pitch_speed_mph";

/// Derived per-athlete columns produced by the improvement stage.
pub const TEST_COLUMNS: [&str; 4] = ["Test1", "Test2", "Test3", "Test4"];
pub const DIFF_1_2: &str = "diff_1_2";
pub const DIFF_1_3: &str = "diff_1_3";
pub const DIFF_1_4: &str = "diff_1_4";
pub const DIFF_COLUMNS: [&str; 3] = [DIFF_1_2, DIFF_1_3, DIFF_1_4];

/// One axis of the cohort radar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CohortMetric {
    pub label: &'static str,
    pub column: &'static str,
}

/// The seven metrics compared across pitch-speed cohorts, in radar order.
pub const COHORT_METRICS: [CohortMetric; 7] = [
    CohortMetric {
        label: "Body Weight",
        column: BODY_WEIGHT,
    },
    CohortMetric {
        label: "CMJ Peak Power",
        column: CMJ_PEAK_POWER,
    },
    CohortMetric {
        label: "SJ Peak Power",
        column: SJ_PEAK_POWER,
    },
    CohortMetric {
        label: "Reactive Strength - RSI",
        column: HOP_TEST_RSI,
    },
    CohortMetric {
        label: "Peak Takeoff Force",
        column: PEAK_TAKEOFF_FORCE,
    },
    CohortMetric {
        label: "Net Peak Vertical Force",
        column: IMTP_NET_PEAK_FORCE,
    },
    CohortMetric {
        label: "Pitching Max HSS",
        column: PITCHING_MAX_HSS,
    },
];

/// Quote an identifier for MySQL. Embedded backticks are doubled.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_ident_wraps_special_characters() {
        assert_eq!(
            quote_ident(HOP_TEST_RSI),
            "`best_rsi_(flight/contact_time)_mean_ht`"
        );
        assert_eq!(quote_ident("a`b"), "`a``b`");
    }
}
