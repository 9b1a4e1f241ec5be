use std::fs;

use hp_trends_core::cohort::compare_cohorts;
use hp_trends_core::render::{render_improvement_chart, render_radar_chart};
use hp_trends_core::source::{cohort_records_frame, CohortRecord};

#[test]
fn improvement_chart_writes_svg_with_categories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("charts").join("improvement.svg");

    render_improvement_chart(&path, [12.5, 30.0, 41.25]).expect("render");

    let svg = fs::read_to_string(&path).expect("read svg");
    assert!(svg.contains("<svg"));
    for label in ["1st Retest", "2nd Retest", "3rd Retest", "Assessment Number"] {
        assert!(svg.contains(label), "missing {label}");
    }
}

#[test]
fn improvement_chart_tolerates_missing_averages() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("improvement.svg");

    render_improvement_chart(&path, [f64::NAN, -4.0, f64::NAN]).expect("render");
    assert!(path.exists());
}

#[test]
fn radar_chart_labels_every_metric_and_series() {
    let records = cohort_records_frame(&[
        CohortRecord {
            metrics: [180.0, 4000.0, 3500.0, 2.1, 900.0, 2500.0, 70.0].map(Some),
            pitch_speed_mph: Some(91.0),
        },
        CohortRecord {
            metrics: [210.0, 5000.0, 4100.0, 2.9, 1200.0, 3100.0, 80.0].map(Some),
            pitch_speed_mph: Some(96.5),
        },
    ])
    .expect("frame");
    let comparison = compare_cohorts(&records, 90.0, 95.0).expect("compare");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("radar.svg");
    render_radar_chart(&path, &comparison).expect("render");

    let svg = fs::read_to_string(&path).expect("read svg");
    for label in [
        "Body Weight",
        "Pitching Max HSS",
        "MIN",
        "AVG 90+ MPH",
        "AVG 95+ MPH",
        "195.0",
        "180.0",
    ] {
        assert!(svg.contains(label), "missing {label}");
    }
}
