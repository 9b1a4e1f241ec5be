use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use super::{ensure_parent_dir, render_error, SKY_BLUE};
use crate::error::Result;

pub const RETEST_LABELS: [&str; 3] = ["1st Retest", "2nd Retest", "3rd Retest"];

const TITLE: &str = "Avg Increase in Plyo Push Up Peak Takeoff Force Over Multiple Assessments";
const X_DESC: &str = "Assessment Number";
const Y_DESC: &str = "Average Increase in Peak Takeoff Force (N)";
const SIZE: (u32, u32) = (800, 600);
const BAR_HALF_WIDTH: f64 = 0.35;

/// Category label for an x position, or an empty string between categories.
pub fn retest_label(x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    RETEST_LABELS
        .get(rounded as usize)
        .map(|label| label.to_string())
        .unwrap_or_default()
}

fn y_axis_max(averages: &[f64; 3]) -> f64 {
    let peak = averages
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    if peak > 0.0 {
        peak * 1.1
    } else {
        1.0
    }
}

/// Bars for the three average improvements with a line through their tops.
/// The y axis starts at 0; non-finite averages are left out.
pub fn render_improvement_chart(path: &Path, averages: [f64; 3]) -> Result<()> {
    ensure_parent_dir(path)?;

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5_f64..2.5_f64, 0.0_f64..y_axis_max(&averages))
        .map_err(render_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(7)
        .x_label_formatter(&|x| retest_label(*x))
        .x_desc(X_DESC)
        .y_desc(Y_DESC)
        .draw()
        .map_err(render_error)?;

    let points: Vec<(f64, f64)> = averages
        .iter()
        .enumerate()
        .filter(|(_, value)| value.is_finite())
        .map(|(idx, value)| (idx as f64, *value))
        .collect();

    chart
        .draw_series(points.iter().map(|&(x, y)| {
            Rectangle::new(
                [(x - BAR_HALF_WIDTH, 0.0), (x + BAR_HALF_WIDTH, y)],
                SKY_BLUE.filled(),
            )
        }))
        .map_err(render_error)?;

    chart
        .draw_series(LineSeries::new(points.clone(), RED.stroke_width(2)))
        .map_err(render_error)?;
    chart
        .draw_series(points.iter().map(|&point| Circle::new(point, 5, RED.filled())))
        .map_err(render_error)?;

    root.present().map_err(render_error)?;
    info!(path = %path.display(), "Rendered improvement chart");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_only_on_category_centres() {
        assert_eq!(retest_label(0.0), "1st Retest");
        assert_eq!(retest_label(2.0), "3rd Retest");
        assert_eq!(retest_label(0.5), "");
        assert_eq!(retest_label(-0.5), "");
        assert_eq!(retest_label(3.0), "");
    }

    #[test]
    fn axis_headroom_ignores_missing_and_negative_values() {
        assert!((y_axis_max(&[10.0, f64::NAN, 20.0]) - 22.0).abs() < 1e-9);
        assert_eq!(y_axis_max(&[-3.0, f64::NAN, f64::NAN]), 1.0);
    }
}
