use std::f64::consts::TAU;
use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::info;

use super::{ensure_parent_dir, render_error, ORANGE};
use crate::cohort::CohortComparison;
use crate::error::Result;

const TITLE: &str = "Average High Performance Metrics of 90+mph Throwers";
const SIZE: (u32, u32) = (800, 800);
const EXTENT: f64 = 140.0;
const GUIDE_RINGS: [f64; 4] = [25.0, 50.0, 75.0, 100.0];
const CATEGORY_RADIUS: f64 = 122.0;
const UPPER_LABEL_RADIUS: f64 = 105.0;
const LOWER_LABEL_RADIUS: f64 = 50.0;
const MIN_LABEL_RADIUS: f64 = 15.0;

/// `count` equally spaced angles starting at 0, with the first repeated at the
/// end to close the shape.
pub fn radar_angles(count: usize) -> Vec<f64> {
    let mut angles: Vec<f64> = (0..count)
        .map(|idx| TAU * idx as f64 / count as f64)
        .collect();
    if let Some(first) = angles.first().copied() {
        angles.push(first);
    }
    angles
}

pub fn polar_to_cartesian(angle: f64, radius: f64) -> (f64, f64) {
    (radius * angle.cos(), radius * angle.sin())
}

/// Closed outline for one series. Non-finite radii collapse to the centre.
pub fn radar_polygon(radii: &[f64]) -> Vec<(f64, f64)> {
    let angles = radar_angles(radii.len());
    angles
        .iter()
        .zip(radii.iter().chain(radii.first()))
        .map(|(&angle, &radius)| {
            let radius = if radius.is_finite() { radius } else { 0.0 };
            polar_to_cartesian(angle, radius)
        })
        .collect()
}

fn label_style(color: &RGBColor, vpos: VPos) -> TextStyle<'static> {
    ("sans-serif", 12)
        .into_font()
        .color(color)
        .pos(Pos::new(HPos::Center, vpos))
}

/// Three filled polygons (minimum, lower cohort mean, upper cohort mean) on a
/// shared 0-100 scale, each vertex labelled with its raw value.
pub fn render_radar_chart(path: &Path, comparison: &CohortComparison) -> Result<()> {
    ensure_parent_dir(path)?;

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, ("sans-serif", 22).into_font().style(FontStyle::Bold))
        .margin(30)
        .build_cartesian_2d(-EXTENT..EXTENT, -EXTENT..EXTENT)
        .map_err(render_error)?;

    let metrics = &comparison.metrics;
    let angles = radar_angles(metrics.len());
    let spoke_angles = &angles[..metrics.len()];

    chart
        .draw_series(GUIDE_RINGS.iter().map(|&radius| {
            let ring: Vec<(f64, f64)> = (0..=72_u32)
                .map(|step| polar_to_cartesian(TAU * f64::from(step) / 72.0, radius))
                .collect();
            PathElement::new(ring, BLACK.mix(0.15))
        }))
        .map_err(render_error)?;
    chart
        .draw_series(spoke_angles.iter().map(|&angle| {
            PathElement::new(
                vec![(0.0, 0.0), polar_to_cartesian(angle, 100.0)],
                BLACK.mix(0.15),
            )
        }))
        .map_err(render_error)?;

    let series: [(&str, RGBColor, f64, u32, Vec<f64>); 3] = [
        (
            "MIN",
            RED,
            0.2,
            1,
            metrics.iter().map(|m| m.normalized_min).collect(),
        ),
        (
            "AVG 90+ MPH",
            ORANGE,
            0.3,
            2,
            metrics.iter().map(|m| m.normalized_lower).collect(),
        ),
        (
            "AVG 95+ MPH",
            BLUE,
            0.3,
            2,
            metrics.iter().map(|m| m.normalized_upper).collect(),
        ),
    ];

    for (label, color, alpha, width, radii) in &series {
        let outline = radar_polygon(radii);
        chart
            .draw_series(std::iter::once(Polygon::new(
                outline.clone(),
                color.mix(*alpha).filled(),
            )))
            .map_err(render_error)?;

        let stroke = color.stroke_width(*width);
        let legend_color = *color;
        chart
            .draw_series(std::iter::once(PathElement::new(outline, stroke)))
            .map_err(render_error)?
            .label(*label)
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 18, y + 5)], legend_color.mix(0.5).filled())
            });
    }

    chart
        .draw_series(spoke_angles.iter().zip(metrics).map(|(&angle, metric)| {
            Text::new(
                metric.metric.label.to_string(),
                polar_to_cartesian(angle, CATEGORY_RADIUS),
                label_style(&BLACK, VPos::Center),
            )
        }))
        .map_err(render_error)?;

    let value_labels = spoke_angles.iter().zip(metrics).flat_map(|(&angle, metric)| {
        [
            Text::new(
                format!("{:.1}", metric.upper_mean),
                polar_to_cartesian(angle, UPPER_LABEL_RADIUS),
                label_style(&BLUE, VPos::Bottom),
            ),
            Text::new(
                format!("{:.1}", metric.lower_mean),
                polar_to_cartesian(angle, LOWER_LABEL_RADIUS),
                label_style(&ORANGE, VPos::Bottom),
            ),
            Text::new(
                format!("{:.1}", metric.min),
                polar_to_cartesian(angle, MIN_LABEL_RADIUS),
                label_style(&RED, VPos::Top),
            ),
        ]
    });
    chart.draw_series(value_labels).map_err(render_error)?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(render_error)?;

    root.present().map_err(render_error)?;
    info!(path = %path.display(), "Rendered radar chart");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angles_are_evenly_spaced_and_closed() {
        let angles = radar_angles(7);
        assert_eq!(angles.len(), 8);
        assert_eq!(angles[0], angles[7]);
        for pair in angles[..7].windows(2) {
            assert!((pair[1] - pair[0] - TAU / 7.0).abs() < 1e-12);
        }
    }

    #[test]
    fn polygon_repeats_first_vertex() {
        let outline = radar_polygon(&[100.0, 50.0, 25.0, 10.0]);
        assert_eq!(outline.len(), 5);
        assert_eq!(outline[0], outline[4]);
        assert!((outline[0].0 - 100.0).abs() < 1e-9);
        assert!((outline[1].1 - 50.0).abs() < 1e-9);
    }

    #[test]
    fn missing_values_sit_at_the_centre() {
        let outline = radar_polygon(&[f64::NAN, 10.0, 10.0]);
        assert_eq!(outline[0], (0.0, 0.0));
    }

    #[test]
    fn empty_series_has_no_vertices() {
        assert!(radar_angles(0).is_empty());
        assert!(radar_polygon(&[]).is_empty());
    }
}
