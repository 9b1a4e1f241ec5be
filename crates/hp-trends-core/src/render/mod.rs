//! Static SVG charts for the two reports.

mod bar_line;
mod radar;

use std::fmt::Display;
use std::path::Path;

use plotters::style::RGBColor;

use crate::error::{Result, TrendsError};

pub use bar_line::{render_improvement_chart, retest_label, RETEST_LABELS};
pub use radar::{polar_to_cartesian, radar_angles, radar_polygon, render_radar_chart};

pub const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
pub const ORANGE: RGBColor = RGBColor(255, 165, 0);

pub(crate) fn render_error(err: impl Display) -> TrendsError {
    TrendsError::Render(err.to_string())
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
