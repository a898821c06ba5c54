//! Label-area sizing so tick labels and axis titles fit without clipping

use crate::models::plan::ChartPlan;

/// Average glyph advance as a fraction of the font size
const GLYPH_WIDTH: f64 = 0.6;
const LINE_HEIGHT: f64 = 1.3;

/// Pixel sizes of the chart's margin and label areas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub margin: u32,
    pub caption_size: u32,
    pub label_size: u32,
    pub x_label_area: u32,
    pub y_label_area: u32,
}

impl Layout {
    /// Size label areas from the longest tick labels the plan will draw
    pub fn tight(plan: &ChartPlan, font_size: u32) -> Self {
        let label_size = (font_size.saturating_mul(3) / 4).max(8);
        let glyph = label_size as f64 * GLYPH_WIDTH;
        let line = (font_size as f64 * LINE_HEIGHT).ceil() as u32;

        // x tick labels are rotated, so their length becomes height
        let longest_tick = plan.ticks.iter().map(|t| t.label.len()).max().unwrap_or(0);
        let x_label_area = ((longest_tick as f64 * glyph).ceil() as u32)
            .saturating_add(line)
            .saturating_add(10);

        let longest_y = format_y_label(plan.y_bounds.1).len();
        let y_label_area = ((longest_y as f64 * glyph).ceil() as u32)
            .saturating_add(line)
            .saturating_add(10);

        Layout {
            margin: (font_size / 2).max(5),
            caption_size: font_size.saturating_mul(3) / 2,
            label_size,
            x_label_area,
            y_label_area,
        }
    }
}

/// Y tick label text: integral values without decimals
pub fn format_y_label(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
