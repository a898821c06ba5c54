use std::ops::Range;

use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::FontTransform;
use tracing::{debug, info};

use crate::config::RenderSettings;
use crate::models::plan::{PointOutcome, SeriesPlot, Trendline, TrendlineOutcome, Y_HEADROOM};
use crate::models::{ChartData, ChartPlan};
use crate::services::backend::TextSafeBackend;
use crate::utils::dates::{monday_ticks, DateAxis, TickTimezone};
use crate::utils::errors::{ChartError, Result};
use crate::utils::layout::{format_y_label, Layout};
use crate::utils::style::{self, LineKind, LineStyle, COLOR_CYCLE};

const TRENDLINE_FALLBACK: RGBColor = RGBColor(128, 128, 128);
const LEGEND_SWATCH: i32 = 20;

pub(crate) fn render_error<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Compute the axis, plotted points, ticks and trendline for `data`
pub fn assemble(data: &ChartData, tz: TickTimezone) -> Result<ChartPlan> {
    let axis = DateAxis::between(data.utc_chart_start, data.utc_chart_end)?;
    debug!(
        "Chart axis {}..={} ({} days)",
        axis.first(),
        axis.last(),
        axis.len()
    );

    let series = data
        .series
        .iter()
        .map(|s| {
            let outcomes = s
                .data
                .iter()
                .map(|(day, points)| match axis.position(*day) {
                    Some(position) => PointOutcome::Plotted {
                        position,
                        points: *points,
                    },
                    None => PointOutcome::SkippedOutOfRange { day: *day },
                })
                .collect();
            let plot = SeriesPlot {
                label: s.name.clone(),
                format: s.format.clone(),
                outcomes,
            };
            let skipped = plot.skipped();
            if !skipped.is_empty() {
                debug!(
                    "Series '{}': {} point(s) outside chart window skipped",
                    plot.label,
                    skipped.len()
                );
            }
            plot
        })
        .collect();

    let sprint_days = data.sprint_days();
    let trendline = if sprint_days > 0 {
        let sprint_start = data.utc_sprint_start.date_naive();
        let anchor = axis
            .position(sprint_start)
            .ok_or_else(|| ChartError::SprintStartOutOfRange {
                sprint_start: data.utc_sprint_start,
                chart_start: axis.first(),
                chart_end: axis.last(),
            })?;
        TrendlineOutcome::Drawn(Trendline {
            anchor: (anchor as f64, data.total_points),
            slope: -(data.total_points / sprint_days as f64),
            format: data.ideal_trendline_format.clone(),
        })
    } else {
        debug!("Sprint spans {} day(s), no ideal trendline", sprint_days);
        TrendlineOutcome::Skipped { sprint_days }
    };

    Ok(ChartPlan {
        title: data.title(),
        x_label: "Date".to_string(),
        y_label: data.points_label.clone(),
        x_bounds: (0.0, (axis.len() - 1) as f64),
        y_bounds: (0.0, data.total_points * Y_HEADROOM),
        ticks: monday_ticks(&axis, tz),
        axis,
        series,
        trendline,
    })
}

/// X coordinate over axis positions whose key points are the Monday ticks
struct DayRange {
    end: f64,
    ticks: Vec<f64>,
}

impl Ranged for DayRange {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        if self.end <= 0.0 {
            return limit.0;
        }
        let frac = value / self.end;
        limit.0 + (frac * (limit.1 - limit.0) as f64).round() as i32
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        if hint.max_num_points() == 0 {
            return Vec::new();
        }
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        0.0..self.end
    }
}

/// Draw `plan` onto `root`
pub fn draw_plan<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    plan: &ChartPlan,
    layout: &Layout,
    settings: &RenderSettings,
) -> Result<()> {
    let family = settings.font_family.as_str();
    let x_range = DayRange {
        end: plan.x_bounds.1,
        ticks: plan.ticks.iter().map(|t| t.position as f64).collect(),
    };
    // A zero-point sprint would collapse the y-axis
    let y_top = if plan.y_bounds.1 > 0.0 { plan.y_bounds.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(root)
        .caption(&plan.title, (family, layout.caption_size as f64).into_font())
        .margin(layout.margin)
        .x_label_area_size(layout.x_label_area)
        .y_label_area_size(layout.y_label_area)
        .build_cartesian_2d(x_range, plan.y_bounds.0..y_top)
        .map_err(render_error)?;

    let x_formatter = |x: &f64| plan.tick_label_at(*x);
    let y_formatter = |y: &f64| format_y_label(*y);
    chart
        .configure_mesh()
        .disable_y_mesh()
        .light_line_style(&TRANSPARENT)
        .x_labels(plan.ticks.len().max(1))
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .x_label_style(
            (family, layout.label_size as f64)
                .into_font()
                .transform(FontTransform::Rotate270),
        )
        .y_label_style((family, layout.label_size as f64).into_font())
        .axis_desc_style((family, settings.font_size as f64).into_font())
        .x_desc(plan.x_label.as_str())
        .y_desc(plan.y_label.as_str())
        .draw()
        .map_err(render_error)?;

    for (idx, series) in plan.series.iter().enumerate() {
        let line = style::resolve(&series.format, COLOR_CYCLE[idx % COLOR_CYCLE.len()])?;
        let points: Vec<(f64, f64)> = series
            .points()
            .into_iter()
            .map(|(x, y)| (x as f64, y as f64))
            .collect();

        let anno = match line.kind {
            LineKind::Solid => chart.draw_series(LineSeries::new(points, line.shape())),
            LineKind::Dashed { size, spacing } => {
                chart.draw_series(DashedLineSeries::new(points, size, spacing, line.shape()))
            }
        }
        .map_err(render_error)?;

        let (color, width) = (line.color, line.width);
        anno.label(series.label.as_str()).legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + LEGEND_SWATCH, y)], color.stroke_width(width))
        });
    }

    if let TrendlineOutcome::Drawn(trend) = &plan.trendline {
        let line = style::resolve(&trend.format, TRENDLINE_FALLBACK)?;
        match trend.clip(plan.x_bounds, (plan.y_bounds.0, y_top)) {
            Some((from, to)) => draw_segment(&mut chart, vec![from, to], &line)?,
            None => debug!("Ideal trendline lies outside the plot area"),
        }
    }

    if plan.series.is_empty() {
        debug!("No series to list in legend");
    } else {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK.mix(0.3))
            .label_font((family, layout.label_size as f64).into_font())
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(render_error)?;
    }

    Ok(())
}

fn draw_segment<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<DayRange, RangedCoordf64>>,
    points: Vec<(f64, f64)>,
    line: &LineStyle,
) -> Result<()> {
    match line.kind {
        LineKind::Solid => chart
            .draw_series(LineSeries::new(points, line.shape()))
            .map(|_| ()),
        LineKind::Dashed { size, spacing } => chart
            .draw_series(DashedLineSeries::new(points, size, spacing, line.shape()))
            .map(|_| ()),
    }
    .map_err(render_error)
}

/// A drawing surface scoped to a single render.
///
/// Every render opens its own canvas; dropping it (on success or on any error
/// path) releases the backend, so nothing leaks into the next chart.
pub struct Canvas<DB: DrawingBackend> {
    root: DrawingArea<TextSafeBackend<DB>, Shift>,
}

impl<DB: DrawingBackend> Canvas<DB> {
    pub fn open(backend: DB) -> Result<Self> {
        let root = TextSafeBackend::new(backend).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;
        Ok(Canvas { root })
    }

    pub fn draw(&self, plan: &ChartPlan, settings: &RenderSettings) -> Result<()> {
        let layout = Layout::tight(plan, settings.font_size);
        debug!("Layout: {:?}", layout);
        draw_plan(&self.root, plan, &layout, settings)
    }

    /// Flush the drawing to its backend and release the canvas
    pub fn present(self) -> Result<()> {
        self.present_with(render_error)
    }

    /// Like `present`, with backend failures mapped by `on_error`.
    ///
    /// File backends encode and write here, so their callers report I/O errors.
    pub fn present_with<F>(self, on_error: F) -> Result<()>
    where
        F: FnOnce(DrawingAreaErrorKind<DB::ErrorType>) -> ChartError,
    {
        self.root.present().map_err(on_error)
    }
}

/// Assemble `data` and draw it onto a fresh canvas over `backend`
pub fn render_to<DB: DrawingBackend>(
    backend: DB,
    data: &ChartData,
    settings: &RenderSettings,
) -> Result<ChartPlan> {
    let plan = assemble(data, settings.tick_timezone)?;
    render_plan_to(backend, &plan, settings)?;
    Ok(plan)
}

pub fn render_plan_to<DB: DrawingBackend>(
    backend: DB,
    plan: &ChartPlan,
    settings: &RenderSettings,
) -> Result<()> {
    render_plan_with(backend, plan, settings, render_error)
}

/// Draw `plan` over `backend`, mapping failures of the final flush with `on_present_error`
pub fn render_plan_with<DB, F>(
    backend: DB,
    plan: &ChartPlan,
    settings: &RenderSettings,
    on_present_error: F,
) -> Result<()>
where
    DB: DrawingBackend,
    F: FnOnce(DrawingAreaErrorKind<DB::ErrorType>) -> ChartError,
{
    let canvas = Canvas::open(backend)?;
    canvas.draw(plan, settings)?;
    canvas.present_with(on_present_error)?;
    info!(
        "Rendered '{}' ({} series, trendline {})",
        plan.title,
        plan.series.len(),
        if plan.trendline.line().is_some() { "drawn" } else { "skipped" }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BurndownSeries;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn sprint() -> ChartData {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 14, 0, 0, 0).unwrap();
        ChartData::new("Sprint 1", (start, end), (start, end), 100.0).with_series(
            BurndownSeries::new("Remaining", [(day(1, 1), 100), (day(1, 8), 50), (day(1, 14), 0)]),
        )
    }

    #[test]
    fn test_day_range_maps_endpoints() {
        let range = DayRange {
            end: 13.0,
            ticks: vec![0.0, 7.0],
        };
        assert_eq!(range.map(&0.0, (50, 1050)), 50);
        assert_eq!(range.map(&13.0, (50, 1050)), 1050);
        assert_eq!(range.range(), 0.0..13.0);
    }

    #[test]
    fn test_day_range_single_day() {
        let range = DayRange {
            end: 0.0,
            ticks: vec![],
        };
        assert_eq!(range.map(&0.0, (50, 1050)), 50);
    }

    #[test]
    fn test_assemble_labels_and_bounds() {
        let plan = assemble(&sprint(), TickTimezone::Utc).unwrap();
        assert_eq!(plan.title, "Sprint 1: Burndown Chart");
        assert_eq!(plan.x_label, "Date");
        assert_eq!(plan.y_label, "Outstanding Points");
        assert_eq!(plan.x_bounds, (0.0, 13.0));
        assert_eq!(plan.y_bounds, (0.0, 100.0 * 1.1));
    }

    #[test]
    fn test_tick_label_lookup() {
        let plan = assemble(&sprint(), TickTimezone::Utc).unwrap();
        assert_eq!(plan.tick_label_at(7.0), "2024-01-08");
        assert_eq!(plan.tick_label_at(3.0), "");
    }
}
