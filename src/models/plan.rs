//! Backend-independent description of a burndown chart

use chrono::NaiveDate;

use super::format::FormatBag;
use crate::utils::dates::DateAxis;

/// Y-axis headroom above the sprint's total points
pub const Y_HEADROOM: f64 = 1.1;

/// A labelled x-axis tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisTick {
    pub position: usize,
    pub label: String,
}

/// What happened to a single series observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOutcome {
    Plotted { position: usize, points: i64 },
    SkippedOutOfRange { day: NaiveDate },
}

/// A series mapped onto the chart's date axis
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPlot {
    pub label: String,
    pub format: FormatBag,
    pub outcomes: Vec<PointOutcome>,
}

impl SeriesPlot {
    /// (axis position, points) pairs that land on the axis, in day order
    pub fn points(&self) -> Vec<(usize, i64)> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                PointOutcome::Plotted { position, points } => Some((*position, *points)),
                PointOutcome::SkippedOutOfRange { .. } => None,
            })
            .collect()
    }

    pub fn skipped(&self) -> Vec<NaiveDate> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                PointOutcome::SkippedOutOfRange { day } => Some(*day),
                PointOutcome::Plotted { .. } => None,
            })
            .collect()
    }
}

/// Unbounded ideal-burn line through `anchor` with the given slope
#[derive(Debug, Clone, PartialEq)]
pub struct Trendline {
    pub anchor: (f64, f64),
    pub slope: f64,
    pub format: FormatBag,
}

impl Trendline {
    pub fn value_at(&self, x: f64) -> f64 {
        self.anchor.1 + self.slope * (x - self.anchor.0)
    }

    /// Segment of the line visible inside the `x` by `y` viewport
    pub fn clip(&self, x: (f64, f64), y: (f64, f64)) -> Option<((f64, f64), (f64, f64))> {
        let (mut lo, mut hi) = x;
        if self.slope == 0.0 {
            let v = self.anchor.1;
            if v < y.0 || v > y.1 {
                return None;
            }
        } else {
            let at_y0 = self.anchor.0 + (y.0 - self.anchor.1) / self.slope;
            let at_y1 = self.anchor.0 + (y.1 - self.anchor.1) / self.slope;
            lo = lo.max(at_y0.min(at_y1));
            hi = hi.min(at_y0.max(at_y1));
        }
        if lo > hi {
            return None;
        }
        Some(((lo, self.value_at(lo)), (hi, self.value_at(hi))))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrendlineOutcome {
    Drawn(Trendline),
    /// The sprint spans zero or negative whole days
    Skipped { sprint_days: i64 },
}

impl TrendlineOutcome {
    pub fn line(&self) -> Option<&Trendline> {
        match self {
            TrendlineOutcome::Drawn(line) => Some(line),
            TrendlineOutcome::Skipped { .. } => None,
        }
    }
}

/// Everything a backend needs to draw one chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPlan {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub axis: DateAxis,
    pub x_bounds: (f64, f64),
    pub y_bounds: (f64, f64),
    pub ticks: Vec<AxisTick>,
    pub series: Vec<SeriesPlot>,
    pub trendline: TrendlineOutcome,
}

impl ChartPlan {
    /// Label for an x position if a tick sits there, empty otherwise
    pub fn tick_label_at(&self, x: f64) -> String {
        self.ticks
            .iter()
            .find(|t| (t.position as f64 - x).abs() < 0.5)
            .map(|t| t.label.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(anchor: (f64, f64), slope: f64) -> Trendline {
        Trendline {
            anchor,
            slope,
            format: FormatBag::default(),
        }
    }

    #[test]
    fn test_value_at() {
        let t = line((0.0, 100.0), -100.0 / 14.0);
        assert_eq!(t.value_at(0.0), 100.0);
        assert!((t.value_at(14.0)).abs() < 1e-9);
        assert!((t.value_at(7.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_clip_to_x_range() {
        // Reaches zero at x=14, past the right edge at x=13
        let t = line((0.0, 100.0), -100.0 / 14.0);
        let ((x0, y0), (x1, y1)) = t.clip((0.0, 13.0), (0.0, 110.0)).unwrap();
        assert_eq!((x0, y0), (0.0, 100.0));
        assert_eq!(x1, 13.0);
        assert!((y1 - 100.0 / 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_clip_to_y_range() {
        // Anchored late in the chart: line exits through the top and the bottom
        let t = line((5.0, 100.0), -20.0);
        let ((x0, y0), (x1, y1)) = t.clip((0.0, 20.0), (0.0, 110.0)).unwrap();
        assert!((x0 - 4.5).abs() < 1e-9);
        assert!((y0 - 110.0).abs() < 1e-9);
        assert!((x1 - 10.0).abs() < 1e-9);
        assert!(y1.abs() < 1e-9);
    }

    #[test]
    fn test_clip_outside_viewport() {
        let t = line((-50.0, 10.0), -1.0);
        assert!(t.clip((0.0, 13.0), (0.0, 110.0)).is_none());
    }

    #[test]
    fn test_series_points_and_skipped() {
        let plot = SeriesPlot {
            label: "Remaining".into(),
            format: FormatBag::default(),
            outcomes: vec![
                PointOutcome::SkippedOutOfRange {
                    day: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
                },
                PointOutcome::Plotted { position: 0, points: 100 },
                PointOutcome::Plotted { position: 7, points: 50 },
            ],
        };
        assert_eq!(plot.points(), vec![(0, 100), (7, 50)]);
        assert_eq!(plot.skipped().len(), 1);
    }
}
