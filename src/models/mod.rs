//! Data models for burndown charts
//!
//! `chart` holds the caller-supplied input, `plan` the assembled,
//! backend-independent chart and `format` the opaque styling record.

pub mod chart;
pub mod format;
pub mod plan;

// Re-export commonly used types for convenience
pub use chart::{BurndownSeries, ChartData};
pub use format::FormatBag;
pub use plan::{AxisTick, ChartPlan, PointOutcome, SeriesPlot, Trendline, TrendlineOutcome};
