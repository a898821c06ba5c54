//! Sprint burndown chart renderer
//!
//! Build a [`ChartData`] from pre-aggregated per-day point totals, then hand it
//! to one of the sinks: [`save_chart`], [`render_png`], [`render_svg`] or
//! [`show_chart`].

pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use config::RenderSettings;
pub use models::{BurndownSeries, ChartData, ChartPlan, FormatBag};
pub use services::{assemble, render_png, render_svg, save_chart, show_chart};
pub use utils::{ChartError, Result, TickTimezone};
