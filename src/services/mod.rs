//! Chart assembly and output sinks
//!
//! `chart_service` turns `ChartData` into a `ChartPlan` and draws it on a
//! scoped canvas; `output_service` and `display_service` are the terminal
//! operations that persist or show the result.

pub mod backend;
pub mod chart_service;
pub mod display_service;
pub mod output_service;

pub use chart_service::{assemble, draw_plan, Canvas};
pub use display_service::show_chart;
pub use output_service::{render_png, render_svg, save_chart, ImageFormat};
