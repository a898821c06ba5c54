//! Resolve format bags into plotters line styles

use plotters::style::{Color, RGBColor, ShapeStyle};
use serde_json::Value;
use tracing::debug;

use crate::models::format::{FormatBag, COLOR, LINESTYLE, LINEWIDTH};
use crate::utils::errors::{ChartError, Result};

/// Default color cycle (tab10), used for series without an explicit color
pub const COLOR_CYCLE: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

const DEFAULT_WIDTH: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Solid,
    /// Dash length and gap, in pixels
    Dashed { size: i32, spacing: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: RGBColor,
    pub width: u32,
    pub kind: LineKind,
}

impl LineStyle {
    pub fn shape(&self) -> ShapeStyle {
        self.color.stroke_width(self.width)
    }
}

/// Turn a format bag into a concrete line style, falling back to `fallback` color
pub fn resolve(bag: &FormatBag, fallback: RGBColor) -> Result<LineStyle> {
    let color = match bag.get(COLOR) {
        Some(value) => parse_color(value)?,
        None => fallback,
    };

    let width = match bag.get(LINEWIDTH) {
        Some(value) => value
            .as_f64()
            .filter(|w| w.is_finite() && *w > 0.0)
            .map(|w| (w.round() as u32).max(1))
            .ok_or_else(|| ChartError::invalid_format(LINEWIDTH, value))?,
        None => DEFAULT_WIDTH,
    };

    let kind = match bag.get(LINESTYLE) {
        Some(value) => parse_linestyle(value, width)?,
        None => LineKind::Solid,
    };

    for (key, _) in bag.iter() {
        if ![COLOR, LINESTYLE, LINEWIDTH].contains(&key) {
            debug!("Ignoring unrecognized format key '{}'", key);
        }
    }

    Ok(LineStyle { color, width, kind })
}

fn parse_color(value: &Value) -> Result<RGBColor> {
    let name = value
        .as_str()
        .ok_or_else(|| ChartError::invalid_format(COLOR, value))?;
    named_color(name)
        .or_else(|| hex_color(name))
        .ok_or_else(|| ChartError::invalid_format(COLOR, name))
}

fn named_color(name: &str) -> Option<RGBColor> {
    let lower = name.trim().to_lowercase();
    // "C0".."C9" index the default cycle
    if let Some(idx) = lower.strip_prefix('c').and_then(|d| d.parse::<usize>().ok()) {
        return COLOR_CYCLE.get(idx).copied();
    }
    let rgb = match lower.trim_start_matches("tab:") {
        "black" | "k" => RGBColor(0, 0, 0),
        "white" | "w" => RGBColor(255, 255, 255),
        "red" | "r" => RGBColor(255, 0, 0),
        "green" | "g" => RGBColor(0, 128, 0),
        "blue" | "b" => RGBColor(0, 0, 255),
        "cyan" | "c" => RGBColor(0, 191, 191),
        "magenta" | "m" => RGBColor(191, 0, 191),
        "yellow" | "y" => RGBColor(191, 191, 0),
        "grey" | "gray" => RGBColor(128, 128, 128),
        "lightgrey" | "lightgray" => RGBColor(211, 211, 211),
        "darkgrey" | "darkgray" => RGBColor(169, 169, 169),
        "orange" => RGBColor(255, 165, 0),
        "purple" => RGBColor(128, 0, 128),
        "brown" => RGBColor(165, 42, 42),
        "pink" => RGBColor(255, 192, 203),
        "olive" => RGBColor(128, 128, 0),
        "navy" => RGBColor(0, 0, 128),
        _ => return None,
    };
    Some(rgb)
}

fn hex_color(s: &str) -> Option<RGBColor> {
    let hex = s.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Named styles and `[offset, [on, off, ...]]` dash tuples; lengths scale with line width
fn parse_linestyle(value: &Value, width: u32) -> Result<LineKind> {
    let scale = width as i32;
    if let Some(name) = value.as_str() {
        return match name.trim().to_lowercase().as_str() {
            "-" | "solid" => Ok(LineKind::Solid),
            "--" | "dashed" => Ok(LineKind::Dashed { size: 4 * scale, spacing: 2 * scale }),
            ":" | "dotted" => Ok(LineKind::Dashed { size: scale, spacing: scale + 1 }),
            "-." | "dashdot" => Ok(LineKind::Dashed { size: 6 * scale, spacing: 2 * scale }),
            _ => Err(ChartError::invalid_format(LINESTYLE, name)),
        };
    }

    let pattern = value
        .as_array()
        .and_then(|tuple| tuple.get(1))
        .and_then(Value::as_array)
        .ok_or_else(|| ChartError::invalid_format(LINESTYLE, value))?;
    let lengths: Vec<f64> = pattern.iter().filter_map(Value::as_f64).collect();
    match lengths.as_slice() {
        [on, off, ..] if *on > 0.0 && *off > 0.0 => Ok(LineKind::Dashed {
            size: ((on * scale as f64).round() as i32).max(1),
            spacing: ((off * scale as f64).round() as i32).max(1),
        }),
        _ => Err(ChartError::invalid_format(LINESTYLE, value)),
    }
}
