//! Render settings loaded from the environment

use tracing::debug;

use crate::utils::dates::TickTimezone;
use crate::utils::errors::{ChartError, Result};

pub const ENV_WIDTH: &str = "BURNDOWN_WIDTH";
pub const ENV_HEIGHT: &str = "BURNDOWN_HEIGHT";
pub const ENV_TICK_TIMEZONE: &str = "BURNDOWN_TICK_TIMEZONE";
pub const ENV_FONT: &str = "BURNDOWN_FONT";
pub const ENV_FONT_SIZE: &str = "BURNDOWN_FONT_SIZE";

/// Largest accepted font size, in pixels
pub const MAX_FONT_SIZE: u32 = 512;

/// Canvas and typography settings shared by every output sink
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub tick_timezone: TickTimezone,
    pub font_family: String,
    pub font_size: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            width: 1280,
            height: 720,
            tick_timezone: TickTimezone::Local,
            font_family: "sans-serif".to_string(),
            font_size: 16,
        }
    }
}

impl RenderSettings {
    /// Read overrides from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`; unset keys keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = RenderSettings::default();

        if let Some(v) = lookup(ENV_WIDTH) {
            settings.width = parse_dimension(ENV_WIDTH, &v)?;
        }
        if let Some(v) = lookup(ENV_HEIGHT) {
            settings.height = parse_dimension(ENV_HEIGHT, &v)?;
        }
        if let Some(v) = lookup(ENV_TICK_TIMEZONE) {
            settings.tick_timezone = v.parse().map_err(|_| config_error(ENV_TICK_TIMEZONE, &v))?;
        }
        if let Some(v) = lookup(ENV_FONT) {
            if !v.trim().is_empty() {
                settings.font_family = v.trim().to_string();
            }
        }
        if let Some(v) = lookup(ENV_FONT_SIZE) {
            settings.font_size = parse_dimension(ENV_FONT_SIZE, &v)
                .ok()
                .filter(|size| *size <= MAX_FONT_SIZE)
                .ok_or_else(|| config_error(ENV_FONT_SIZE, &v))?;
        }

        debug!("Render settings: {:?}", settings);
        Ok(settings)
    }
}

fn parse_dimension(key: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| config_error(key, value))
}

fn config_error(key: &str, value: &str) -> ChartError {
    ChartError::Config {
        key: key.to_string(),
        value: value.to_string(),
    }
}
