use std::fs;
use std::io;
use std::path::Path;

use plotters::prelude::*;
use tracing::{debug, info};

use crate::config::RenderSettings;
use crate::models::{ChartData, ChartPlan};
use crate::services::chart_service::{assemble, render_plan_to, render_plan_with};
use crate::utils::errors::{ChartError, Result};
use crate::utils::staging::StagedFile;

/// Image formats the save sink can write, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Bmp,
    Svg,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| ChartError::UnsupportedFormat(path.display().to_string()))?;
        match ext.as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            "bmp" => Ok(ImageFormat::Bmp),
            "svg" => Ok(ImageFormat::Svg),
            _ => Err(ChartError::UnsupportedFormat(ext)),
        }
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, ImageFormat::Svg)
    }
}

/// Draw `plan` into the file at `path`; write failures are reported against `target`
fn draw_file(
    path: &Path,
    target: &Path,
    format: ImageFormat,
    plan: &ChartPlan,
    settings: &RenderSettings,
) -> Result<()> {
    let size = (settings.width, settings.height);
    if format.is_vector() {
        let mut document = String::new();
        render_plan_to(SVGBackend::with_string(&mut document, size), plan, settings)?;
        fs::write(path, document).map_err(|e| ChartError::io(target, e))
    } else {
        // The bitmap backend encodes and writes the file when presented
        render_plan_with(BitMapBackend::new(path, size), plan, settings, |e| {
            ChartError::io(target, io::Error::new(io::ErrorKind::Other, e.to_string()))
        })
    }
}

/// Render `data` and write it to `path`, creating parent directories as needed.
///
/// The image is drawn to a staging file beside `path` and renamed into place, so a
/// failed save never leaves a partial file behind.
pub fn save_chart(data: &ChartData, path: impl AsRef<Path>, settings: &RenderSettings) -> Result<()> {
    let path = path.as_ref();
    let plan = assemble(data, settings.tick_timezone)?;
    let format = ImageFormat::from_path(path)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            debug!("Creating output directory {}", dir.display());
        }
        fs::create_dir_all(dir).map_err(|e| ChartError::Path {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }

    let staged = StagedFile::beside(path);
    draw_file(staged.path(), path, format, &plan, settings)?;
    if !staged.path().exists() {
        return Err(ChartError::Render(format!(
            "backend produced no output for {}",
            path.display()
        )));
    }
    staged.commit(path)?;

    info!("💾 Saved burndown chart to {}", path.display());
    Ok(())
}

/// Render `data` as PNG bytes
pub fn render_png(data: &ChartData, settings: &RenderSettings) -> Result<Vec<u8>> {
    let plan = assemble(data, settings.tick_timezone)?;

    // The bitmap encoder writes to a path, so go through a scratch file
    let scratch = StagedFile::scratch("png");
    draw_file(scratch.path(), scratch.path(), ImageFormat::Png, &plan, settings)?;
    let bytes = fs::read(scratch.path()).map_err(|e| ChartError::io(scratch.path(), e))?;

    debug!("Rendered {} PNG bytes", bytes.len());
    Ok(bytes)
}

/// Render `data` as an SVG document
pub fn render_svg(data: &ChartData, settings: &RenderSettings) -> Result<String> {
    let plan = assemble(data, settings.tick_timezone)?;
    let mut document = String::new();
    render_plan_to(
        SVGBackend::with_string(&mut document, (settings.width, settings.height)),
        &plan,
        settings,
    )?;
    Ok(document)
}

/// Rasterize an assembled plan into a packed RGB buffer of `width * height * 3` bytes
pub fn render_rgb(plan: &ChartPlan, settings: &RenderSettings, width: u32, height: u32) -> Result<Vec<u8>> {
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    render_plan_to(
        BitMapBackend::with_buffer(&mut buffer, (width, height)),
        plan,
        settings,
    )?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ImageFormat::from_path(Path::new("a/b.png")).unwrap(), ImageFormat::Png);
        assert_eq!(ImageFormat::from_path(Path::new("b.JPEG")).unwrap(), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_path(Path::new("b.svg")).unwrap(), ImageFormat::Svg);
        assert!(ImageFormat::Svg.is_vector());
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            ImageFormat::from_path(Path::new("chart.pdf")),
            Err(ChartError::UnsupportedFormat(ext)) if ext == "pdf"
        ));
        assert!(ImageFormat::from_path(Path::new("chart")).is_err());
    }
}
