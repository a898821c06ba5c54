use std::num::NonZeroU32;
use std::panic;

use tracing::{debug, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::platform::run_return::EventLoopExtRunReturn;
use winit::window::WindowBuilder;

use crate::config::RenderSettings;
use crate::models::ChartData;
use crate::services::chart_service::assemble;
use crate::services::output_service::render_rgb;
use crate::utils::errors::{ChartError, Result};

/// Whether a window system is reachable, judged from environment `lookup`
pub fn display_available_from(lookup: impl Fn(&str) -> Option<String>) -> bool {
    if cfg!(any(target_os = "windows", target_os = "macos")) {
        return true;
    }
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|key| lookup(key).map(|v| !v.trim().is_empty()).unwrap_or(false))
}

pub fn display_available() -> bool {
    display_available_from(|key| std::env::var(key).ok())
}

/// Pack RGB bytes into 0RGB words
fn to_xrgb(rgb: &[u8]) -> Vec<u32> {
    rgb.chunks_exact(3)
        .map(|px| ((px[0] as u32) << 16) | ((px[1] as u32) << 8) | px[2] as u32)
        .collect()
}

/// Show `data` in a window and block until the window is closed.
///
/// Fails fast with `NoDisplayAvailable` on headless hosts. The chart is
/// re-rendered whenever the window is resized.
pub fn show_chart(data: &ChartData, settings: &RenderSettings) -> Result<()> {
    let plan = assemble(data, settings.tick_timezone)?;
    // Rasterize once up front so drawing errors surface before any window opens
    let mut frame = render_rgb(&plan, settings, settings.width, settings.height)?;

    if !display_available() {
        return Err(ChartError::NoDisplayAvailable);
    }

    // winit panics when the window system cannot be reached or an event loop already exists
    let mut event_loop = panic::catch_unwind(EventLoop::new).map_err(|_| {
        warn!("Could not create event loop");
        ChartError::NoDisplayAvailable
    })?;

    let window = WindowBuilder::new()
        .with_title(plan.title.as_str())
        .with_inner_size(PhysicalSize::new(settings.width, settings.height))
        .build(&event_loop)
        .map_err(|e| ChartError::Display(e.to_string()))?;

    let context = unsafe { softbuffer::Context::new(&window) }
        .map_err(|e| ChartError::Display(e.to_string()))?;
    let mut surface = unsafe { softbuffer::Surface::new(&context, &window) }
        .map_err(|e| ChartError::Display(e.to_string()))?;

    info!("🖼️ Showing '{}' (close the window to continue)", plan.title);

    let mut size = (settings.width, settings.height);
    let mut failure: Option<ChartError> = None;

    let _ = event_loop.run_return(|event, _, control_flow| {
        *control_flow = ControlFlow::Wait;
        match event {
            Event::WindowEvent { event: WindowEvent::CloseRequested, .. } => {
                *control_flow = ControlFlow::Exit;
            }
            Event::WindowEvent { event: WindowEvent::Resized(new_size), .. } => {
                if new_size.width > 0 && new_size.height > 0 {
                    size = (new_size.width, new_size.height);
                    match render_rgb(&plan, settings, size.0, size.1) {
                        Ok(rgb) => frame = rgb,
                        Err(e) => {
                            failure = Some(e);
                            *control_flow = ControlFlow::Exit;
                        }
                    }
                    window.request_redraw();
                }
            }
            Event::RedrawRequested(_) => {
                if let Err(e) = present_frame(&mut surface, &frame, size) {
                    failure = Some(e);
                    *control_flow = ControlFlow::Exit;
                }
            }
            _ => {}
        }
    });

    debug!("Chart window closed");
    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn present_frame(
    surface: &mut softbuffer::Surface,
    rgb: &[u8],
    (width, height): (u32, u32),
) -> Result<()> {
    let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
        return Ok(());
    };
    surface
        .resize(w, h)
        .map_err(|e| ChartError::Display(e.to_string()))?;
    let mut buffer = surface
        .buffer_mut()
        .map_err(|e| ChartError::Display(e.to_string()))?;
    let pixels = to_xrgb(rgb);
    let n = buffer.len().min(pixels.len());
    buffer[..n].copy_from_slice(&pixels[..n]);
    buffer
        .present()
        .map_err(|e| ChartError::Display(e.to_string()))
}
