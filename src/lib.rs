// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod config;
pub mod error;
pub mod gauge;
pub mod geometry;
pub mod raster;
pub mod sampler;
pub mod scene;
pub mod shape;
pub mod telemetry;
pub mod ticks;

// External crate imports
use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use tracing::{debug, info, warn};

// Standard library imports
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Window management imports
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

pub use config::{DashboardConfig, Palette};
pub use error::{HostError, Result};
pub use gauge::{render_dashboard, DashboardLayout, Metric, Snapshot, Tone};
pub use geometry::{polyline_total_length, segment_length, GaugeBox, Point, Polyline, Size};
pub use raster::Canvas;
pub use sampler::{point_at, truncate};
pub use scene::{Color, DrawCommand, Scene, StrokeStyle, TextAlign};
pub use shape::{build_half_hex_polyline, GaugeSpec};
pub use ticks::{generate_ticks, Ticks};

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Dashboard window: the render kernel plus a software-rasterized host.
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: DashboardConfig,
    snapshot: Snapshot,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            snapshot: Snapshot::default(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn set_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
    }

    /// Draw commands for the current snapshot on a canvas of `size`.
    pub fn render(&self, size: Size) -> Scene {
        render_dashboard(size, &self.snapshot, &self.config)
    }

    /// Opens the window and redraws with the latest snapshot received on
    /// `receiver` until the window closes.
    pub fn show_with_snapshots(self, receiver: Receiver<Snapshot>) -> Result<()> {
        let font = match &self.config.font_data {
            Some(bytes) => Some(Font::try_from_vec(bytes.clone()).ok_or_else(|| {
                HostError::Font("font data is not a TrueType/OpenType face".into())
            })?),
            None => {
                warn!("no font configured, labels will not be drawn");
                None
            }
        };

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(
                self.config.window_width as f64,
                self.config.window_height as f64,
            ))
            .build(&event_loop)?;
        let window = Arc::new(window);

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;
        info!(width = fb_width, height = fb_height, "dashboard window opened");

        let frame_duration = Duration::from_secs_f64(1.0 / self.config.max_framerate.max(1.0));
        let mut last_frame = Instant::now();
        let mut dashboard = self;
        let window_clone = window.clone();

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        info!("window closed");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if new_size.width == 0 || new_size.height == 0 {
                            return;
                        }
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        if let Err(err) = pixels.resize_buffer(new_size.width, new_size.height) {
                            warn!(%err, "failed to resize frame buffer");
                        }
                        if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                            warn!(%err, "failed to resize surface");
                        }
                        debug!(width = fb_width, height = fb_height, "resized");
                    }
                    WindowEvent::RedrawRequested => {
                        // only the newest snapshot matters
                        if let Some(latest) = receiver.try_iter().last() {
                            dashboard.set_snapshot(latest);
                        }
                        let scene = dashboard.render(Size::new(fb_width as f64, fb_height as f64));
                        let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                        canvas.draw_scene(&scene, font.as_ref());
                        if let Err(err) = pixels.render() {
                            warn!(%err, "render failed, closing");
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}
