use std::path::Path;

use bon::Builder;

use crate::error::Result;
use crate::scene::{Color, Shadow, TickStyle};

/// Theme colors used by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub surface: Color,
    pub surface_variant: Color,
    /// Gauge frames and ticks.
    pub frame: Color,
    /// Value within its threshold.
    pub ok: Color,
    /// Value past its threshold.
    pub warning: Color,
    pub fuel_high: Color,
    pub fuel_mid: Color,
    pub fuel_low: Color,
    pub label: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::new(0x11, 0x14, 0x18),
            surface: Color::new(0x1d, 0x20, 0x24),
            surface_variant: Color::new(0x41, 0x48, 0x4d),
            frame: Color::new(0x8b, 0x92, 0x97),
            ok: Color::new(0x4f, 0xd8, 0xeb),
            warning: Color::new(0xff, 0xb4, 0xab),
            fuel_high: Color::new(0x8b, 0xd6, 0x8a),
            fuel_mid: Color::new(0xe6, 0xc4, 0x49),
            fuel_low: Color::new(0xff, 0xb4, 0xab),
            label: Color::new(0xe1, 0xe2, 0xe5),
        }
    }
}

/// Rendering and host settings for the dashboard.
#[derive(Debug, Clone, Builder)]
pub struct DashboardConfig {
    #[builder(default)]
    pub palette: Palette,

    // Strokes
    #[builder(default = 4.0)]
    pub frame_width: f32,
    #[builder(default = 10.0)]
    pub progress_width: f32,
    #[builder(default = 7.0)]
    pub mini_progress_width: f32,

    // Ticks (main gauges only)
    #[builder(default = 6)]
    pub major_ticks: usize,
    #[builder(default = 1)]
    pub minor_ticks_per_segment: usize,
    #[builder(default = TickStyle { half_length: 12.0, width: 2.0, alpha: 1.0 })]
    pub major_tick: TickStyle,
    #[builder(default = TickStyle { half_length: 6.0, width: 1.5, alpha: 0.6 })]
    pub minor_tick: TickStyle,

    // Labels
    #[builder(default = 34.0)]
    pub label_font_size: f32,
    #[builder(default = 10.0)]
    pub label_inset: f64,
    #[builder(default = Shadow { radius: 6.0, alpha: 60.0 / 255.0 })]
    pub label_shadow: Shadow,
    #[builder(default = 28.0)]
    pub caption_font_size: f32,
    #[builder(default = 22.0)]
    pub caption_gap: f64,
    #[builder(default = Shadow { radius: 5.0, alpha: 50.0 / 255.0 })]
    pub caption_shadow: Shadow,

    // Overlays
    #[builder(default = 0.20)]
    pub vignette_alpha: f32,
    #[builder(default = 0.75)]
    pub vignette_radius_factor: f64,
    #[builder(default = 22.0)]
    pub pill_font_size: f32,
    #[builder(default = 0.92)]
    pub pill_alpha: f32,
    #[builder(default = true)]
    pub show_debug_readout: bool,
    #[builder(default = 20.0)]
    pub debug_font_size: f32,
    #[builder(default = 48.0)]
    pub debug_bottom_margin: f64,
    /// Remaining range and date line along the bottom edge.
    #[builder(default = 22.0)]
    pub footer_font_size: f32,
    #[builder(default = 16.0)]
    pub footer_margin: f64,

    // Window configuration
    #[builder(default = "hexdash".to_string())]
    pub title: String,
    #[builder(default = 800)]
    pub window_width: usize,
    #[builder(default = 600)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    /// TrueType/OpenType bytes for labels; text is skipped when absent.
    pub font_data: Option<Vec<u8>>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Reads font bytes for [`DashboardConfig::font_data`]. Parsing happens when
/// the window opens.
pub fn load_font_data(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    Ok(std::fs::read(path)?)
}
