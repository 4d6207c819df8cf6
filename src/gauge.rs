// ============================================================================
// GAUGE ASSEMBLY
// ============================================================================

use tracing::debug;

use crate::config::{DashboardConfig, Palette};
use crate::geometry::{GaugeBox, Point, Polyline, Size};
use crate::sampler::{point_at, truncate};
use crate::scene::{Color, DrawCommand, Scene, StrokeStyle, TextAlign};
use crate::shape::GaugeSpec;
use crate::ticks::generate_ticks;

pub const MAX_SPEED: f64 = 260.0;
pub const MAX_RPM: f64 = 7000.0;
pub const MAX_FUEL: f64 = 100.0;
pub const MAX_COOLANT: f64 = 120.0;
pub const SPEED_THRESHOLD: f64 = 130.0;
pub const RPM_THRESHOLD: f64 = 3000.0;
pub const FUEL_HIGH: f64 = 75.0;
pub const FUEL_LOW: f64 = 25.0;

/// The four telemetry channels shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Speed,
    Rpm,
    Fuel,
    Coolant,
}

impl Metric {
    pub const fn range(self) -> (f64, f64) {
        match self {
            Metric::Speed => (0.0, MAX_SPEED),
            Metric::Rpm => (0.0, MAX_RPM),
            Metric::Fuel => (0.0, MAX_FUEL),
            Metric::Coolant => (0.0, MAX_COOLANT),
        }
    }

    /// Clamps into range; non-finite readings fall back to the range minimum.
    pub fn clamp(self, value: f64) -> f64 {
        let (min, max) = self.range();
        if value.is_finite() {
            value.clamp(min, max)
        } else {
            min
        }
    }

    pub fn fraction(self, value: f64) -> f64 {
        let (min, max) = self.range();
        (self.clamp(value) - min) / (max - min)
    }

    /// Color tier for a reading, decided on the clamped value.
    pub fn tone(self, value: f64) -> Tone {
        let value = self.clamp(value);
        match self {
            Metric::Speed if value <= SPEED_THRESHOLD => Tone::Ok,
            Metric::Rpm if value <= RPM_THRESHOLD => Tone::Ok,
            Metric::Speed | Metric::Rpm => Tone::Warning,
            Metric::Fuel if value >= FUEL_HIGH => Tone::FuelHigh,
            Metric::Fuel if value >= FUEL_LOW => Tone::FuelMid,
            Metric::Fuel => Tone::FuelLow,
            // coolant has no warning tier
            Metric::Coolant => Tone::Ok,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Ok,
    Warning,
    FuelHigh,
    FuelMid,
    FuelLow,
}

impl Palette {
    pub fn tone(&self, tone: Tone) -> Color {
        match tone {
            Tone::Ok => self.ok,
            Tone::Warning => self.warning,
            Tone::FuelHigh => self.fuel_high,
            Tone::FuelMid => self.fuel_mid,
            Tone::FuelLow => self.fuel_low,
        }
    }
}

/// Shown in the footer for a missing remaining range or date.
pub const PLACEHOLDER: &str = "—";

/// Telemetry values for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub speed_kmh: f64,
    pub rpm: f64,
    pub fuel_percent: f64,
    pub coolant_c: f64,
    /// `None` hides the speed-limit pill.
    pub speed_limit_kph: Option<i32>,
    pub remaining_km: Option<i32>,
    /// Preformatted by the host; the kernel has no clock.
    pub date: Option<String>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            speed_kmh: 0.0,
            rpm: 800.0,
            fuel_percent: 55.0,
            coolant_c: 90.0,
            speed_limit_kph: None,
            remaining_km: None,
            date: None,
        }
    }
}

/// Where the four gauges sit for a given canvas size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardLayout {
    pub speed: GaugeSpec,
    pub rpm: GaugeSpec,
    pub fuel: GaugeSpec,
    pub coolant: GaugeSpec,
}

impl DashboardLayout {
    pub fn new(size: Size) -> Self {
        let (w, h) = (size.width, size.height);
        let gauge = |x: f64, y: f64, gw: f64, gh: f64, left_side: bool| GaugeSpec {
            bounds: GaugeBox::new(Point::new(w * x, h * y), w * gw, h * gh),
            left_side,
            bottom_to_top: true,
        };
        Self {
            speed: gauge(0.08, 0.12, 0.40, 0.50, true),
            rpm: gauge(0.52, 0.12, 0.40, 0.50, false),
            fuel: gauge(0.10, 0.72, 0.22, 0.22, true),
            coolant: gauge(0.68, 0.72, 0.22, 0.22, false),
        }
    }
}

/// Fixed label on a gauge arc, placed independently of the current value.
#[derive(Debug, Clone, PartialEq)]
struct AnchorLabel {
    fraction: f64,
    text: String,
    dy: f64,
}

fn anchor_labels(metric: Metric, threshold: f64) -> [AnchorLabel; 3] {
    let (_, max) = metric.range();
    [
        AnchorLabel {
            fraction: 0.0,
            text: "0".to_string(),
            dy: 26.0,
        },
        AnchorLabel {
            fraction: metric.fraction(threshold),
            text: format!("{threshold:.0}"),
            dy: -8.0,
        },
        AnchorLabel {
            fraction: 1.0,
            text: format!("{max:.0}"),
            dy: -10.0,
        },
    ]
}

/// Builds the full draw-command list for one frame.
///
/// Pure in `(size, snapshot, config)`; a canvas that is not drawable yields a
/// scene holding only the clear.
pub fn render_dashboard(size: Size, snapshot: &Snapshot, config: &DashboardConfig) -> Scene {
    let palette = &config.palette;
    let mut scene = Scene::new();
    scene.add_command(DrawCommand::Clear(palette.background));
    if !size.is_drawable() {
        debug!(
            width = size.width,
            height = size.height,
            "skipping frame for empty canvas"
        );
        return scene;
    }

    scene.add_command(DrawCommand::Vignette {
        center: size.center(),
        radius: size.min_dimension() * config.vignette_radius_factor,
        color: palette.surface_variant,
        alpha: config.vignette_alpha,
    });

    let layout = DashboardLayout::new(size);
    let speed_poly = layout.speed.polyline();
    let rpm_poly = layout.rpm.polyline();
    let frame_style = StrokeStyle::new(palette.frame, config.frame_width, false);

    // Main gauges: frames, ticks, then progress on top
    scene.stroke_polyline(&speed_poly, frame_style);
    scene.stroke_polyline(&rpm_poly, frame_style);
    for poly in [&speed_poly, &rpm_poly] {
        let ticks = generate_ticks(poly, config.major_ticks, config.minor_ticks_per_segment);
        scene.tick_marks(&ticks, palette.frame, config.major_tick, config.minor_tick);
    }
    let main_width = config.progress_width;
    add_progress(&mut scene, &speed_poly, Metric::Speed, snapshot.speed_kmh, main_width, palette);
    add_progress(&mut scene, &rpm_poly, Metric::Rpm, snapshot.rpm, main_width, palette);

    let speed_labels = (Metric::Speed, SPEED_THRESHOLD, TextAlign::Left);
    let rpm_labels = (Metric::Rpm, RPM_THRESHOLD, TextAlign::Right);
    add_anchor_labels(&mut scene, &speed_poly, speed_labels, config);
    add_anchor_labels(&mut scene, &rpm_poly, rpm_labels, config);

    // Mini gauges
    for (spec, metric, value, caption) in [
        (layout.fuel, Metric::Fuel, snapshot.fuel_percent, "Fuel %"),
        (layout.coolant, Metric::Coolant, snapshot.coolant_c, "Coolant °C"),
    ] {
        let poly = spec.polyline();
        scene.stroke_polyline(&poly, frame_style);
        add_progress(&mut scene, &poly, metric, value, config.mini_progress_width, palette);
        scene.add_command(DrawCommand::Text {
            anchor: Point::new(
                spec.bounds.center_x(),
                spec.bounds.bottom() + config.caption_gap,
            ),
            text: caption.to_string(),
            font_size: config.caption_font_size,
            align: TextAlign::Center,
            color: palette.label,
            shadow: Some(config.caption_shadow),
        });
    }

    if let Some(limit) = snapshot.speed_limit_kph {
        let over = over_limit(snapshot.speed_kmh, limit);
        scene.add_command(DrawCommand::Pill {
            center: size.center(),
            text: format!("Speed limit: {limit} km/h"),
            font_size: config.pill_font_size,
            text_color: if over { palette.warning } else { palette.ok },
            fill: palette.surface,
            fill_alpha: config.pill_alpha,
            padding: (16.0, 10.0),
        });
    }

    if config.show_debug_readout {
        scene.add_command(DrawCommand::Text {
            anchor: Point::new(size.width / 2.0, size.height - config.debug_bottom_margin),
            text: debug_readout(snapshot),
            font_size: config.debug_font_size,
            align: TextAlign::Center,
            color: palette.label,
            shadow: None,
        });
    }

    add_footer(&mut scene, size, snapshot, config);
    scene
}

/// Raw speed is compared so readings past the dial still count; non-finite
/// readings use the clamped fallback.
fn over_limit(speed_kmh: f64, limit: i32) -> bool {
    let speed = if speed_kmh.is_finite() {
        speed_kmh
    } else {
        Metric::Speed.clamp(speed_kmh)
    };
    speed > f64::from(limit)
}

pub fn remaining_text(remaining_km: Option<i32>) -> String {
    match remaining_km {
        Some(km) => format!("Remaining KM: {km}"),
        None => format!("Remaining KM: {PLACEHOLDER}"),
    }
}

fn add_footer(scene: &mut Scene, size: Size, snapshot: &Snapshot, config: &DashboardConfig) {
    let y = size.height - config.footer_margin;
    let date = snapshot.date.as_deref().unwrap_or(PLACEHOLDER);
    for (x, text, align) in [
        (config.footer_margin, remaining_text(snapshot.remaining_km), TextAlign::Left),
        (size.width - config.footer_margin, date.to_string(), TextAlign::Right),
    ] {
        scene.add_command(DrawCommand::Text {
            anchor: Point::new(x, y),
            text,
            font_size: config.footer_font_size,
            align,
            color: config.palette.label,
            shadow: None,
        });
    }
}

/// One-line summary of the clamped readings.
pub fn debug_readout(snapshot: &Snapshot) -> String {
    format!(
        "spd={:.0}  rpm={:.0}  fuel={:.1}%  cool={:.1}°C",
        Metric::Speed.clamp(snapshot.speed_kmh),
        Metric::Rpm.clamp(snapshot.rpm),
        Metric::Fuel.clamp(snapshot.fuel_percent),
        Metric::Coolant.clamp(snapshot.coolant_c),
    )
}

/// Progress sub-path for `value` on `poly`; a single point when nothing is filled.
pub fn progress_path(poly: &[Point], metric: Metric, value: f64) -> Polyline {
    truncate(poly, metric.fraction(value))
}

fn add_progress(
    scene: &mut Scene,
    poly: &[Point],
    metric: Metric,
    value: f64,
    width: f32,
    palette: &Palette,
) {
    let partial = progress_path(poly, metric, value);
    let color = palette.tone(metric.tone(value));
    scene.stroke_polyline(&partial, StrokeStyle::new(color, width, true));
}

fn add_anchor_labels(
    scene: &mut Scene,
    poly: &[Point],
    (metric, threshold, align): (Metric, f64, TextAlign),
    config: &DashboardConfig,
) {
    let dx = match align {
        TextAlign::Right => -config.label_inset,
        _ => config.label_inset,
    };
    for label in anchor_labels(metric, threshold) {
        let at = point_at(poly, label.fraction);
        scene.add_command(DrawCommand::Text {
            anchor: at.offset(dx, label.dy),
            text: label.text,
            font_size: config.label_font_size,
            align,
            color: config.palette.label,
            shadow: Some(config.label_shadow),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fractions_clamp_to_range() {
        assert_eq!(Metric::Speed.fraction(-20.0), 0.0);
        assert_eq!(Metric::Speed.fraction(400.0), 1.0);
        assert_relative_eq!(Metric::Speed.fraction(195.0), 0.75);
        assert_relative_eq!(Metric::Rpm.fraction(3500.0), 0.5);
        assert_relative_eq!(Metric::Fuel.fraction(55.0), 0.55);
        assert_relative_eq!(Metric::Coolant.fraction(90.0), 0.75);
    }

    #[test]
    fn non_finite_readings_fall_back_to_minimum() {
        assert_eq!(Metric::Rpm.clamp(f64::NAN), 0.0);
        assert_eq!(Metric::Fuel.fraction(f64::INFINITY), 0.0);
    }

    #[test]
    fn speed_threshold_is_inclusive() {
        assert_eq!(Metric::Speed.tone(129.0), Tone::Ok);
        assert_eq!(Metric::Speed.tone(130.0), Tone::Ok);
        assert_eq!(Metric::Speed.tone(131.0), Tone::Warning);
    }

    #[test]
    fn rpm_threshold() {
        assert_eq!(Metric::Rpm.tone(3000.0), Tone::Ok);
        assert_eq!(Metric::Rpm.tone(3000.1), Tone::Warning);
        assert_eq!(Metric::Rpm.tone(90_000.0), Tone::Warning);
    }

    #[test]
    fn fuel_has_three_tiers() {
        assert_eq!(Metric::Fuel.tone(75.0), Tone::FuelHigh);
        assert_eq!(Metric::Fuel.tone(74.9), Tone::FuelMid);
        assert_eq!(Metric::Fuel.tone(25.0), Tone::FuelMid);
        assert_eq!(Metric::Fuel.tone(24.9), Tone::FuelLow);
        assert_eq!(Metric::Fuel.tone(150.0), Tone::FuelHigh);
    }

    #[test]
    fn coolant_never_warns() {
        for c in [0.0, 60.0, 119.0, 500.0] {
            assert_eq!(Metric::Coolant.tone(c), Tone::Ok);
        }
    }

    #[test]
    fn layout_scales_with_canvas() {
        let layout = DashboardLayout::new(Size::new(400.0, 300.0));
        assert_relative_eq!(layout.speed.bounds.top_left.x, 32.0);
        assert_relative_eq!(layout.speed.bounds.top_left.y, 36.0);
        assert_relative_eq!(layout.rpm.bounds.top_left.x, 208.0);
        assert_relative_eq!(layout.speed.bounds.width, 160.0);
        assert_relative_eq!(layout.speed.bounds.height, 150.0);
        assert_relative_eq!(layout.fuel.bounds.width, 88.0);
        assert_relative_eq!(layout.coolant.bounds.top_left.y, 216.0);
        assert!(layout.speed.left_side && !layout.rpm.left_side);
        assert!(layout.fuel.left_side && !layout.coolant.left_side);
    }

    #[test]
    fn zero_progress_is_a_single_point() {
        let layout = DashboardLayout::new(Size::new(400.0, 300.0));
        let poly = layout.speed.polyline();
        assert_eq!(progress_path(&poly, Metric::Speed, 0.0).len(), 1);
        assert_eq!(progress_path(&poly, Metric::Speed, 260.0), poly);
    }

    #[test]
    fn anchor_labels_use_threshold_fraction() {
        let labels = anchor_labels(Metric::Rpm, RPM_THRESHOLD);
        assert_eq!(labels[1].text, "3000");
        assert_relative_eq!(labels[1].fraction, 3000.0 / 7000.0);
        assert_eq!(labels[2].text, "7000");
        assert_eq!(labels[0].dy, 26.0);
    }

    #[test]
    fn debug_readout_formats_clamped_values() {
        let snapshot = Snapshot {
            speed_kmh: 300.0,
            rpm: 2400.4,
            fuel_percent: 55.0,
            coolant_c: 90.0,
            ..Snapshot::default()
        };
        assert_eq!(
            debug_readout(&snapshot),
            "spd=260  rpm=2400  fuel=55.0%  cool=90.0°C"
        );
    }

    #[test]
    fn limit_compares_raw_speed() {
        assert!(over_limit(300.0, 270));
        assert!(!over_limit(270.0, 270));
        assert!(!over_limit(f64::NAN, 0));
        assert!(!over_limit(f64::INFINITY, 50));
    }

    #[test]
    fn remaining_text_uses_placeholder() {
        assert_eq!(remaining_text(Some(412)), "Remaining KM: 412");
        assert_eq!(remaining_text(None), "Remaining KM: —");
    }
}
