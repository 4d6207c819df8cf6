// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

use crate::geometry::Point;
use crate::ticks::Ticks;

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Outer glow passes as `(width factor, opacity)`, drawn in this order.
pub const GLOW_PASSES: [(f32, f32); 2] = [(2.2, 0.20), (4.0, 0.08)];

/// Opacity at the start of every core segment; the end is fully opaque.
pub const CORE_START_ALPHA: f32 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
    pub glow: bool,
}

impl StrokeStyle {
    pub const fn new(color: Color, width: f32, glow: bool) -> Self {
        Self { color, width, glow }
    }
}

/// Appearance of a tick: a horizontal segment centred on the tick point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickStyle {
    pub half_length: f64,
    pub width: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Soft halo drawn behind text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub radius: f32,
    pub alpha: f32,
}

/// Host-agnostic draw primitive. Every stroke uses round caps and joins.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    /// Radial fill from `color` at `alpha` in the centre to transparent at `radius`.
    Vignette {
        center: Point,
        radius: f64,
        color: Color,
        alpha: f32,
    },
    /// One straight segment; opacity ramps linearly from `start_alpha` to `end_alpha`.
    Stroke {
        from: Point,
        to: Point,
        width: f32,
        color: Color,
        start_alpha: f32,
        end_alpha: f32,
    },
    Tick {
        center: Point,
        half_length: f64,
        width: f32,
        color: Color,
        alpha: f32,
    },
    /// Text whose baseline passes through `anchor`.
    Text {
        anchor: Point,
        text: String,
        font_size: f32,
        align: TextAlign,
        color: Color,
        shadow: Option<Shadow>,
    },
    /// Rounded box sized by the host around centred text.
    Pill {
        center: Point,
        text: String,
        font_size: f32,
        text_color: Color,
        fill: Color,
        fill_alpha: f32,
        padding: (f64, f64),
    },
}

/// Ordered draw commands for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Composites `poly` as glow passes (if enabled) followed by the core
    /// stroke, one gradient per segment. Paths with fewer than two points draw
    /// nothing.
    pub fn stroke_polyline(&mut self, poly: &[Point], style: StrokeStyle) {
        if poly.len() < 2 {
            return;
        }
        if style.glow {
            for (factor, alpha) in GLOW_PASSES {
                for pair in poly.windows(2) {
                    self.add_command(DrawCommand::Stroke {
                        from: pair[0],
                        to: pair[1],
                        width: style.width * factor,
                        color: style.color,
                        start_alpha: alpha,
                        end_alpha: alpha,
                    });
                }
            }
        }
        for pair in poly.windows(2) {
            self.add_command(DrawCommand::Stroke {
                from: pair[0],
                to: pair[1],
                width: style.width,
                color: style.color,
                start_alpha: CORE_START_ALPHA,
                end_alpha: 1.0,
            });
        }
    }

    /// Emits every major tick, then every minor tick.
    pub fn tick_marks(&mut self, ticks: &Ticks, color: Color, major: TickStyle, minor: TickStyle) {
        let majors = ticks.majors.iter().map(|p| (p, major));
        let minors = ticks.minors.iter().map(|p| (p, minor));
        for (center, style) in majors.chain(minors) {
            self.add_command(DrawCommand::Tick {
                center: *center,
                half_length: style.half_length,
                width: style.width,
                color,
                alpha: style.alpha,
            });
        }
    }
}
