// ============================================================================
// SOFTWARE RASTERIZER
// ============================================================================
//
// Renders a `Scene` into an RGBA8 frame buffer (the `pixels` frame layout).

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::geometry::Point;
use crate::scene::{Color, DrawCommand, Scene, Shadow, TextAlign};

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    /// `frame` must hold `width * height` RGBA pixels; extra bytes are ignored.
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        let height = height.min(frame.len() / (width * 4).max(1));
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// RGBA value at `(x, y)`, if inside the canvas.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.frame[idx..idx + 4]);
        Some(out)
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    /// Replays `scene` in order. Text and pill labels need `font`; without it
    /// only their geometry is drawn.
    pub fn draw_scene(&mut self, scene: &Scene, font: Option<&Font>) {
        for command in scene.commands() {
            match command {
                DrawCommand::Clear(color) => self.clear(*color),
                DrawCommand::Vignette {
                    center,
                    radius,
                    color,
                    alpha,
                } => self.vignette(*center, *radius, *color, *alpha),
                DrawCommand::Stroke {
                    from,
                    to,
                    width,
                    color,
                    start_alpha,
                    end_alpha,
                } => self.stroke_segment(*from, *to, *width, *color, *start_alpha, *end_alpha),
                DrawCommand::Tick {
                    center,
                    half_length,
                    width,
                    color,
                    alpha,
                } => self.stroke_segment(
                    center.offset(-half_length, 0.0),
                    center.offset(*half_length, 0.0),
                    *width,
                    *color,
                    *alpha,
                    *alpha,
                ),
                DrawCommand::Text {
                    anchor,
                    text,
                    font_size,
                    align,
                    color,
                    shadow,
                } => {
                    if let Some(font) = font {
                        let scale = Scale::uniform(*font_size);
                        if let Some(shadow) = shadow {
                            self.text_shadow(*anchor, text, font, scale, *align, *shadow);
                        }
                        self.text(*anchor, text, font, scale, *align, *color, 1.0);
                    }
                }
                DrawCommand::Pill {
                    center,
                    text,
                    font_size,
                    text_color,
                    fill,
                    fill_alpha,
                    padding,
                } => self.pill(
                    *center,
                    text,
                    *font_size,
                    *text_color,
                    *fill,
                    *fill_alpha,
                    *padding,
                    font,
                ),
            }
        }
    }

    fn blend(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let a = alpha.clamp(0.0, 1.0);
        let src = [color.r as f32, color.g as f32, color.b as f32];
        for (channel, s) in src.iter().enumerate() {
            let d = self.frame[idx + channel] as f32;
            self.frame[idx + channel] = (s * a + d * (1.0 - a)).round() as u8;
        }
        self.frame[idx + 3] = 0xff;
    }

    /// Anti-aliased capsule from `from` to `to`: round caps fall out of the
    /// distance-to-segment test. Opacity is interpolated along the segment.
    fn stroke_segment(
        &mut self,
        from: Point,
        to: Point,
        width: f32,
        color: Color,
        start_alpha: f32,
        end_alpha: f32,
    ) {
        let half = f64::from(width) / 2.0;
        let pad = half.ceil() + 1.0;
        let min_x = (from.x.min(to.x) - pad).floor().max(0.0) as i32;
        let max_x = (from.x.max(to.x) + pad).ceil().min(self.width as f64 - 1.0) as i32;
        let min_y = (from.y.min(to.y) - pad).floor().max(0.0) as i32;
        let max_y = (from.y.max(to.y) + pad).ceil().min(self.height as f64 - 1.0) as i32;
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let len_sq = dx * dx + dy * dy;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 - from.x;
                let py = y as f64 - from.y;
                let t = if len_sq > 0.0 {
                    ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let lx = from.x + t * dx;
                let ly = from.y + t * dy;
                let dist = (lx - x as f64).hypot(ly - y as f64);
                let aa = (1.0 - (dist - half).clamp(0.0, 1.0)) as f32;
                if aa > 0.01 {
                    let alpha = start_alpha + (end_alpha - start_alpha) * t as f32;
                    self.blend(x, y, color, aa * alpha);
                }
            }
        }
    }

    fn vignette(&mut self, center: Point, radius: f64, color: Color, alpha: f32) {
        if radius <= 0.0 {
            return;
        }
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let dist = (x as f64 - center.x).hypot(y as f64 - center.y);
                if dist < radius {
                    let falloff = (1.0 - dist / radius) as f32;
                    self.blend(x, y, color, alpha * falloff);
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn text(
        &mut self,
        anchor: Point,
        text: &str,
        font: &Font,
        scale: Scale,
        align: TextAlign,
        color: Color,
        alpha: f32,
    ) {
        let glyphs: Vec<PositionedGlyph> = font.layout(text, scale, point(0.0, 0.0)).collect();
        let Some((min_x, max_x, _, _)) = pixel_bounds(&glyphs) else {
            return;
        };
        let width_px = max_x - min_x;
        let left = match align {
            TextAlign::Left => anchor.x,
            TextAlign::Center => anchor.x - f64::from(width_px) / 2.0,
            TextAlign::Right => anchor.x - f64::from(width_px),
        };
        let offset_x = left.round() as i32 - min_x;
        let offset_y = anchor.y.round() as i32;
        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = offset_x + bb.min.x + gx as i32;
                    let py = offset_y + bb.min.y + gy as i32;
                    self.blend(px, py, color, v * alpha);
                });
            }
        }
    }

    fn text_shadow(
        &mut self,
        anchor: Point,
        text: &str,
        font: &Font,
        scale: Scale,
        align: TextAlign,
        shadow: Shadow,
    ) {
        let spread = f64::from((shadow.radius / 3.0).round().max(1.0));
        let black = Color::new(0, 0, 0);
        for (dx, dy) in [(-spread, 0.0), (spread, 0.0), (0.0, -spread), (0.0, spread)] {
            self.text(anchor.offset(dx, dy), text, font, scale, align, black, shadow.alpha / 2.0);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn pill(
        &mut self,
        center: Point,
        text: &str,
        font_size: f32,
        text_color: Color,
        fill: Color,
        fill_alpha: f32,
        padding: (f64, f64),
        font: Option<&Font>,
    ) {
        let scale = Scale::uniform(font_size);
        let (text_w, ascent, descent) = match font {
            Some(font) => {
                let v = font.v_metrics(scale);
                let width = text_width(text, font, scale);
                (f64::from(width), f64::from(v.ascent), f64::from(v.descent))
            }
            None => {
                let size = f64::from(font_size);
                (size * 0.55 * text.chars().count() as f64, size * 0.8, -size * 0.2)
            }
        };
        let half_w = text_w / 2.0 + padding.0;
        let half_h = (ascent - descent) / 2.0 + padding.1;
        let corner = half_h.min(16.0);
        self.rounded_rect(center, half_w, half_h, corner, fill, fill_alpha);

        if let Some(font) = font {
            let baseline = center.offset(0.0, (ascent + descent) / 2.0);
            self.text(baseline, text, font, scale, TextAlign::Center, text_color, 1.0);
        }
    }

    fn rounded_rect(
        &mut self,
        center: Point,
        half_w: f64,
        half_h: f64,
        corner: f64,
        color: Color,
        alpha: f32,
    ) {
        let min_x = (center.x - half_w - 1.0).floor() as i32;
        let max_x = (center.x + half_w + 1.0).ceil() as i32;
        let min_y = (center.y - half_h - 1.0).floor() as i32;
        let max_y = (center.y + half_h + 1.0).ceil() as i32;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                // signed distance to the rounded box
                let qx = (x as f64 - center.x).abs() - (half_w - corner);
                let qy = (y as f64 - center.y).abs() - (half_h - corner);
                let outside = qx.max(0.0).hypot(qy.max(0.0));
                let dist = outside + qx.max(qy).min(0.0) - corner;
                let aa = (0.5 - dist).clamp(0.0, 1.0) as f32;
                if aa > 0.0 {
                    self.blend(x, y, color, aa * alpha);
                }
            }
        }
    }
}

fn pixel_bounds(glyphs: &[PositionedGlyph]) -> Option<(i32, i32, i32, i32)> {
    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    (min_x < max_x).then_some((min_x, max_x, min_y, max_y))
}

/// Inked width of `text` in pixels.
pub fn text_width(text: &str, font: &Font, scale: Scale) -> i32 {
    let glyphs: Vec<PositionedGlyph> = font.layout(text, scale, point(0.0, 0.0)).collect();
    pixel_bounds(&glyphs).map_or(0, |(min_x, max_x, _, _)| max_x - min_x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::StrokeStyle;

    const BLACK: Color = Color::new(0, 0, 0);
    const WHITE: Color = Color::new(0xff, 0xff, 0xff);

    fn frame(w: usize, h: usize) -> Vec<u8> {
        vec![0u8; w * h * 4]
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut buf = frame(8, 4);
        let mut canvas = Canvas::new(&mut buf, 8, 4);
        canvas.clear(Color::new(1, 2, 3));
        assert_eq!(canvas.pixel(7, 3), Some([1, 2, 3, 0xff]));
        assert_eq!(canvas.pixel(8, 0), None);
    }

    #[test]
    fn stroke_marks_segment_and_spares_far_pixels() {
        let mut scene = Scene::new();
        scene.add_command(DrawCommand::Clear(BLACK));
        scene.stroke_polyline(
            &[Point::new(5.0, 10.0), Point::new(35.0, 10.0)],
            StrokeStyle::new(WHITE, 4.0, false),
        );
        let mut buf = frame(40, 20);
        let mut canvas = Canvas::new(&mut buf, 40, 20);
        canvas.draw_scene(&scene, None);

        let on = canvas.pixel(20, 10).unwrap();
        assert!(on[0] > 200);
        assert_eq!(canvas.pixel(20, 18), Some([0, 0, 0, 0xff]));
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 0xff]));
    }

    #[test]
    fn core_stroke_brightens_towards_end() {
        let mut scene = Scene::new();
        scene.add_command(DrawCommand::Clear(BLACK));
        scene.stroke_polyline(
            &[Point::new(2.0, 5.0), Point::new(98.0, 5.0)],
            StrokeStyle::new(WHITE, 6.0, false),
        );
        let mut buf = frame(100, 10);
        let mut canvas = Canvas::new(&mut buf, 100, 10);
        canvas.draw_scene(&scene, None);
        let start = canvas.pixel(3, 5).unwrap()[0];
        let end = canvas.pixel(97, 5).unwrap()[0];
        assert!(start < end, "start {start} end {end}");
    }

    #[test]
    fn off_canvas_geometry_is_ignored() {
        let mut scene = Scene::new();
        scene.add_command(DrawCommand::Clear(BLACK));
        scene.stroke_polyline(
            &[Point::new(-500.0, -500.0), Point::new(-400.0, -450.0)],
            StrokeStyle::new(WHITE, 10.0, true),
        );
        let mut buf = frame(10, 10);
        let mut canvas = Canvas::new(&mut buf, 10, 10);
        canvas.draw_scene(&scene, None);
        assert!(buf.chunks_exact(4).all(|px| px == [0, 0, 0, 0xff]));
    }

    #[test]
    fn pill_without_font_still_draws_box() {
        let mut scene = Scene::new();
        scene.add_command(DrawCommand::Clear(BLACK));
        scene.add_command(DrawCommand::Pill {
            center: Point::new(50.0, 20.0),
            text: "Speed limit: 50 km/h".to_string(),
            font_size: 10.0,
            text_color: WHITE,
            fill: WHITE,
            fill_alpha: 1.0,
            padding: (4.0, 4.0),
        });
        let mut buf = frame(100, 40);
        let mut canvas = Canvas::new(&mut buf, 100, 40);
        canvas.draw_scene(&scene, None);
        assert_eq!(canvas.pixel(50, 20), Some([0xff, 0xff, 0xff, 0xff]));
        assert_eq!(canvas.pixel(50, 2), Some([0, 0, 0, 0xff]));
    }

    #[test]
    fn short_frame_limits_height() {
        let mut buf = vec![0u8; 10 * 4 * 3];
        let canvas = Canvas::new(&mut buf, 10, 50);
        assert_eq!(canvas.height(), 3);
    }
}
