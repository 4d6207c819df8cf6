use crate::geometry::{GaugeBox, Point, Polyline};

/// Horizontal inset of the top and bottom vertices, as a fraction of box width.
pub const NOTCH_INSET: f64 = 0.18;

/// Placement and orientation of one gauge arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeSpec {
    pub bounds: GaugeBox,
    /// Notch points out of the left edge when true, the right edge otherwise.
    pub left_side: bool,
    /// Index 0 is the bottom vertex when true.
    pub bottom_to_top: bool,
}

impl GaugeSpec {
    pub fn polyline(&self) -> Polyline {
        build_half_hex_polyline(self.bounds, self.left_side, self.bottom_to_top)
    }
}

/// Builds the three-vertex "half hexagon" arc for a gauge box.
///
/// The middle vertex sits on the notched edge at mid-height; the outer two are
/// inset by [`NOTCH_INSET`] of the width. Without `bottom_to_top` the order is
/// top, mid, bottom.
pub fn build_half_hex_polyline(bounds: GaugeBox, left_side: bool, bottom_to_top: bool) -> Polyline {
    let x0 = bounds.top_left.x;
    let y0 = bounds.top_left.y;
    let x1 = bounds.right();
    let y1 = bounds.bottom();
    let inset = bounds.width * NOTCH_INSET;
    let mid_y = (y0 + y1) / 2.0;

    let mut points = if left_side {
        vec![
            Point::new(x0 + inset, y0),
            Point::new(x0, mid_y),
            Point::new(x0 + inset, y1),
        ]
    } else {
        vec![
            Point::new(x1 - inset, y0),
            Point::new(x1, mid_y),
            Point::new(x1 - inset, y1),
        ]
    };
    if bottom_to_top {
        points.reverse();
    }
    points
}
