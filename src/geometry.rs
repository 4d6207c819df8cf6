// ============================================================================
// GEOMETRY PRIMITIVES
// ============================================================================

/// A point in drawing-surface coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at ratio `r` of the way from `self` to `other`. `r` is not clamped.
    pub fn lerp(self, other: Point, r: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * r,
            self.y + (other.y - self.y) * r,
        )
    }

    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Ordered vertex list; consecutive pairs form the segments.
pub type Polyline = Vec<Point>;

/// Axis-aligned box a gauge is laid out in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeBox {
    pub top_left: Point,
    pub width: f64,
    pub height: f64,
}

impl GaugeBox {
    pub const fn new(top_left: Point, width: f64, height: f64) -> Self {
        Self {
            top_left,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.top_left.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top_left.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.top_left.x + self.width / 2.0
    }
}

/// Drawable surface size supplied by the host every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both dimensions are finite and strictly positive.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn min_dimension(&self) -> f64 {
        self.width.min(self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Euclidean distance between `a` and `b`.
pub fn segment_length(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Sum of the segment lengths of `poly`; zero for fewer than two points.
pub fn polyline_total_length(poly: &[Point]) -> f64 {
    poly.windows(2).map(|w| segment_length(w[0], w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn segment_length_is_euclidean() {
        let d = segment_length(Point::new(1.0, 1.0), Point::new(4.0, 5.0));
        assert_relative_eq!(d, 5.0);
    }

    #[test]
    fn segment_length_of_coincident_points_is_zero() {
        let p = Point::new(3.5, -2.0);
        assert_eq!(segment_length(p, p), 0.0);
    }

    #[test]
    fn total_length_sums_segments() {
        let poly = vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 4.0),
            Point::new(3.0, 10.0),
        ];
        assert_relative_eq!(polyline_total_length(&poly), 11.0);
    }

    #[test]
    fn total_length_of_single_point_is_zero() {
        assert_eq!(polyline_total_length(&[Point::new(7.0, 7.0)]), 0.0);
        assert_eq!(polyline_total_length(&[]), 0.0);
    }

    #[test]
    fn lerp_hits_endpoints() {
        let a = Point::new(0.0, 10.0);
        let b = Point::new(20.0, 0.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Point::new(10.0, 5.0));
    }

    #[test]
    fn size_drawable_rejects_degenerate() {
        assert!(Size::new(400.0, 300.0).is_drawable());
        assert!(!Size::new(0.0, 300.0).is_drawable());
        assert!(!Size::new(400.0, f64::NAN).is_drawable());
        assert!(!Size::new(-1.0, 1.0).is_drawable());
    }
}
