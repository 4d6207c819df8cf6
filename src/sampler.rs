//! Arc-length parametrisation of polylines.
//!
//! Both operations walk the segments from index 0, consuming length until the
//! requested arc length falls inside a segment.

use crate::geometry::{polyline_total_length, segment_length, Point, Polyline};

/// Clamps a fraction into `[0, 1]`; NaN and infinities resolve to 0.
pub fn clamp_fraction(t: f64) -> f64 {
    if t.is_finite() {
        t.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Returns the leading part of `poly` covering fraction `t` of its arc length.
///
/// `t >= 1` returns `poly` unchanged. A fraction that resolves to zero length
/// returns just `poly[0]`, which callers treat as nothing to draw.
pub fn truncate(poly: &[Point], t: f64) -> Polyline {
    let Some(&first) = poly.first() else {
        return Vec::new();
    };
    let t = clamp_fraction(t);
    if t >= 1.0 {
        return poly.to_vec();
    }

    let mut remaining = polyline_total_length(poly) * t;
    let mut partial = vec![first];
    if remaining <= 0.0 {
        return partial;
    }

    for pair in poly.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let seg_len = segment_length(a, b);
        if remaining >= seg_len {
            partial.push(b);
            remaining -= seg_len;
            if remaining <= 0.0 {
                break;
            }
        } else {
            let r = if seg_len == 0.0 { 0.0 } else { remaining / seg_len };
            partial.push(a.lerp(b, r));
            break;
        }
    }
    partial
}

/// Point at fraction `t` of the arc length of `poly`, clamped to the path.
///
/// `t >= 1` yields the last vertex exactly. An empty slice yields the origin.
pub fn point_at(poly: &[Point], t: f64) -> Point {
    let Some(&last) = poly.last() else {
        return Point::default();
    };
    let t = clamp_fraction(t);
    if t >= 1.0 {
        return last;
    }
    point_at_length(poly, polyline_total_length(poly) * t)
}

/// Point at absolute arc length `target` from `poly[0]`; past the end this is
/// the last vertex.
pub fn point_at_length(poly: &[Point], target: f64) -> Point {
    let Some(&last) = poly.last() else {
        return Point::default();
    };
    let mut remaining = target.max(0.0);
    for pair in poly.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let seg_len = segment_length(a, b);
        if remaining > seg_len {
            remaining -= seg_len;
            continue;
        }
        let r = if seg_len == 0.0 { 0.0 } else { remaining / seg_len };
        return a.lerp(b, r);
    }
    last
}
