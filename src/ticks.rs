use crate::geometry::{polyline_total_length, Point};
use crate::sampler::point_at_length;

/// Tick anchor points along a gauge arc.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ticks {
    pub majors: Vec<Point>,
    pub minors: Vec<Point>,
}

/// Places `major_count` ticks at even arc-length spacing (never at either end)
/// and `minor_per_segment` evenly spaced ticks inside every segment.
///
/// Majors are spaced over the whole path, minors per segment, so the two sets
/// generally do not line up.
pub fn generate_ticks(poly: &[Point], major_count: usize, minor_per_segment: usize) -> Ticks {
    let total = polyline_total_length(poly);
    let step = total / (major_count as f64 + 1.0);
    let majors = (1..=major_count)
        .map(|k| point_at_length(poly, step * k as f64))
        .collect();

    let divisions = minor_per_segment as f64 + 1.0;
    let minors = poly
        .windows(2)
        .flat_map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            (1..=minor_per_segment).map(move |m| a.lerp(b, m as f64 / divisions))
        })
        .collect();

    Ticks { majors, minors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{segment_length, GaugeBox};
    use crate::shape::build_half_hex_polyline;
    use approx::assert_relative_eq;

    /// Arc length from `poly[0]` to `p`, assuming `p` lies on the path.
    fn arc_length_of(poly: &[Point], p: Point) -> f64 {
        let mut acc = 0.0;
        for pair in poly.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let seg = segment_length(a, b);
            let d = segment_length(a, p) + segment_length(p, b);
            if (d - seg).abs() < 1e-9 {
                return acc + segment_length(a, p);
            }
            acc += seg;
        }
        panic!("point {p:?} is not on the polyline");
    }

    fn main_gauge() -> Vec<Point> {
        build_half_hex_polyline(GaugeBox::new(Point::new(32.0, 36.0), 160.0, 150.0), true, true)
    }

    #[test]
    fn majors_are_evenly_spaced_and_interior() {
        let poly = main_gauge();
        let total = polyline_total_length(&poly);
        for n in [1usize, 2, 5, 6, 11] {
            let ticks = generate_ticks(&poly, n, 0);
            assert_eq!(ticks.majors.len(), n);
            assert!(ticks.minors.is_empty());

            let offsets: Vec<f64> = ticks.majors.iter().map(|p| arc_length_of(&poly, *p)).collect();
            for s in &offsets {
                assert!(*s > 0.0 && *s < total);
            }
            let step = total / (n as f64 + 1.0);
            assert_relative_eq!(offsets[0], step, epsilon = 1e-9);
            for w in offsets.windows(2) {
                assert_relative_eq!(w[1] - w[0], step, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn minors_are_per_segment() {
        let poly = vec![
            Point::new(0.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(30.0, 90.0),
        ];
        let ticks = generate_ticks(&poly, 0, 2);
        assert!(ticks.majors.is_empty());
        assert_eq!(
            ticks.minors,
            vec![
                Point::new(10.0, 0.0),
                Point::new(20.0, 0.0),
                Point::new(30.0, 30.0),
                Point::new(30.0, 60.0),
            ]
        );
    }

    #[test]
    fn single_minor_sits_at_segment_midpoint() {
        let poly = main_gauge();
        let ticks = generate_ticks(&poly, 6, 1);
        assert_eq!(ticks.minors.len(), 2);
        assert_relative_eq!(ticks.minors[0].x, (poly[0].x + poly[1].x) / 2.0);
        assert_relative_eq!(ticks.minors[1].y, (poly[1].y + poly[2].y) / 2.0);
    }

    #[test]
    fn degenerate_path_still_yields_requested_count() {
        let p = Point::new(5.0, 5.0);
        let ticks = generate_ticks(&[p], 3, 4);
        assert_eq!(ticks.majors, vec![p, p, p]);
        assert!(ticks.minors.is_empty());
    }
}
