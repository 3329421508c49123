//! Planar geometry primitives over (longitude, latitude) pairs.
//!
//! Everything here is a pure function. Degenerate input (coincident points,
//! zero-length segments) is not rejected: NaN and infinity propagate to the
//! caller, which decides how to guard. Distances are Euclidean in degree
//! space, so shapes far from the equator are stretched east-west.

use std::f64::consts::{PI, TAU};

use glam::dvec2;

use super::defaults::FITTING_COUNT;
use crate::types::Point2D;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point2D, b: Point2D) -> f64 {
    a.distance(b)
}

/// Sum of the segment lengths along `points`.
pub fn whole_distance(points: &[Point2D]) -> f64 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// Reference length that arrow widths are proportional to.
pub fn base_length(points: &[Point2D]) -> f64 {
    whole_distance(points).powf(0.99)
}

#[inline]
pub fn mid(a: Point2D, b: Point2D) -> Point2D {
    dvec2((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Direction angle used by every shape construction.
///
/// This is not a compass bearing. The result is the polar angle (counter
/// clockwise from +x) of the vector pointing from `end` back to `start`,
/// reported in `(0, 2PI]`: a segment heading north yields `3PI/2`, east `PI`,
/// south `PI/2` and west `2PI`. [`third_point`] relies on exactly this
/// convention, so it must not be "fixed" in isolation.
pub fn azimuth(start: Point2D, end: Point2D) -> f64 {
    let angle = ((end.y - start.y).abs() / distance(start, end)).asin();
    if end.y >= start.y && end.x >= start.x {
        angle + PI
    } else if end.y >= start.y && end.x < start.x {
        TAU - angle
    } else if end.y < start.y && end.x < start.x {
        angle
    } else if end.y < start.y && end.x >= start.x {
        PI - angle
    } else {
        // Only reachable with NaN coordinates.
        0.0
    }
}

/// Angle at `b` swept from `b->a` to `b->c`, in `[0, 2PI)`.
pub fn angle_of_three_points(a: Point2D, b: Point2D, c: Point2D) -> f64 {
    let angle = azimuth(b, a) - azimuth(b, c);
    if angle < 0.0 { angle + TAU } else { angle }
}

/// Orientation test for the triangle `p1, p2, p3`.
///
/// In a y-up frame this is true when the points turn counter-clockwise; the
/// name follows the screen (y-down) reading every construction was tuned with.
pub fn is_clockwise(p1: Point2D, p2: Point2D, p3: Point2D) -> bool {
    (p3.y - p1.y) * (p2.x - p1.x) > (p2.y - p1.y) * (p3.x - p1.x)
}

/// Linear interpolation from `start` (t = 0) to `end` (t = 1).
pub fn point_on_line(t: f64, start: Point2D, end: Point2D) -> Point2D {
    dvec2(start.x + t * (end.x - start.x), start.y + t * (end.y - start.y))
}

/// Cubic Bezier through `start`, two control points and `end`; `t` is
/// clamped to `[0, 1]`.
pub fn cubic_value(t: f64, start: Point2D, c1: Point2D, c2: Point2D, end: Point2D) -> Point2D {
    let t = t.clamp(0.0, 1.0);
    let tp = 1.0 - t;
    let t2 = t * t;
    let t3 = t2 * t;
    let tp2 = tp * tp;
    let tp3 = tp2 * tp;
    let x = tp3 * start.x + 3.0 * tp2 * t * c1.x + 3.0 * tp * t2 * c2.x + t3 * end.x;
    let y = tp3 * start.y + 3.0 * tp2 * t * c1.y + 3.0 * tp * t2 * c2.y + t3 * end.y;
    dvec2(x, y)
}

/// Point at `distance` from `end`, rotated `angle` off the `start -> end`
/// reference direction (see [`azimuth`]).
pub fn third_point(
    start: Point2D,
    end: Point2D,
    angle: f64,
    distance: f64,
    clockwise: bool,
) -> Point2D {
    let azimuth = azimuth(start, end);
    let alpha = if clockwise {
        azimuth + angle
    } else {
        azimuth - angle
    };
    dvec2(end.x + distance * alpha.cos(), end.y + distance * alpha.sin())
}

/// Intersection of line AB with line CD.
///
/// Horizontal AB or CD are solved directly; parallel lines yield NaN or
/// infinity.
pub fn intersect_point(a: Point2D, b: Point2D, c: Point2D, d: Point2D) -> Point2D {
    if a.y == b.y {
        let f = (d.x - c.x) / (d.y - c.y);
        let x = f * (a.y - c.y) + c.x;
        return dvec2(x, a.y);
    }
    if c.y == d.y {
        let e = (b.x - a.x) / (b.y - a.y);
        let x = e * (c.y - a.y) + a.x;
        return dvec2(x, c.y);
    }
    let e = (b.x - a.x) / (b.y - a.y);
    let f = (d.x - c.x) / (d.y - c.y);
    let y = (e * a.y - a.x - f * c.y + c.x) / (e - f);
    let x = e * y - e * a.y + a.x;
    dvec2(x, y)
}

/// Center of the circle through three points (intersection of the
/// perpendicular bisectors of `p1p2` and `p1p3`).
pub fn circle_center_of_three_points(p1: Point2D, p2: Point2D, p3: Point2D) -> Point2D {
    let a = mid(p1, p2);
    let b = dvec2(a.x - p1.y + p2.y, a.y + p1.x - p2.x);
    let c = mid(p1, p3);
    let d = dvec2(c.x - p1.y + p3.y, c.y + p1.x - p3.x);
    intersect_point(a, b, c, d)
}

/// `FITTING_COUNT + 1` points on the circle around `center`, from
/// `start_angle` sweeping in the positive direction to `end_angle`.
///
/// A negative sweep wraps by a full turn. Equal angles give a zero sweep,
/// i.e. the same point repeated.
pub fn arc_points(center: Point2D, radius: f64, start_angle: f64, end_angle: f64) -> Vec<Point2D> {
    let mut diff = end_angle - start_angle;
    if diff < 0.0 {
        diff += TAU;
    }
    (0..=FITTING_COUNT)
        .map(|i| {
            let angle = start_angle + (diff * i as f64) / FITTING_COUNT as f64;
            dvec2(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn approx(a: Point2D, b: Point2D) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn azimuth_canonical_directions() {
        let o = dvec2(0.0, 0.0);
        assert_eq!(azimuth(o, dvec2(0.0, 1.0)), 3.0 * FRAC_PI_2);
        assert_eq!(azimuth(o, dvec2(1.0, 0.0)), PI);
        assert_eq!(azimuth(o, dvec2(0.0, -1.0)), FRAC_PI_2);
        assert_eq!(azimuth(o, dvec2(-1.0, 0.0)), TAU);
    }

    #[test]
    fn azimuth_points_back_to_start() {
        let start = dvec2(2.0, 1.0);
        let end = dvec2(5.0, 5.0);
        let a = azimuth(start, end);
        let back = end + dvec2(a.cos(), a.sin()) * distance(start, end);
        assert!(approx(back, start));
    }

    #[test]
    fn clockwise_flips_with_order() {
        let triples = [
            (dvec2(0.0, 0.0), dvec2(1.0, 0.0), dvec2(0.0, 1.0)),
            (dvec2(3.0, -1.0), dvec2(-2.0, 4.0), dvec2(7.5, 2.0)),
            (dvec2(116.3, 39.9), dvec2(116.4, 39.95), dvec2(116.35, 40.0)),
        ];
        for (a, b, c) in triples {
            assert_eq!(is_clockwise(a, b, c), !is_clockwise(a, c, b));
        }
    }

    #[test]
    fn circle_center_recovers_known_center() {
        let center = dvec2(3.0, -2.0);
        let r = 5.0;
        let on = |deg: f64| {
            let a = deg.to_radians();
            center + dvec2(a.cos(), a.sin()) * r
        };
        let found = circle_center_of_three_points(on(10.0), on(130.0), on(250.0));
        assert!((found - center).length() < 1e-9, "{found:?}");
    }

    #[test]
    fn circle_center_with_horizontal_chord() {
        let found = circle_center_of_three_points(
            dvec2(-1.0, 0.0),
            dvec2(1.0, 0.0),
            dvec2(0.0, 1.0),
        );
        assert!(approx(found, dvec2(0.0, 0.0)), "{found:?}");
    }

    #[test]
    fn arc_points_zero_sweep_repeats_one_point() {
        let pts = arc_points(dvec2(1.0, 1.0), 2.0, 0.7, 0.7);
        assert_eq!(pts.len(), FITTING_COUNT + 1);
        assert!(pts.iter().all(|p| *p == pts[0]));
    }

    #[test]
    fn arc_points_wraps_negative_sweep() {
        let pts = arc_points(dvec2(0.0, 0.0), 1.0, PI, FRAC_PI_2);
        // Sweeps 3PI/2 counter-clockwise: through 3PI/2 (south) and 0 (east).
        assert!(approx(pts[0], dvec2(-1.0, 0.0)));
        assert!(approx(pts[FITTING_COUNT], dvec2(0.0, 1.0)));
        assert!(pts.iter().any(|p| p.y < -0.99));
    }

    #[test]
    fn third_point_perpendicular() {
        let p = third_point(dvec2(0.0, 0.0), dvec2(1.0, 0.0), FRAC_PI_2, 2.0, false);
        assert!(approx(p, dvec2(1.0, 2.0)), "{p:?}");
        let q = third_point(dvec2(0.0, 0.0), dvec2(1.0, 0.0), FRAC_PI_2, 2.0, true);
        assert!(approx(q, dvec2(1.0, -2.0)), "{q:?}");
    }

    #[test]
    fn angle_of_three_points_right_angle() {
        let a = angle_of_three_points(dvec2(1.0, 0.0), dvec2(0.0, 0.0), dvec2(0.0, 1.0));
        assert!((a - 3.0 * FRAC_PI_2).abs() < EPS || (a - FRAC_PI_2).abs() < EPS);
        assert!((0.0..TAU).contains(&a));
    }

    #[test]
    fn cubic_value_clamps_and_hits_endpoints() {
        let (s, c1, c2, e) = (dvec2(0.0, 0.0), dvec2(1.0, 2.0), dvec2(3.0, 2.0), dvec2(4.0, 0.0));
        assert_eq!(cubic_value(0.0, s, c1, c2, e), s);
        assert_eq!(cubic_value(1.0, s, c1, c2, e), e);
        assert_eq!(cubic_value(-3.0, s, c1, c2, e), s);
        assert_eq!(cubic_value(7.0, s, c1, c2, e), e);
    }

    #[test]
    fn base_length_of_polyline() {
        let pts = [dvec2(0.0, 0.0), dvec2(3.0, 4.0), dvec2(3.0, 10.0)];
        assert_eq!(whole_distance(&pts), 11.0);
        assert_eq!(base_length(&pts), 11.0_f64.powf(0.99));
        assert_eq!(whole_distance(&pts[..1]), 0.0);
    }
}
