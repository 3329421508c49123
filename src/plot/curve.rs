//! Curve fitting: bisector-normal cubic chains, n-degree Bezier and the
//! quadratic uniform B-spline.
//!
//! The two parametric samplers step `t` by accumulating a floating-point
//! increment (`t += step` while `t <= 1`), which fixes their exact sample
//! count. Outlines are compared vertex-for-vertex against reference output,
//! so the loops stay in that form.

use glam::dvec2;

use super::defaults::{BEZIER_STEP, FITTING_COUNT, SPLINE_STEP, ZERO_TOLERANCE};
use super::geometry::{cubic_value, distance, is_clockwise, mid};
use crate::types::Point2D;

/// Sum of the unit vectors from `p2` towards `p1` and towards `p3`.
pub fn normal(p1: Point2D, p2: Point2D, p3: Point2D) -> Point2D {
    let mut d1 = dvec2(p1.x - p2.x, p1.y - p2.y);
    let len1 = (d1.x * d1.x + d1.y * d1.y).sqrt();
    d1 /= len1;
    let mut d2 = dvec2(p3.x - p2.x, p3.y - p2.y);
    let len2 = (d2.x * d2.x + d2.y * d2.y).sqrt();
    d2 /= len2;
    d1 + d2
}

/// Control points on either side of `p2`, returned as `(right, left)`.
///
/// They sit on the perpendicular of the bisector at `p2`, at `t` times the
/// adjoining segment length. Collinear vertices fall back to points on the
/// segments themselves.
pub fn bisector_normals(t: f64, p1: Point2D, p2: Point2D, p3: Point2D) -> (Point2D, Point2D) {
    let n = normal(p1, p2, p3);
    let dist = (n.x * n.x + n.y * n.y).sqrt();
    let ux = n.x / dist;
    let uy = n.y / dist;
    let d1 = distance(p1, p2);
    let d2 = distance(p2, p3);

    if dist > ZERO_TOLERANCE {
        if is_clockwise(p1, p2, p3) {
            let right = dvec2(p2.x - t * d1 * uy, p2.y + t * d1 * ux);
            let left = dvec2(p2.x + t * d2 * uy, p2.y - t * d2 * ux);
            (right, left)
        } else {
            let right = dvec2(p2.x + t * d1 * uy, p2.y - t * d1 * ux);
            let left = dvec2(p2.x - t * d2 * uy, p2.y + t * d2 * ux);
            (right, left)
        }
    } else {
        let right = dvec2(p2.x + t * (p1.x - p2.x), p2.y + t * (p1.y - p2.y));
        let left = dvec2(p2.x + t * (p3.x - p2.x), p2.y + t * (p3.y - p2.y));
        (right, left)
    }
}

/// Reflect `target` across the line through `mid` perpendicular to
/// `edge = from - mid`.
fn reflect_across(mid: Point2D, edge: Point2D, seg_len: f64, target: Point2D) -> Point2D {
    let n = 2.0 / seg_len;
    let nx = -n * edge.y;
    let ny = n * edge.x;
    let a11 = nx * nx - ny * ny;
    let a12 = 2.0 * nx * ny;
    let a22 = ny * ny - nx * nx;
    let dx = target.x - mid.x;
    let dy = target.y - mid.y;
    dvec2(mid.x + a11 * dx + a12 * dy, mid.y + a12 * dx + a22 * dy)
}

/// Control point for the first span of a chain: the vertex-side control of
/// `points[1]` mirrored across the first segment's midpoint normal.
///
/// `points` needs at least three entries.
pub fn left_most_control_point(t: f64, points: &[Point2D]) -> Point2D {
    let (p1, p2, p3) = (points[0], points[1], points[2]);
    let (normal_right, _) = bisector_normals(0.0, p1, p2, p3);
    let n = normal(p1, p2, p3);
    let dist = (n.x * n.x + n.y * n.y).sqrt();
    if dist > ZERO_TOLERANCE {
        let m = mid(p1, p2);
        let edge = dvec2(p1.x - m.x, p1.y - m.y);
        reflect_across(m, edge, distance(p1, p2), normal_right)
    } else {
        dvec2(p1.x + t * (p2.x - p1.x), p1.y + t * (p2.y - p1.y))
    }
}

/// Mirror of [`left_most_control_point`] for the last span.
pub fn right_most_control_point(t: f64, points: &[Point2D]) -> Point2D {
    let count = points.len();
    let (p1, p2, p3) = (points[count - 3], points[count - 2], points[count - 1]);
    let (_, normal_left) = bisector_normals(0.0, p1, p2, p3);
    let n = normal(p1, p2, p3);
    let dist = (n.x * n.x + n.y * n.y).sqrt();
    if dist > ZERO_TOLERANCE {
        let m = mid(p2, p3);
        let edge = dvec2(p3.x - m.x, p3.y - m.y);
        reflect_across(m, edge, distance(p2, p3), normal_left)
    } else {
        dvec2(p3.x + t * (p2.x - p3.x), p3.y + t * (p2.y - p3.y))
    }
}

/// Smooth open curve through every anchor.
///
/// Each span emits its start anchor, `FITTING_COUNT` cubic samples and its
/// end anchor. Fewer than three anchors are returned unchanged.
pub fn curve_points(t: f64, points: &[Point2D]) -> Vec<Point2D> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut normals = vec![left_most_control_point(t, points)];
    for w in points.windows(3) {
        let (right, left) = bisector_normals(t, w[0], w[1], w[2]);
        normals.push(right);
        normals.push(left);
    }
    normals.push(right_most_control_point(t, points));

    let mut out = Vec::with_capacity((points.len() - 1) * (FITTING_COUNT + 2));
    for (i, w) in points.windows(2).enumerate() {
        let (start, end) = (w[0], w[1]);
        let (c1, c2) = (normals[i * 2], normals[i * 2 + 1]);
        out.push(start);
        for k in 0..FITTING_COUNT {
            out.push(cubic_value(k as f64 / FITTING_COUNT as f64, start, c1, c2, end));
        }
        out.push(end);
    }
    out
}

/// `n!` as a float.
pub fn factorial(n: usize) -> f64 {
    match n {
        0 | 1 => 1.0,
        2 => 2.0,
        3 => 6.0,
        4 => 24.0,
        5 => 120.0,
        _ => (1..=n).fold(1.0, |acc, i| acc * i as f64),
    }
}

/// Binomial coefficient `n choose i`.
pub fn binomial_factor(n: usize, i: usize) -> f64 {
    factorial(n) / (factorial(i) * factorial(n - i))
}

/// Bezier curve of degree `points.len() - 1` using `points` as control
/// polygon. Two or fewer points are returned unchanged.
pub fn bezier_points(points: &[Point2D]) -> Vec<Point2D> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let n = points.len() - 1;
    let mut out = Vec::new();
    let mut t = 0.0_f64;
    while t <= 1.0 {
        let mut x = 0.0;
        let mut y = 0.0;
        for (index, p) in points.iter().enumerate() {
            let factor = binomial_factor(n, index);
            let a = t.powf(index as f64);
            let b = (1.0 - t).powf((n - index) as f64);
            x += factor * a * b * p.x;
            y += factor * a * b * p.y;
        }
        out.push(dvec2(x, y));
        t += BEZIER_STEP;
    }
    out.push(points[n]);
    out
}

/// Quadratic uniform B-spline basis function `k` (0, 1 or 2) at `t`.
pub fn quadric_bspline_factor(k: usize, t: f64) -> f64 {
    match k {
        0 => (t - 1.0).powi(2) / 2.0,
        1 => (-2.0 * t.powi(2) + 2.0 * t + 1.0) / 2.0,
        2 => t.powi(2) / 2.0,
        _ => 0.0,
    }
}

/// Quadratic uniform B-spline over every window of three control points,
/// framed by the first and last control point. Two or fewer points are
/// returned unchanged.
pub fn qb_spline_points(points: &[Point2D]) -> Vec<Point2D> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut out = vec![points[0]];
    for w in points.windows(3) {
        let mut t = 0.0_f64;
        while t <= 1.0 {
            let mut x = 0.0;
            let mut y = 0.0;
            for (k, p) in w.iter().enumerate() {
                let factor = quadric_bspline_factor(k, t);
                x += factor * p.x;
                y += factor * p.y;
            }
            out.push(dvec2(x, y));
            t += SPLINE_STEP;
        }
    }
    out.push(points[points.len() - 1]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_starts_and_ends_on_anchors() {
        let pts = [dvec2(0.0, 0.0), dvec2(1.0, 1.0), dvec2(2.0, 0.0)];
        let curve = curve_points(0.3, &pts);
        assert_eq!(curve.first(), Some(&pts[0]));
        assert_eq!(curve.last(), Some(&pts[2]));
        assert_eq!(curve.len(), 2 * (FITTING_COUNT + 2));
        assert!(curve.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn curve_with_two_points_is_a_line() {
        let pts = [dvec2(0.0, 0.0), dvec2(1.0, 1.0)];
        assert_eq!(curve_points(0.3, &pts), pts.to_vec());
    }

    #[test]
    fn collinear_bisector_falls_back_to_segments() {
        let (right, left) =
            bisector_normals(0.25, dvec2(0.0, 0.0), dvec2(1.0, 0.0), dvec2(2.0, 0.0));
        assert_eq!(right, dvec2(0.75, 0.0));
        assert_eq!(left, dvec2(1.25, 0.0));
    }

    #[test]
    fn bisector_normals_are_symmetric_about_vertex() {
        let (right, left) =
            bisector_normals(0.3, dvec2(-1.0, 0.0), dvec2(0.0, 1.0), dvec2(1.0, 0.0));
        assert!((right.y - 1.0).abs() < 1e-12);
        assert!((left.y - 1.0).abs() < 1e-12);
        assert!((right.x + left.x).abs() < 1e-12);
        assert!(right.x != left.x);
    }

    #[test]
    fn bezier_short_inputs_pass_through() {
        let p = [dvec2(4.0, 2.0)];
        assert_eq!(bezier_points(&p), p.to_vec());
        let pq = [dvec2(0.0, 0.0), dvec2(1.0, 0.0)];
        assert_eq!(bezier_points(&pq), pq.to_vec());
    }

    #[test]
    fn bezier_endpoints() {
        let pts = [dvec2(0.0, 0.0), dvec2(1.0, 2.0), dvec2(2.0, 0.0)];
        let curve = bezier_points(&pts);
        assert_eq!(curve[0], pts[0]);
        assert_eq!(*curve.last().unwrap(), pts[2]);
        let peak = curve.iter().map(|p| p.y).fold(f64::MIN, f64::max);
        assert!(peak <= 1.0 + 1e-12 && peak > 0.99);
    }

    #[test]
    fn qb_spline_short_inputs_pass_through() {
        let pq = [dvec2(0.0, 0.0), dvec2(1.0, 0.0)];
        assert_eq!(qb_spline_points(&pq), pq.to_vec());
    }

    #[test]
    fn qb_spline_is_framed_by_endpoints() {
        let pts = [dvec2(0.0, 0.0), dvec2(1.0, 1.0), dvec2(2.0, 0.0), dvec2(3.0, 1.0)];
        let spline = qb_spline_points(&pts);
        assert_eq!(spline[0], pts[0]);
        assert_eq!(*spline.last().unwrap(), pts[3]);
        // The first sample of the first window is the midpoint of p0 and p1.
        assert_eq!(spline[1], dvec2(0.5, 0.5));
    }

    #[test]
    fn binomial_row() {
        let row: Vec<f64> = (0..=6).map(|i| binomial_factor(6, i)).collect();
        assert_eq!(row, vec![1.0, 6.0, 15.0, 20.0, 15.0, 6.0, 1.0]);
        assert_eq!(factorial(7), 5040.0);
    }
}
