//! Area builders: closed outlines.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::dvec2;

use super::curve::bisector_normals;
use super::defaults::FITTING_COUNT;
use super::geometry::{
    arc_points, azimuth, circle_center_of_three_points, cubic_value, distance, is_clockwise, mid,
    third_point,
};
use crate::types::Point2D;

/// Third anchor for a two-anchor arc: a quarter turn off the first segment
/// at its midpoint, half the segment length away.
pub(crate) fn synthesize_arc_third(p1: Point2D, p2: Point2D) -> Point2D {
    let m = mid(p1, p2);
    third_point(p1, m, FRAC_PI_2, distance(p1, m), false)
}

/// Circle around `center` through `rim`, sampled at `FITTING_COUNT + 1`
/// points (the last one closes onto the first).
pub fn circle(center: Point2D, rim: Point2D) -> Vec<Point2D> {
    arc_points(center, distance(center, rim), 0.0, TAU)
}

/// Counter-clockwise rotation (from +x) of the ellipse whose major axis
/// runs from `center` to `rim`.
pub fn ellipse_rotation(center: Point2D, rim: Point2D) -> f64 {
    let dx = rim.x - center.x;
    let dy = rim.y - center.y;
    let angle = dy.abs().atan2(dx.abs());
    if (dx >= 0.0) == (dy >= 0.0) {
        angle
    } else {
        TAU - angle
    }
}

/// Ellipse centered on `center` with semi-major axis reaching `rim` and a
/// semi-minor axis of half that length.
pub fn ellipse(center: Point2D, rim: Point2D) -> Vec<Point2D> {
    let a = distance(center, rim);
    let b = a / 2.0;
    let rotation = ellipse_rotation(center, rim);
    let (sin_r, cos_r) = rotation.sin_cos();
    (0..=FITTING_COUNT)
        .map(|i| {
            let theta = TAU * i as f64 / FITTING_COUNT as f64;
            let lx = a * theta.cos();
            let ly = b * theta.sin();
            dvec2(
                center.x + lx * cos_r - ly * sin_r,
                center.y + lx * sin_r + ly * cos_r,
            )
        })
        .collect()
}

/// Axis-aligned rectangle spanned by two opposite corners.
pub fn rectangle(a: Point2D, b: Point2D) -> Vec<Point2D> {
    let (xmin, xmax) = (a.x.min(b.x), a.x.max(b.x));
    let (ymin, ymax) = (a.y.min(b.y), a.y.max(b.y));
    vec![
        dvec2(xmin, ymin),
        dvec2(xmax, ymin),
        dvec2(xmax, ymax),
        dvec2(xmin, ymax),
    ]
}

/// Arc from the first to the second anchor through the third. The outline
/// is the arc itself; closing it yields the lune (crescent) area.
///
/// Two anchors, or a third anchor still sitting on the second, get a
/// synthesized third point.
pub fn lune(points: &[Point2D]) -> Vec<Point2D> {
    let (p1, p2) = (points[0], points[1]);
    let p3 = if needs_synthetic_third(points) {
        synthesize_arc_third(p1, p2)
    } else {
        points[2]
    };
    arc_through_three(p1, p2, p3)
}

/// True for two anchors, or when the third duplicates the second.
pub(crate) fn needs_synthetic_third(points: &[Point2D]) -> bool {
    points.len() == 2 || points[1] == points[2]
}

pub(crate) fn arc_through_three(p1: Point2D, p2: Point2D, p3: Point2D) -> Vec<Point2D> {
    let center = circle_center_of_three_points(p1, p2, p3);
    let radius = distance(p1, center);
    let angle1 = azimuth(p1, center);
    let angle2 = azimuth(p2, center);
    let (start, end) = if is_clockwise(p1, p2, p3) {
        (angle2, angle1)
    } else {
        (angle1, angle2)
    };
    arc_points(center, radius, start, end)
}

/// Pie slice around the first anchor, from the second anchor's radius to the
/// third anchor's bearing. `FITTING_COUNT + 3` points: the arc, the center
/// and the arc's first point again.
pub fn sector(points: &[Point2D]) -> Vec<Point2D> {
    let (center, p2, p3) = (points[0], points[1], points[2]);
    let radius = distance(p2, center);
    let start = azimuth(p2, center);
    let end = azimuth(p3, center);
    let mut out = arc_points(center, radius, start, end);
    let first = out[0];
    out.push(center);
    out.push(first);
    out
}

/// Smooth closed ring through every anchor with tension `t`.
///
/// Each span emits its start anchor, `FITTING_COUNT + 1` cubic samples and
/// its end anchor; the ring's closing vertex is dropped.
pub(crate) fn closed_ring(t: f64, ring: &[Point2D]) -> Vec<Point2D> {
    let mut normals = Vec::with_capacity(ring.len() * 2);
    for w in ring.windows(3) {
        let (right, left) = bisector_normals(t, w[0], w[1], w[2]);
        normals.push(right);
        normals.push(left);
    }
    // The last control point belongs to the closing span.
    if let Some(last) = normals.pop() {
        normals.insert(0, last);
    }

    let spans = ring.len() - 2;
    let mut out = Vec::with_capacity(spans * (FITTING_COUNT + 3));
    for i in 0..spans {
        let (start, end) = (ring[i], ring[i + 1]);
        let (c1, c2) = (normals[i * 2], normals[i * 2 + 1]);
        out.push(start);
        for k in 0..=FITTING_COUNT {
            out.push(cubic_value(k as f64 / FITTING_COUNT as f64, start, c1, c2, end));
        }
        out.push(end);
    }
    out.pop();
    out
}

/// Closed smooth curve through all anchors (tension `t`).
///
/// Two anchors, or a third anchor still sitting on the second, first get a
/// synthesized extra point so the ring has some width.
pub fn closed_curve(t: f64, points: &[Point2D]) -> Vec<Point2D> {
    let mut ring = points.to_vec();
    if needs_synthetic_third(&ring) {
        ring.push(synthesize_arc_third(ring[0], ring[1]));
    }
    ring.push(ring[0]);
    ring.push(ring[1]);
    closed_ring(t, &ring)
}

/// Gathering-place (assembly area): a rounded teardrop on three anchors.
///
/// The midpoint of the first and third anchors is added as a control anchor.
/// With two anchors the third is synthesized off the segment midpoint.
pub fn gathering_place(t: f64, points: &[Point2D]) -> Vec<Point2D> {
    let mut ring = points.to_vec();
    if ring.len() == 2 {
        let m = mid(ring[0], ring[1]);
        let d = distance(ring[0], m) / 0.9;
        let synthesized = third_point(ring[0], m, FRAC_PI_2, d, true);
        ring = vec![ring[0], synthesized, ring[1]];
    }
    let m = mid(ring[0], ring[2]);
    ring.push(m);
    ring.push(ring[0]);
    ring.push(ring[1]);
    closed_ring(t, &ring)
}
