//! Line builders: open outlines.

use super::area::arc_through_three;
use super::curve::curve_points;
use crate::types::Point2D;

/// Circular arc from the first anchor to the second, bending through the
/// third.
pub fn arc(points: &[Point2D]) -> Vec<Point2D> {
    arc_through_three(points[0], points[1], points[2])
}

/// Smooth curve through every anchor with tension `t`; two anchors give the
/// straight segment between them.
pub fn curve(t: f64, points: &[Point2D]) -> Vec<Point2D> {
    curve_points(t, points)
}
