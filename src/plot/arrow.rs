//! Arrow builders.
//!
//! Every arrow is assembled from the same cross-sections: a tail edge, a
//! body whose two flanks taper from the tail width down to the neck width,
//! and a five-point head (neck left, head left, tip, head right, neck right).
//! Flanks are offset from the spine with [`third_point`], then smoothed.

use std::f64::consts::{FRAC_PI_2, PI};

use super::area::{needs_synthetic_third, synthesize_arc_third};
use super::curve::{bezier_points, qb_spline_points};
use super::defaults::{AttackArrowParams, DoubleArrowParams, FineArrowParams};
use super::geometry::{
    angle_of_three_points, base_length, distance, is_clockwise, mid, third_point, whole_distance,
};
use crate::types::Point2D;

/// The five head vertices of an arrow plus the head height they were built
/// with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowHead {
    pub neck_left: Point2D,
    pub head_left: Point2D,
    pub tip: Point2D,
    pub head_right: Point2D,
    pub neck_right: Point2D,
    pub head_height: f64,
}

impl ArrowHead {
    /// Vertices in outline order.
    pub fn points(&self) -> [Point2D; 5] {
        [
            self.neck_left,
            self.head_left,
            self.tip,
            self.head_right,
            self.neck_right,
        ]
    }

    /// Head at the end of `spine`, pointing along its last segment.
    fn on_spine(
        spine: &[Point2D],
        head_height: f64,
        head_width: f64,
        neck_height: f64,
        neck_width: f64,
    ) -> Self {
        let tip = spine[spine.len() - 1];
        let before = spine[spine.len() - 2];
        let head_end = third_point(before, tip, 0.0, head_height, true);
        let neck_end = third_point(before, tip, 0.0, neck_height, true);
        Self {
            neck_left: third_point(tip, neck_end, FRAC_PI_2, neck_width, false),
            head_left: third_point(tip, head_end, FRAC_PI_2, head_width, false),
            tip,
            head_right: third_point(tip, head_end, FRAC_PI_2, head_width, true),
            neck_right: third_point(tip, neck_end, FRAC_PI_2, neck_width, true),
            head_height,
        }
    }
}

// ============================================================================
// Shared body construction
// ============================================================================

/// Left and right flank points for every interior vertex of `spine`.
///
/// The half-width starts at `tail_width_factor * base_length / 2` and shrinks
/// linearly with arc length towards the neck width, divided by the sine of
/// the half turn angle so the flanks stay parallel through bends.
pub fn arrow_body_points(
    spine: &[Point2D],
    neck_left: Point2D,
    neck_right: Point2D,
    tail_width_factor: f64,
) -> (Vec<Point2D>, Vec<Point2D>) {
    let all_len = whole_distance(spine);
    let len = base_length(spine);
    let tail_width = len * tail_width_factor;
    let neck_width = distance(neck_left, neck_right);
    let width_dif = (tail_width - neck_width) / 2.0;

    let mut temp_len = 0.0;
    let mut lefts = Vec::with_capacity(spine.len().saturating_sub(2));
    let mut rights = Vec::with_capacity(spine.len().saturating_sub(2));
    for w in spine.windows(3) {
        let angle = angle_of_three_points(w[0], w[1], w[2]) / 2.0;
        temp_len += distance(w[0], w[1]);
        let half = (tail_width / 2.0 - (temp_len / all_len) * width_dif) / angle.sin();
        lefts.push(third_point(w[0], w[1], PI - angle, half, true));
        rights.push(third_point(w[0], w[1], angle, half, false));
    }
    (lefts, rights)
}

// ============================================================================
// Double (pincer) arrow
// ============================================================================

/// Mirror image of `point` across the perpendicular bisector of `p1p2`.
pub fn temp_point4(p1: Point2D, p2: Point2D, point: Point2D) -> Point2D {
    let mid_pnt = mid(p1, p2);
    let len = distance(mid_pnt, point);
    let angle = angle_of_three_points(p1, mid_pnt, point);

    let (d1, d2, first_cw, second_cw) = if angle < FRAC_PI_2 {
        (len * angle.sin(), len * angle.cos(), false, true)
    } else if angle < PI {
        (len * (PI - angle).sin(), len * (PI - angle).cos(), false, false)
    } else if angle < PI * 1.5 {
        (len * (angle - PI).sin(), len * (angle - PI).cos(), true, true)
    } else {
        (
            len * (PI * 2.0 - angle).sin(),
            len * (PI * 2.0 - angle).cos(),
            true,
            false,
        )
    };
    let foot = third_point(p1, mid_pnt, FRAC_PI_2, d1, first_cw);
    third_point(mid_pnt, foot, FRAC_PI_2, d2, second_cw)
}

/// Head of one pincer at the end of `spine`.
pub fn double_arrow_head(spine: &[Point2D], params: &DoubleArrowParams) -> ArrowHead {
    let head_height = base_length(spine) * params.head_height_factor;
    ArrowHead::on_spine(
        spine,
        head_height,
        head_height * params.head_width_factor,
        head_height * params.neck_height_factor,
        head_height * params.neck_width_factor,
    )
}

/// One pincer from the base edge `pnt1 pnt2` to `pnt3`, 13 points:
/// `pnt2`, two left flank points, the head, two right flank points, `pnt1`.
///
/// The spine bows to one side; `clockwise` picks which.
pub fn double_arrow_side(
    pnt1: Point2D,
    pnt2: Point2D,
    pnt3: Point2D,
    clockwise: bool,
    params: &DoubleArrowParams,
) -> Vec<Point2D> {
    let mid_pnt = mid(pnt1, pnt2);
    let len = distance(mid_pnt, pnt3);
    let bow1 = third_point(pnt3, mid_pnt, 0.0, len * 0.3, true);
    let bow2 = third_point(pnt3, mid_pnt, 0.0, len * 0.5, true);
    let bow1 = third_point(mid_pnt, bow1, FRAC_PI_2, len / 5.0, clockwise);
    let bow2 = third_point(mid_pnt, bow2, FRAC_PI_2, len / 4.0, clockwise);

    let spine = [mid_pnt, bow1, bow2, pnt3];
    let head = double_arrow_head(&spine, params);
    let tail_width_factor = distance(pnt1, pnt2) / base_length(&spine) / 2.0;
    let (lefts, rights) =
        arrow_body_points(&spine, head.neck_left, head.neck_right, tail_width_factor);

    let mut out = Vec::with_capacity(lefts.len() + rights.len() + 9);
    out.push(pnt2);
    out.extend_from_slice(&lefts);
    out.push(head.neck_left);
    out.extend_from_slice(&head.points());
    out.push(head.neck_right);
    out.extend(rights.iter().rev());
    out.push(pnt1);
    out
}

/// Pincer arrow on 2 to 5 anchors: the base edge (first two anchors), the
/// first head, the second head, and the join point of the two bodies.
///
/// A missing second head is mirrored from the first; a missing join point
/// defaults to the middle of the base edge. Two anchors, or a third anchor
/// sitting on the second, get a synthesized first head.
pub fn double_arrow(points: &[Point2D], params: &DoubleArrowParams) -> Vec<Point2D> {
    let (pnt1, pnt2) = (points[0], points[1]);
    let pnt3 = if needs_synthetic_third(points) {
        synthesize_arc_third(pnt1, pnt2)
    } else {
        points[2]
    };
    let temp_point = match points.get(3) {
        Some(p) => *p,
        None => temp_point4(pnt1, pnt2, pnt3),
    };
    let conn_point = match points.get(4) {
        Some(p) => *p,
        None => mid(pnt1, pnt2),
    };

    let (left, right) = if is_clockwise(pnt1, pnt2, pnt3) {
        (
            double_arrow_side(pnt1, conn_point, temp_point, false, params),
            double_arrow_side(conn_point, pnt2, pnt3, true, params),
        )
    } else {
        (
            double_arrow_side(pnt2, conn_point, pnt3, false, params),
            double_arrow_side(conn_point, pnt1, temp_point, true, params),
        )
    };

    let m = left.len();
    let t = (m - 5) / 2;
    let (ll_body, l_head, lr_body) = (&left[..t], &left[t..t + 5], &left[t + 5..]);
    let (rl_body, r_head, rr_body) = (&right[..t], &right[t..t + 5], &right[t + 5..]);

    let mut bridge = rr_body.to_vec();
    bridge.extend_from_slice(&ll_body[1..]);

    let mut out = bezier_points(rl_body);
    out.extend_from_slice(r_head);
    out.extend(bezier_points(&bridge));
    out.extend_from_slice(l_head);
    out.extend(bezier_points(lr_body));
    out
}

// ============================================================================
// Fine arrow / assault direction
// ============================================================================

/// Straight two-anchor arrow, 7 points: tail left, neck left, head left, tip,
/// head right, neck right, tail right.
pub fn fine_arrow(points: &[Point2D], params: &FineArrowParams) -> Vec<Point2D> {
    let (pnt1, pnt2) = (points[0], points[1]);
    let len = base_length(points);
    let tail_width = len * params.tail_width_factor;
    let neck_width = len * params.neck_width_factor;
    let head_width = len * params.head_width_factor;
    vec![
        third_point(pnt2, pnt1, FRAC_PI_2, tail_width, true),
        third_point(pnt1, pnt2, params.neck_angle, neck_width, false),
        third_point(pnt1, pnt2, params.head_angle, head_width, false),
        pnt2,
        third_point(pnt1, pnt2, params.head_angle, head_width, true),
        third_point(pnt1, pnt2, params.neck_angle, neck_width, true),
        third_point(pnt2, pnt1, FRAC_PI_2, tail_width, false),
    ]
}

// ============================================================================
// Attack arrow / squad combat
// ============================================================================

/// Head of an attack-style arrow.
///
/// The height starts at `head_height_factor * base_length`, is capped at
/// `head_tail_factor * tail width`, and after the head and neck widths are
/// taken from it, is capped again at the length of the last spine segment.
pub fn attack_arrow_head(
    spine: &[Point2D],
    tail_left: Point2D,
    tail_right: Point2D,
    params: &AttackArrowParams,
) -> ArrowHead {
    let mut head_height = base_length(spine) * params.head_height_factor;
    let last_len = distance(spine[spine.len() - 1], spine[spine.len() - 2]);
    let tail_width = distance(tail_left, tail_right);
    if head_height > tail_width * params.head_tail_factor {
        head_height = tail_width * params.head_tail_factor;
    }
    let head_width = head_height * params.head_width_factor;
    let neck_width = head_height * params.neck_width_factor;
    if head_height > last_len {
        head_height = last_len;
    }
    let neck_height = head_height * params.neck_height_factor;
    ArrowHead::on_spine(spine, head_height, head_width, neck_height, neck_width)
}

/// Flanks, head and closing order shared by attack and squad arrows.
fn assemble_tapered(
    spine: &[Point2D],
    tail_left: Point2D,
    tail_right: Point2D,
    tail_width_factor: f64,
    head: &ArrowHead,
) -> (Vec<Point2D>, Vec<Point2D>) {
    let (lefts, rights) =
        arrow_body_points(spine, head.neck_left, head.neck_right, tail_width_factor);

    let mut left = Vec::with_capacity(lefts.len() + 2);
    left.push(tail_left);
    left.extend(lefts);
    left.push(head.neck_left);

    let mut right = Vec::with_capacity(rights.len() + 2);
    right.push(tail_right);
    right.extend(rights);
    right.push(head.neck_right);

    let left = qb_spline_points(&left);
    let mut out = left.clone();
    out.extend_from_slice(&head.points());
    out.extend(qb_spline_points(&right).into_iter().rev());
    (out, left)
}

/// Attack arrow: the first two anchors are the tail edge, the rest the path
/// of the arrow. `tailed` adds a swallow-tail notch behind the tail edge.
pub fn attack_arrow(points: &[Point2D], params: &AttackArrowParams, tailed: bool) -> Vec<Point2D> {
    let (mut tail_left, mut tail_right) = (points[0], points[1]);
    if is_clockwise(points[0], points[1], points[2]) {
        std::mem::swap(&mut tail_left, &mut tail_right);
    }
    let mut spine = Vec::with_capacity(points.len() - 1);
    spine.push(mid(tail_left, tail_right));
    spine.extend_from_slice(&points[2..]);

    let head = attack_arrow_head(&spine, tail_left, tail_right, params);
    let all_len = base_length(&spine);
    let factor = distance(tail_left, tail_right) / all_len;
    let (mut out, left) = assemble_tapered(&spine, tail_left, tail_right, factor, &head);

    if tailed {
        let len = all_len * params.tail_width_factor * params.swallow_tail_factor;
        out.push(third_point(spine[1], spine[0], 0.0, len, true));
        out.push(left[0]);
    }
    out
}

/// Squad combat arrow: every anchor is on the path; the tail edge is
/// synthesized perpendicular to the first segment.
pub fn squad_combat(points: &[Point2D], params: &AttackArrowParams, tailed: bool) -> Vec<Point2D> {
    let tail_width = base_length(points) * params.tail_width_factor;
    let tail_left = third_point(points[1], points[0], FRAC_PI_2, tail_width, false);
    let tail_right = third_point(points[1], points[0], FRAC_PI_2, tail_width, true);

    let head = attack_arrow_head(points, tail_left, tail_right, params);
    let (mut out, left) = assemble_tapered(
        points,
        tail_left,
        tail_right,
        params.tail_width_factor,
        &head,
    );

    if tailed {
        let len = tail_width * params.swallow_tail_factor;
        out.push(third_point(points[1], points[0], 0.0, len, true));
        out.push(left[0]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    fn all_finite(points: &[Point2D]) -> bool {
        points.iter().all(|p| p.is_finite())
    }

    #[test]
    fn double_arrow_from_three_anchors() {
        let pts = [dvec2(0.0, 0.0), dvec2(0.0, 1.0), dvec2(1.0, 0.5)];
        let out = double_arrow(&pts, &DoubleArrowParams::DEFAULT);
        assert!(out.len() > 20, "only {} vertices", out.len());
        assert!(all_finite(&out));
    }

    #[test]
    fn double_arrow_with_explicit_second_head() {
        let pts = [
            dvec2(0.0, 0.0),
            dvec2(2.0, 0.0),
            dvec2(1.6, 2.0),
            dvec2(0.4, 2.0),
        ];
        let out = double_arrow(&pts, &DoubleArrowParams::DEFAULT);
        assert!(all_finite(&out));
        // Both tips appear verbatim in the outline.
        assert!(out.contains(&pts[2]));
        assert!(out.contains(&pts[3]));
    }

    #[test]
    fn double_arrow_from_two_anchors_is_finite() {
        let pts = [dvec2(116.0, 39.0), dvec2(116.2, 39.0)];
        let out = double_arrow(&pts, &DoubleArrowParams::DEFAULT);
        assert!(out.len() > 20);
        assert!(all_finite(&out));
    }

    #[test]
    fn double_arrow_side_layout() {
        let side = double_arrow_side(
            dvec2(0.0, 0.0),
            dvec2(1.0, 0.0),
            dvec2(0.5, 3.0),
            true,
            &DoubleArrowParams::DEFAULT,
        );
        assert_eq!(side.len(), 13);
        assert_eq!(side[0], dvec2(1.0, 0.0));
        assert_eq!(side[6], dvec2(0.5, 3.0));
        assert_eq!(side[12], dvec2(0.0, 0.0));
    }

    #[test]
    fn temp_point4_mirrors_across_bisector() {
        let mirrored = temp_point4(dvec2(0.0, 0.0), dvec2(2.0, 0.0), dvec2(0.5, 1.0));
        assert!((mirrored - dvec2(1.5, 1.0)).length() < 1e-9, "{mirrored:?}");
    }

    #[test]
    fn fine_arrow_shape() {
        let pts = [dvec2(0.0, 0.0), dvec2(0.0, 10.0)];
        let out = fine_arrow(&pts, &FineArrowParams::FINE);
        assert_eq!(out.len(), 7);
        assert_eq!(out[3], pts[1]);
        // Tail corners straddle the first anchor symmetrically.
        assert!((out[0].x + out[6].x).abs() < 1e-9);
        assert!((out[0].y - out[6].y).abs() < 1e-9);
        assert!(all_finite(&out));

        let assault = fine_arrow(&pts, &FineArrowParams::ASSAULT);
        assert!(distance(assault[0], assault[6]) > distance(out[0], out[6]));
    }

    #[test]
    fn attack_head_height_clamps_to_tail() {
        let tail_left = dvec2(-0.01, 0.0);
        let tail_right = dvec2(0.01, 0.0);
        let spine = [mid(tail_left, tail_right), dvec2(0.0, 5.0), dvec2(0.0, 10.0)];
        let params = AttackArrowParams::DEFAULT;
        let head = attack_arrow_head(&spine, tail_left, tail_right, &params);
        assert_eq!(
            head.head_height,
            distance(tail_left, tail_right) * params.head_tail_factor
        );
    }

    #[test]
    fn attack_head_height_clamps_to_last_segment() {
        let tail_left = dvec2(-5.0, 0.0);
        let tail_right = dvec2(5.0, 0.0);
        let spine = [dvec2(0.0, 0.0), dvec2(0.0, 10.0), dvec2(0.0, 10.5)];
        let head = attack_arrow_head(&spine, tail_left, tail_right, &AttackArrowParams::DEFAULT);
        assert_eq!(head.head_height, 0.5);
    }

    #[test]
    fn attack_arrow_outline() {
        let pts = [
            dvec2(0.0, 0.0),
            dvec2(1.0, 0.0),
            dvec2(0.6, 2.0),
            dvec2(1.2, 4.0),
        ];
        let params = AttackArrowParams::DEFAULT;
        let plain = attack_arrow(&pts, &params, false);
        let tailed = attack_arrow(&pts, &params, true);
        assert!(all_finite(&plain));
        assert!(all_finite(&tailed));
        assert_eq!(tailed.len(), plain.len() + 2);
        assert_eq!(tailed[tailed.len() - 1], tailed[0]);
        assert!(plain.contains(&pts[3]));
    }

    #[test]
    fn squad_combat_outline() {
        let pts = [dvec2(0.0, 0.0), dvec2(0.0, 3.0), dvec2(1.0, 5.0)];
        let params = AttackArrowParams::DEFAULT;
        let plain = squad_combat(&pts, &params, false);
        let tailed = squad_combat(&pts, &params, true);
        assert!(all_finite(&plain));
        assert_eq!(tailed.len(), plain.len() + 2);
        assert!(plain.contains(&pts[2]));
    }
}
