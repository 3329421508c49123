//! Sampling constants and default shape parameter bundles

use std::f64::consts::PI;

/// Samples per curve span and per arc.
pub const FITTING_COUNT: usize = 100;
/// Below this bisector-normal length a vertex counts as collinear.
pub const ZERO_TOLERANCE: f64 = 0.0001;
/// Offset (degrees) used to split coincident anchors while previewing.
pub const PREVIEW_EPSILON: f64 = 1e-7;
/// Parameter step of the general Bezier sampler.
pub const BEZIER_STEP: f64 = 0.01;
/// Parameter step of the quadratic B-spline sampler.
pub const SPLINE_STEP: f64 = 0.05;

/// Tension of the smoothed curve line and the closed curve area.
pub const CURVE_TENSION: f64 = 0.3;
/// Tension of the gathering-place area.
pub const GATHERING_TENSION: f64 = 0.4;

/// Ratios for the two heads of a pincer arrow, relative to each head's
/// spine length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleArrowParams {
    pub head_height_factor: f64,
    pub head_width_factor: f64,
    pub neck_height_factor: f64,
    pub neck_width_factor: f64,
}

impl DoubleArrowParams {
    pub const DEFAULT: Self = Self {
        head_height_factor: 0.25,
        head_width_factor: 0.3,
        neck_height_factor: 0.85,
        neck_width_factor: 0.15,
    };
}

impl Default for DoubleArrowParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Two-anchor straight arrows: widths are fractions of the base length,
/// angles are measured off the shaft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FineArrowParams {
    pub tail_width_factor: f64,
    pub neck_width_factor: f64,
    pub head_width_factor: f64,
    pub head_angle: f64,
    pub neck_angle: f64,
}

impl FineArrowParams {
    pub const FINE: Self = Self {
        tail_width_factor: 0.15,
        neck_width_factor: 0.2,
        head_width_factor: 0.25,
        head_angle: PI / 8.5,
        neck_angle: PI / 13.0,
    };

    pub const ASSAULT: Self = Self {
        tail_width_factor: 0.2,
        neck_width_factor: 0.25,
        head_width_factor: 0.3,
        head_angle: PI / 4.0,
        neck_angle: PI * 0.17741,
    };
}

impl Default for FineArrowParams {
    fn default() -> Self {
        Self::FINE
    }
}

/// Attack and squad-combat arrows.
///
/// `head_tail_factor` caps the head height at that fraction of the tail width.
/// `swallow_tail_factor` scales the notch depth of the tailed variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackArrowParams {
    pub head_height_factor: f64,
    pub head_width_factor: f64,
    pub neck_height_factor: f64,
    pub neck_width_factor: f64,
    pub head_tail_factor: f64,
    pub tail_width_factor: f64,
    pub swallow_tail_factor: f64,
}

impl AttackArrowParams {
    pub const DEFAULT: Self = Self {
        head_height_factor: 0.18,
        head_width_factor: 0.3,
        neck_height_factor: 0.85,
        neck_width_factor: 0.15,
        head_tail_factor: 0.8,
        tail_width_factor: 0.1,
        swallow_tail_factor: 1.0,
    };
}

impl Default for AttackArrowParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}
