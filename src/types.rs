//! Value types shared by the geometry engine, the session and the hosts.
//!
//! Anchors and outline vertices are plain `glam::DVec2` values holding
//! (longitude, latitude) in degrees. All shape math is planar over those pairs.

use std::fmt;
use std::ops::Index;

use glam::DVec2;

/// A geographic coordinate (x = longitude, y = latitude), or a planar point.
pub type Point2D = DVec2;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero where a positive value is required
    Zero,
    /// Value is negative where a positive value is required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Validate a point, rejecting NaN and infinite components.
#[inline]
pub fn check_point(p: Point2D) -> Result<Point2D, NumericError> {
    if p.x.is_nan() || p.y.is_nan() {
        Err(NumericError::NaN)
    } else if p.x.is_infinite() || p.y.is_infinite() {
        Err(NumericError::Infinite)
    } else {
        Ok(p)
    }
}

// ============================================================================
// Anchor List
// ============================================================================

/// Ordered control points of one shape, in click order.
///
/// While drawing the list grows through [`AnchorList::push`]. Once a shape is
/// finalized the length is fixed and [`AnchorList::set_anchor`] is the only
/// way to move a point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorList {
    points: Vec<Point2D>,
}

impl AnchorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[Point2D] {
        &self.points
    }

    pub fn last(&self) -> Option<Point2D> {
        self.points.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point2D> {
        self.points.iter()
    }

    pub(crate) fn push(&mut self, p: Point2D) {
        self.points.push(p);
    }

    pub(crate) fn pop(&mut self) -> Option<Point2D> {
        self.points.pop()
    }

    /// Move anchor `index` to `p`. Returns `None` when `index` is out of range.
    pub fn set_anchor(&mut self, index: usize, p: Point2D) -> Option<Point2D> {
        let slot = self.points.get_mut(index)?;
        Some(std::mem::replace(slot, p))
    }
}

impl From<Vec<Point2D>> for AnchorList {
    fn from(points: Vec<Point2D>) -> Self {
        Self { points }
    }
}

impl From<&[Point2D]> for AnchorList {
    fn from(points: &[Point2D]) -> Self {
        Self {
            points: points.to_vec(),
        }
    }
}

impl Index<usize> for AnchorList {
    type Output = Point2D;

    fn index(&self, index: usize) -> &Point2D {
        &self.points[index]
    }
}

impl fmt::Display for AnchorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "({}, {})", p.x, p.y)?;
        }
        Ok(())
    }
}

// ============================================================================
// Outline
// ============================================================================

/// The vertices a builder produces for one shape.
///
/// `closed` outlines are polygon rings (the first vertex is not repeated
/// unless the construction itself repeats it); open outlines are polylines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    pub points: Vec<Point2D>,
    pub closed: bool,
}

impl Outline {
    pub fn polygon(points: Vec<Point2D>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    pub fn polyline(points: Vec<Point2D>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when no vertex carries NaN or infinity.
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.is_finite())
    }

    /// Bounding box of all vertices, `None` for an empty outline.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut iter = self.points.iter();
        let first = *iter.next()?;
        let mut bounds = Bounds::new(first, first);
        for p in iter {
            bounds.expand(*p);
        }
        Some(bounds)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point2D,
    pub max: Point2D,
}

impl Bounds {
    pub fn new(min: Point2D, max: Point2D) -> Self {
        Self { min, max }
    }

    pub fn expand(&mut self, p: Point2D) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Simple color model for host styles.
#[derive(Clone, Debug, PartialEq)]
pub enum Color {
    Named(&'static str),
    Rgb(u8, u8, u8),
    Rgba(u8, u8, u8, f32),
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Named(s) => write!(f, "{}", s),
            Color::Rgb(r, g, b) => write!(f, "rgb({},{},{})", r, g, b),
            Color::Rgba(r, g, b, a) => write!(f, "rgba({},{},{},{})", r, g, b, a),
        }
    }
}
