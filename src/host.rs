//! The render host capability
//!
//! The controller never draws anything itself. It projects pointer positions
//! and adds or removes primitives through a [`RenderHost`] it owns, so the
//! same controller drives a globe viewer, a canvas or the in-memory
//! [`SvgHost`](crate::svg::SvgHost).

use crate::plot::{Family, ShapeKind};
use crate::types::{Color, Outline, Point2D};

/// A pointer position in host screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPos {
    pub x: f64,
    pub y: f64,
}

impl ScreenPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Opaque id of a primitive added to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostHandle(pub u64);

/// Stroke and fill for one primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub stroke: Color,
    pub stroke_width: f64,
    pub fill: Option<Color>,
    /// Radius of point primitives, in pixels.
    pub point_radius: f64,
}

impl Style {
    /// Live outline while drawing or dragging.
    pub fn preview() -> Self {
        Self {
            stroke: Color::Rgb(255, 165, 0),
            stroke_width: 2.0,
            fill: Some(Color::Rgba(255, 165, 0, 0.3)),
            point_radius: 4.0,
        }
    }

    /// A finished shape.
    pub fn finished() -> Self {
        Self {
            stroke: Color::Rgb(0, 0, 255),
            stroke_width: 2.0,
            fill: Some(Color::Rgba(0, 0, 255, 0.4)),
            point_radius: 5.0,
        }
    }

    /// Anchor handle shown while modifying.
    pub fn handle() -> Self {
        Self {
            stroke: Color::Named("white"),
            stroke_width: 1.0,
            fill: Some(Color::Rgb(255, 0, 0)),
            point_radius: 5.0,
        }
    }
}

/// What the controller needs from a map or canvas.
pub trait RenderHost {
    /// Ground coordinate under a screen position, `None` off the ground.
    fn pick_ground_point(&self, screen: ScreenPos) -> Option<Point2D>;

    /// Primitive under a screen position.
    fn pick_primitive(&self, _screen: ScreenPos) -> Option<HostHandle> {
        None
    }

    fn add_polygon(&mut self, ring: &[Point2D], style: &Style) -> HostHandle;

    fn add_polyline(&mut self, points: &[Point2D], style: &Style) -> HostHandle;

    fn add_point(&mut self, at: Point2D, style: &Style) -> HostHandle;

    fn remove_shape(&mut self, handle: HostHandle);
}

/// Add `outline` with the primitive its kind renders as. Empty outlines add
/// nothing.
pub(crate) fn add_outline<H: RenderHost + ?Sized>(
    host: &mut H,
    kind: ShapeKind,
    outline: &Outline,
    style: &Style,
) -> Option<HostHandle> {
    let first = *outline.points.first()?;
    let handle = if kind.family() == Family::Point {
        host.add_point(first, style)
    } else if outline.closed && outline.len() > 2 {
        host.add_polygon(&outline.points, style)
    } else {
        host.add_polyline(&outline.points, style)
    };
    Some(handle)
}
