//! In-memory SVG render host
//!
//! [`SvgHost`] keeps the primitives the controller adds and writes them out
//! as one SVG document. A [`Viewport`] maps screen pixels to ground
//! coordinates linearly, with screen y growing downwards.

use std::collections::BTreeMap;
use std::fmt;

use glam::dvec2;

use crate::host::{HostHandle, RenderHost, ScreenPos, Style, add_outline};
use crate::log::debug;
use crate::parse::parse_document;
use crate::types::{Bounds, NumericError, Point2D};

/// Width of the document written by [`plot`], in pixels.
pub const PLOT_WIDTH: f64 = 800.0;
/// Blank border around fitted content, in pixels.
pub const PLOT_MARGIN: f64 = 20.0;
/// How close to a point or line a click must land to pick it, in pixels.
pub const PICK_TOLERANCE: f64 = 6.0;

// ============================================================================
// Viewport
// ============================================================================

/// Linear screen <-> ground mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Ground coordinate at the top-left screen corner.
    pub origin: Point2D,
    /// Ground units per screen pixel.
    pub units_per_px: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Create a viewport, rejecting a zero, negative or non-finite scale.
    pub fn try_new(
        origin: Point2D,
        units_per_px: f64,
        width: f64,
        height: f64,
    ) -> Result<Self, NumericError> {
        if units_per_px.is_nan() {
            Err(NumericError::NaN)
        } else if units_per_px.is_infinite() {
            Err(NumericError::Infinite)
        } else if units_per_px == 0.0 {
            Err(NumericError::Zero)
        } else if units_per_px < 0.0 {
            Err(NumericError::Negative)
        } else {
            Ok(Self {
                origin,
                units_per_px,
                width,
                height,
            })
        }
    }

    /// Viewport `width` pixels wide showing `bounds` with `margin` pixels
    /// around it. The height follows the aspect ratio of `bounds`.
    pub fn fit(bounds: Bounds, width: f64, margin: f64) -> Self {
        let inner = (width - 2.0 * margin).max(1.0);
        let extent = bounds.width().max(bounds.height());
        let units_per_px = if extent > 0.0 { extent / inner } else { 1.0 };
        let height = bounds.height() / units_per_px + 2.0 * margin;
        Self {
            origin: dvec2(
                bounds.min.x - margin * units_per_px,
                bounds.max.y + margin * units_per_px,
            ),
            units_per_px,
            width,
            height,
        }
    }

    pub fn to_ground(&self, screen: ScreenPos) -> Point2D {
        dvec2(
            self.origin.x + screen.x * self.units_per_px,
            self.origin.y - screen.y * self.units_per_px,
        )
    }

    pub fn to_screen(&self, p: Point2D) -> ScreenPos {
        ScreenPos::new(
            (p.x - self.origin.x) / self.units_per_px,
            (self.origin.y - p.y) / self.units_per_px,
        )
    }
}

// ============================================================================
// Host
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Primitive {
    Polygon(Vec<Point2D>),
    Polyline(Vec<Point2D>),
    Point(Point2D),
}

#[derive(Debug, Clone, PartialEq)]
struct Item {
    primitive: Primitive,
    style: Style,
}

#[derive(Debug, Clone)]
pub struct SvgHost {
    viewport: Viewport,
    items: BTreeMap<HostHandle, Item>,
    next: u64,
    pick_tolerance: f64,
}

impl SvgHost {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            items: BTreeMap::new(),
            next: 0,
            pick_tolerance: PICK_TOLERANCE,
        }
    }

    pub fn with_pick_tolerance(mut self, pixels: f64) -> Self {
        self.pick_tolerance = pixels;
        self
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Number of primitives currently shown.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn insert(&mut self, primitive: Primitive, style: &Style) -> HostHandle {
        self.next += 1;
        let handle = HostHandle(self.next);
        self.items.insert(
            handle,
            Item {
                primitive,
                style: style.clone(),
            },
        );
        handle
    }

    fn screen_points(&self, points: &[Point2D]) -> Vec<glam::DVec2> {
        points
            .iter()
            .map(|p| {
                let s = self.viewport.to_screen(*p);
                dvec2(s.x, s.y)
            })
            .collect()
    }

    fn hits(&self, item: &Item, at: glam::DVec2) -> bool {
        match &item.primitive {
            Primitive::Point(p) => {
                let s = self.viewport.to_screen(*p);
                dvec2(s.x, s.y).distance(at) <= self.pick_tolerance.max(item.style.point_radius)
            }
            Primitive::Polygon(ring) => contains(&self.screen_points(ring), at),
            Primitive::Polyline(points) => self
                .screen_points(points)
                .windows(2)
                .any(|w| segment_distance(w[0], w[1], at) <= self.pick_tolerance),
        }
    }

    /// The whole scene as an SVG document.
    pub fn to_svg_string(&self) -> String {
        self.to_string()
    }

    fn points_attr(&self, points: &[Point2D]) -> String {
        self.screen_points(points)
            .iter()
            .map(|s| format!("{},{}", fmt_num(s.x), fmt_num(s.y)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for SvgHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = (fmt_num(self.viewport.width), fmt_num(self.viewport.height));
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#
        )?;
        for item in self.items.values() {
            match &item.primitive {
                Primitive::Polygon(ring) => {
                    write!(f, r#"<polygon points="{}""#, self.points_attr(ring))?;
                    write_style(f, &item.style, true)?;
                }
                Primitive::Polyline(points) => {
                    write!(f, r#"<polyline points="{}""#, self.points_attr(points))?;
                    write_style(f, &item.style, false)?;
                }
                Primitive::Point(p) => {
                    let s = self.viewport.to_screen(*p);
                    write!(
                        f,
                        r#"<circle cx="{}" cy="{}" r="{}""#,
                        fmt_num(s.x),
                        fmt_num(s.y),
                        fmt_num(item.style.point_radius)
                    )?;
                    write_style(f, &item.style, true)?;
                }
            }
            writeln!(f, "/>")?;
        }
        writeln!(f, "</svg>")
    }
}

impl RenderHost for SvgHost {
    fn pick_ground_point(&self, screen: ScreenPos) -> Option<Point2D> {
        let p = self.viewport.to_ground(screen);
        p.is_finite().then_some(p)
    }

    /// Points win over areas and lines; later primitives win over earlier
    /// ones.
    fn pick_primitive(&self, screen: ScreenPos) -> Option<HostHandle> {
        let at = dvec2(screen.x, screen.y);
        let is_point = |item: &Item| matches!(item.primitive, Primitive::Point(_));
        let topmost = |points: bool| {
            self.items
                .iter()
                .rev()
                .find(|(_, item)| is_point(item) == points && self.hits(item, at))
                .map(|(handle, _)| *handle)
        };
        topmost(true).or_else(|| topmost(false))
    }

    fn add_polygon(&mut self, ring: &[Point2D], style: &Style) -> HostHandle {
        self.insert(Primitive::Polygon(ring.to_vec()), style)
    }

    fn add_polyline(&mut self, points: &[Point2D], style: &Style) -> HostHandle {
        self.insert(Primitive::Polyline(points.to_vec()), style)
    }

    fn add_point(&mut self, at: Point2D, style: &Style) -> HostHandle {
        self.insert(Primitive::Point(at), style)
    }

    fn remove_shape(&mut self, handle: HostHandle) {
        self.items.remove(&handle);
    }
}

fn write_style(f: &mut fmt::Formatter<'_>, style: &Style, filled: bool) -> fmt::Result {
    match (&style.fill, filled) {
        (Some(fill), true) => write!(f, r#" fill="{fill}""#)?,
        _ => f.write_str(r#" fill="none""#)?,
    }
    write!(
        f,
        r#" stroke="{}" stroke-width="{}""#,
        style.stroke,
        fmt_num(style.stroke_width)
    )
}

/// Even-odd ray cast.
fn contains(ring: &[glam::DVec2], at: glam::DVec2) -> bool {
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for (i, a) in ring.iter().enumerate() {
        let b = ring[j];
        if (a.y > at.y) != (b.y > at.y) && at.x < (b.x - a.x) * (at.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn segment_distance(a: glam::DVec2, b: glam::DVec2, p: glam::DVec2) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return a.distance(p);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    (a + ab * t).distance(p)
}

/// Up to six significant figures, trailing zeros trimmed.
fn fmt_num(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (5 - magnitude).max(0) as usize;
    let s = format!("{:.prec$}", value, prec = decimals);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

// ============================================================================
// One-shot rendering
// ============================================================================

/// Render a plot document to SVG.
///
/// Every shape is built, the view is fitted to all of them, and the result
/// is returned as an SVG string, or an error with diagnostics.
pub fn plot(source: &str) -> Result<String, miette::Report> {
    let entries = parse_document("<input>", source)?;

    let mut built = Vec::with_capacity(entries.len());
    for entry in &entries {
        let outline = entry
            .kind
            .builder()
            .build(entry.anchors.as_slice())
            .map_err(|e| {
                miette::Report::new(e).wrap_err(format!(
                    "cannot build {} at offset {}",
                    entry.kind,
                    entry.span.offset()
                ))
            })?;
        built.push((entry.kind, outline));
    }

    let bounds = built
        .iter()
        .filter_map(|(_, outline)| outline.bounds())
        .reduce(Bounds::union)
        .unwrap_or(Bounds::new(dvec2(0.0, 0.0), dvec2(1.0, 1.0)));
    let mut host = SvgHost::new(Viewport::fit(bounds, PLOT_WIDTH, PLOT_MARGIN));
    let style = Style::finished();
    for (kind, outline) in &built {
        add_outline(&mut host, *kind, outline, &style);
    }
    debug!(shapes = built.len(), "plot rendered");
    Ok(host.to_svg_string())
}
