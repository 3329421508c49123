//! Shape kinds and their builders.
//!
//! [`ShapeKind`] is the selector: a name, a family, anchor bounds and the
//! rule that completes an interactive draw. [`ShapeBuilder`] is the strategy:
//! one variant per builder, each carrying its parameter bundle, dispatched
//! through [`BuildOutline`].

use std::fmt;

use enum_dispatch::enum_dispatch;
use glam::dvec2;

use super::defaults::{
    AttackArrowParams, CURVE_TENSION, DoubleArrowParams, FineArrowParams, GATHERING_TENSION,
    PREVIEW_EPSILON,
};
use super::{area, arrow, line};
use crate::errors::ShapeError;
use crate::log::{debug, trace};
use crate::types::{Outline, Point2D};

// ============================================================================
// Shape Kind
// ============================================================================

/// Every shape the engine can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    Marker,
    Arc,
    Curve,
    Polyline,
    FreehandPolyline,
    Circle,
    Ellipse,
    Lune,
    Sector,
    Rectangle,
    ClosedCurve,
    Polygon,
    FreehandPolygon,
    GatheringPlace,
    DoubleArrow,
    StraightArrow,
    FineArrow,
    AssaultDirection,
    AttackArrow,
    TailedAttackArrow,
    SquadCombat,
    TailedSquadCombat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Point,
    Line,
    Area,
    Arrow,
}

/// How an interactive draw knows the shape is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Finishes on the click that commits the n-th anchor.
    Clicks(usize),
    /// Finishes on right-click once at least `min` anchors are committed.
    RightClick { min: usize },
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 22] = [
        ShapeKind::Marker,
        ShapeKind::Arc,
        ShapeKind::Curve,
        ShapeKind::Polyline,
        ShapeKind::FreehandPolyline,
        ShapeKind::Circle,
        ShapeKind::Ellipse,
        ShapeKind::Lune,
        ShapeKind::Sector,
        ShapeKind::Rectangle,
        ShapeKind::ClosedCurve,
        ShapeKind::Polygon,
        ShapeKind::FreehandPolygon,
        ShapeKind::GatheringPlace,
        ShapeKind::DoubleArrow,
        ShapeKind::StraightArrow,
        ShapeKind::FineArrow,
        ShapeKind::AssaultDirection,
        ShapeKind::AttackArrow,
        ShapeKind::TailedAttackArrow,
        ShapeKind::SquadCombat,
        ShapeKind::TailedSquadCombat,
    ];

    /// Lowercase name, used as the store key and in plot documents.
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Marker => "marker",
            ShapeKind::Arc => "arc",
            ShapeKind::Curve => "curve",
            ShapeKind::Polyline => "polyline",
            ShapeKind::FreehandPolyline => "freehandpolyline",
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Lune => "lune",
            ShapeKind::Sector => "sector",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::ClosedCurve => "closedcurve",
            ShapeKind::Polygon => "polygon",
            ShapeKind::FreehandPolygon => "freehandpolygon",
            ShapeKind::GatheringPlace => "gatheringplace",
            ShapeKind::DoubleArrow => "doublearrow",
            ShapeKind::StraightArrow => "straightarrow",
            ShapeKind::FineArrow => "finearrow",
            ShapeKind::AssaultDirection => "assaultdirection",
            ShapeKind::AttackArrow => "attackarrow",
            ShapeKind::TailedAttackArrow => "tailedattackarrow",
            ShapeKind::SquadCombat => "squadcombat",
            ShapeKind::TailedSquadCombat => "tailedsquadcombat",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<ShapeKind> {
        let lower = name.to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| k.name() == lower)
    }

    /// A known name close to `name`, for error messages.
    pub fn suggest(name: &str) -> Option<ShapeKind> {
        let lower = name.to_ascii_lowercase();
        if lower.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|k| k.name().contains(&lower) || lower.contains(k.name()))
    }

    pub fn family(self) -> Family {
        use ShapeKind::*;
        match self {
            Marker => Family::Point,
            Arc | Curve | Polyline | FreehandPolyline => Family::Line,
            Circle | Ellipse | Lune | Sector | Rectangle | ClosedCurve | Polygon
            | FreehandPolygon | GatheringPlace => Family::Area,
            DoubleArrow | StraightArrow | FineArrow | AssaultDirection | AttackArrow
            | TailedAttackArrow | SquadCombat | TailedSquadCombat => Family::Arrow,
        }
    }

    pub fn completion(self) -> Completion {
        use ShapeKind::*;
        match self {
            Marker => Completion::Clicks(1),
            Circle | Ellipse | Rectangle | FineArrow | AssaultDirection => Completion::Clicks(2),
            Arc | Lune | Sector | GatheringPlace => Completion::Clicks(3),
            DoubleArrow => Completion::Clicks(4),
            Curve | Polyline | FreehandPolyline | StraightArrow | ClosedCurve | SquadCombat
            | TailedSquadCombat => Completion::RightClick { min: 2 },
            Polygon | FreehandPolygon | AttackArrow | TailedAttackArrow => {
                Completion::RightClick { min: 3 }
            }
        }
    }

    /// Fewest anchors the builder accepts.
    pub fn min_anchors(self) -> usize {
        use ShapeKind::*;
        match self {
            Marker => 1,
            Arc | Sector | Polygon | FreehandPolygon | AttackArrow | TailedAttackArrow => 3,
            _ => 2,
        }
    }

    /// Most anchors the builder accepts, `None` when unbounded.
    pub fn max_anchors(self) -> Option<usize> {
        use ShapeKind::*;
        match self {
            Marker => Some(1),
            Circle | Ellipse | Rectangle | FineArrow | AssaultDirection => Some(2),
            Arc | Lune | Sector | GatheringPlace => Some(3),
            DoubleArrow => Some(5),
            _ => None,
        }
    }

    /// Freehand kinds commit an anchor on every pointer move.
    pub fn is_freehand(self) -> bool {
        matches!(self, ShapeKind::FreehandPolyline | ShapeKind::FreehandPolygon)
    }

    /// Whether the outline is a polygon ring rather than a polyline.
    pub fn is_closed(self) -> bool {
        match self.family() {
            Family::Area => true,
            Family::Arrow => self != ShapeKind::StraightArrow,
            Family::Point | Family::Line => false,
        }
    }

    /// Builder with the default parameter bundle for this kind.
    pub fn builder(self) -> ShapeBuilder {
        use ShapeKind::*;
        match self {
            Marker => MarkerBuilder.into(),
            Polyline | FreehandPolyline | StraightArrow | Polygon | FreehandPolygon => {
                PassThroughBuilder { kind: self }.into()
            }
            Arc => ArcBuilder.into(),
            Curve => CurveBuilder {
                tension: CURVE_TENSION,
            }
            .into(),
            Circle => CircleBuilder.into(),
            Ellipse => EllipseBuilder.into(),
            Rectangle => RectangleBuilder.into(),
            Lune => LuneBuilder.into(),
            Sector => SectorBuilder.into(),
            ClosedCurve => ClosedCurveBuilder {
                tension: CURVE_TENSION,
            }
            .into(),
            GatheringPlace => GatheringPlaceBuilder {
                tension: GATHERING_TENSION,
            }
            .into(),
            DoubleArrow => DoubleArrowBuilder {
                params: DoubleArrowParams::DEFAULT,
            }
            .into(),
            FineArrow => FineArrowBuilder::new(FineArrowParams::FINE).into(),
            AssaultDirection => FineArrowBuilder::assault(FineArrowParams::ASSAULT).into(),
            AttackArrow | TailedAttackArrow => AttackArrowBuilder {
                params: AttackArrowParams::DEFAULT,
                tailed: self == TailedAttackArrow,
            }
            .into(),
            SquadCombat | TailedSquadCombat => SquadCombatBuilder {
                params: AttackArrowParams::DEFAULT,
                tailed: self == TailedSquadCombat,
            }
            .into(),
        }
    }

    fn wrap(self, points: Vec<Point2D>) -> Outline {
        Outline {
            points,
            closed: self.is_closed(),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Builder trait
// ============================================================================

/// Common behavior of all shape builders
#[enum_dispatch]
pub trait BuildOutline {
    fn kind(&self) -> ShapeKind;

    /// Outline for anchors already known to be within the kind's bounds.
    fn outline(&self, anchors: &[Point2D]) -> Outline;

    /// Outline for an in-progress draw, where the last anchor follows the
    /// pointer and may coincide with the one before it.
    fn preview_outline(&self, anchors: &[Point2D]) -> Outline {
        if anchors.len() < self.kind().min_anchors() {
            return Outline::polyline(anchors.to_vec());
        }
        self.outline(anchors)
    }
}

/// A builder for one shape kind, carrying its parameters.
#[enum_dispatch(BuildOutline)]
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeBuilder {
    Marker(MarkerBuilder),
    PassThrough(PassThroughBuilder),
    Arc(ArcBuilder),
    Curve(CurveBuilder),
    Circle(CircleBuilder),
    Ellipse(EllipseBuilder),
    Rectangle(RectangleBuilder),
    Lune(LuneBuilder),
    Sector(SectorBuilder),
    ClosedCurve(ClosedCurveBuilder),
    GatheringPlace(GatheringPlaceBuilder),
    DoubleArrow(DoubleArrowBuilder),
    FineArrow(FineArrowBuilder),
    AttackArrow(AttackArrowBuilder),
    SquadCombat(SquadCombatBuilder),
}

impl ShapeBuilder {
    /// Check the anchor count and values for a finished shape.
    pub fn validate(&self, anchors: &[Point2D]) -> Result<(), ShapeError> {
        let kind = self.kind();
        let got = anchors.len();
        if got < kind.min_anchors() {
            return Err(ShapeError::TooFewAnchors {
                kind,
                min: kind.min_anchors(),
                got,
            });
        }
        if let Some(max) = kind.max_anchors() {
            if got > max {
                return Err(ShapeError::TooManyAnchors { kind, max, got });
            }
        }
        if let Some(index) = anchors.iter().position(|p| !p.is_finite()) {
            return Err(ShapeError::NonFiniteAnchor { kind, index });
        }
        Ok(())
    }

    /// Outline of a finished shape.
    ///
    /// Anchors the construction cannot handle (coincident fine-arrow ends,
    /// collinear arc points) give [`ShapeError::NonFiniteOutline`].
    pub fn build(&self, anchors: &[Point2D]) -> Result<Outline, ShapeError> {
        self.validate(anchors)?;
        let outline = self.outline(anchors);
        if !outline.is_finite() {
            return Err(ShapeError::NonFiniteOutline { kind: self.kind() });
        }
        debug!(kind = %self.kind(), anchors = anchors.len(), vertices = outline.len(), "built outline");
        Ok(outline)
    }

    /// Outline of an in-progress shape. Never contains NaN: configurations
    /// that would produce one render as nothing.
    pub fn preview(&self, anchors: &[Point2D]) -> Outline {
        if anchors.is_empty() {
            return Outline::empty();
        }
        let outline = self.preview_outline(anchors);
        if outline.is_finite() {
            outline
        } else {
            trace!(kind = %self.kind(), "preview dropped non-finite outline");
            Outline::empty()
        }
    }
}

/// `(p.x + PREVIEW_EPSILON, p.y)`: splits a floating anchor off the one it
/// was just committed on top of.
fn nudged(p: Point2D) -> Point2D {
    dvec2(p.x + PREVIEW_EPSILON, p.y)
}

/// Two anchors get a third just beside the second.
fn with_nudged_third(anchors: &[Point2D]) -> Vec<Point2D> {
    let mut out = anchors.to_vec();
    if out.len() == 2 {
        out.push(nudged(out[1]));
    }
    out
}

// ============================================================================
// Point and line builders
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerBuilder;

impl BuildOutline for MarkerBuilder {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Marker
    }

    fn outline(&self, anchors: &[Point2D]) -> Outline {
        Outline::polyline(anchors[..1].to_vec())
    }
}

/// Polylines, polygons and the straight arrow: the anchors are the outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassThroughBuilder {
    kind: ShapeKind,
}

impl BuildOutline for PassThroughBuilder {
    fn kind(&self) -> ShapeKind {
        self.kind
    }

    fn outline(&self, anchors: &[Point2D]) -> Outline {
        self.kind.wrap(anchors.to_vec())
    }

    fn preview_outline(&self, anchors: &[Point2D]) -> Outline {
        self.outline(anchors)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcBuilder;

impl BuildOutline for ArcBuilder {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Arc
    }

    fn outline(&self, anchors: &[Point2D]) -> Outline {
        Outline::polyline(line::arc(anchors))
    }

    fn preview_outline(&self, anchors: &[Point2D]) -> Outline {
        match anchors.len() {
            2 => Outline::polyline(anchors.to_vec()),
            3 if anchors[2] == anchors[1] => Outline::polyline(anchors.to_vec()),
            3 => self.outline(anchors),
            _ => Outline::empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveBuilder {
    pub tension: f64,
}

impl BuildOutline for CurveBuilder {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Curve
    }

    fn outline(&self, anchors: &[Point2D]) -> Outline {
        Outline::polyline(line::curve(self.tension, anchors))
    }
}

// ============================================================================
// Area builders
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleBuilder;

impl BuildOutline for CircleBuilder {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Circle
    }

    fn outline(&self, anchors: &[Point2D]) -> Outline {
        Outline::polygon(area::circle(anchors[0], anchors[1]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseBuilder;

impl BuildOutline for EllipseBuilder {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Ellipse
    }

    fn outline(&self, anchors: &[Point2D]) -> Outline {
        Outline::polygon(area::ellipse(anchors[0], anchors[1]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangleBuilder;

impl BuildOutline for RectangleBuilder {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Rectangle
    }

    fn outline(&self, anchors: &[Point2D]) -> Outline {
        Outline::polygon(area::rectangle(anchors[0], anchors[1]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LuneBuilder;

impl BuildOutline for LuneBuilder {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Lune
    }

    fn outline(&self, anchors: &[Point2D]) -> Outline {
        Outline::polygon(area::lune(anchors))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorBuilder;

impl BuildOutline for SectorBuilder {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Sector
    }

    fn outline(&self, anchors: &[Point2D]) -> Outline {
        Outline::polygon(area::sector(anchors))
    }

    fn preview_outline(&self, anchors: &[Point2D]) -> Outline {
        let anchors = with_nudged_third(anchors);
        if anchors.len() < 3 {
            return Outline::polyline(anchors);
        }
        self.outline(&anchors)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosedCurveBuilder {
    pub tension: f64,
}

impl BuildOutline for ClosedCurveBuilder {
    fn kind(&self) -> ShapeKind {
        ShapeKind::ClosedCurve
    }

    fn outline(&self, anchors: &[Point2D]) -> Outline {
        Outline::polygon(area::closed_curve(self.tension, anchors))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GatheringPlaceBuilder {
    pub tension: f64,
}

impl BuildOutline for GatheringPlaceBuilder {
    fn kind(&self) -> ShapeKind {
        ShapeKind::GatheringPlace
    }

    fn outline(&self, anchors: &[Point2D]) -> Outline {
        Outline::polygon(area::gathering_place(self.tension, anchors))
    }

    fn preview_outline(&self, anchors: &[Point2D]) -> Outline {
        let anchors = with_nudged_third(anchors);
        if anchors.len() < 2 {
            return Outline::polyline(anchors);
        }
        self.outline(&anchors)
    }
}

// ============================================================================
// Arrow builders
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleArrowBuilder {
    pub params: DoubleArrowParams,
}

impl BuildOutline for DoubleArrowBuilder {
    fn kind(&self) -> ShapeKind {
        ShapeKind::DoubleArrow
    }

    fn outline(&self, anchors: &[Point2D]) -> Outline {
        Outline::polygon(arrow::double_arrow(anchors, &self.params))
    }

    fn preview_outline(&self, anchors: &[Point2D]) -> Outline {
        if anchors.len() < 2 {
            return Outline::polyline(anchors.to_vec());
        }
        let mut anchors = anchors.to_vec();
        if anchors.len() == 2 || anchors[1] == anchors[2] {
            anchors.push(nudged(anchors[1]));
        }
        self.outline(&anchors[..anchors.len().min(5)])
    }
}

/// Fine arrow and assault direction share one construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FineArrowBuilder {
    pub params: FineArrowParams,
    kind: ShapeKind,
}

impl FineArrowBuilder {
    pub fn new(params: FineArrowParams) -> Self {
        Self {
            params,
            kind: ShapeKind::FineArrow,
        }
    }

    pub fn assault(params: FineArrowParams) -> Self {
        Self {
            params,
            kind: ShapeKind::AssaultDirection,
        }
    }
}

impl BuildOutline for FineArrowBuilder {
    fn kind(&self) -> ShapeKind {
        self.kind
    }

    fn outline(&self, anchors: &[Point2D]) -> Outline {
        Outline::polygon(arrow::fine_arrow(anchors, &self.params))
    }

    fn preview_outline(&self, anchors: &[Point2D]) -> Outline {
        let anchors = with_nudged_third(anchors);
        if anchors.len() < 2 {
            return Outline::polyline(anchors);
        }
        self.outline(&anchors)
    }
}

/// Attack-family preview input: a third anchor beside the second, or a
/// floating anchor sitting on the last committed one dropped, or else the
/// floating anchor nudged so no two anchors coincide.
fn attack_preview_anchors(anchors: &[Point2D]) -> Vec<Point2D> {
    let mut out = anchors.to_vec();
    let n = out.len();
    if n == 2 {
        out.push(nudged(out[1]));
    } else if n > 3 && out[n - 1] == out[n - 2] {
        out.pop();
    } else if let Some(last) = out.last_mut() {
        last.x += PREVIEW_EPSILON;
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackArrowBuilder {
    pub params: AttackArrowParams,
    pub tailed: bool,
}

impl BuildOutline for AttackArrowBuilder {
    fn kind(&self) -> ShapeKind {
        if self.tailed {
            ShapeKind::TailedAttackArrow
        } else {
            ShapeKind::AttackArrow
        }
    }

    fn outline(&self, anchors: &[Point2D]) -> Outline {
        Outline::polygon(arrow::attack_arrow(anchors, &self.params, self.tailed))
    }

    fn preview_outline(&self, anchors: &[Point2D]) -> Outline {
        if anchors.len() < 2 {
            return Outline::polyline(anchors.to_vec());
        }
        self.outline(&attack_preview_anchors(anchors))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquadCombatBuilder {
    pub params: AttackArrowParams,
    pub tailed: bool,
}

impl BuildOutline for SquadCombatBuilder {
    fn kind(&self) -> ShapeKind {
        if self.tailed {
            ShapeKind::TailedSquadCombat
        } else {
            ShapeKind::SquadCombat
        }
    }

    fn outline(&self, anchors: &[Point2D]) -> Outline {
        Outline::polygon(arrow::squad_combat(anchors, &self.params, self.tailed))
    }

    fn preview_outline(&self, anchors: &[Point2D]) -> Outline {
        if anchors.len() < 2 {
            return Outline::polyline(anchors.to_vec());
        }
        self.outline(&attack_preview_anchors(anchors))
    }
}
