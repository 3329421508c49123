//! Tactical plotting geometry.
//!
//! Military symbology shapes (pincer and attack arrows, sectors, lunes,
//! gathering places and the rest) built from a handful of anchor points, plus
//! an interactive controller that turns pointer events into those anchors.
//!
//! - [`plot`](mod@plot): the pure geometry engine and the shape builders
//! - [`session`]: the draw/modify state machine
//! - [`plotter`]: the controller around a [`host::RenderHost`]
//! - [`store`] and [`parse`]: the plain-text plot document
//! - [`svg`]: an in-memory SVG host and the one-shot [`plot()`] renderer

use pest_derive::Parser;

pub mod errors;
pub mod host;
pub mod log;
pub mod parse;
pub mod plot;
pub mod plotter;
pub mod session;
pub mod store;
pub mod svg;
pub mod types;

#[derive(Parser)]
#[grammar = "plot.pest"]
pub struct PlotParser;

pub use errors::{ParseError, PlotError, SessionError, ShapeError};
pub use host::{HostHandle, RenderHost, ScreenPos, Style};
pub use plot::{BuildOutline, Completion, Family, ShapeBuilder, ShapeKind};
pub use plotter::{PlacedShape, Plotter, ScreenEvent, ShapeId};
pub use session::{Effect, InteractiveShapeSession, PointerEvent, SessionState, Transition};
pub use store::PlotStore;
pub use svg::{SvgHost, Viewport, plot};
pub use types::{AnchorList, Outline, Point2D};
