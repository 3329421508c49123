//! The geometry engine
//!
//! This module is organized into submodules:
//! - `defaults`: sampling constants and parameter bundles
//! - `geometry`: planar primitives (azimuth, third point, circle center, arcs)
//! - `curve`: Bezier, B-spline and bisector-normal curve fitting
//! - `area`, `arrow`, `line`: the shape constructions
//! - `shapes`: shape kinds and the builder dispatch

pub mod area;
pub mod arrow;
pub mod curve;
pub mod defaults;
pub mod geometry;
pub mod line;
pub mod shapes;

pub use shapes::{BuildOutline, Completion, Family, ShapeBuilder, ShapeKind};
