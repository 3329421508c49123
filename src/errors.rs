//! Error types with rich diagnostics using miette
//!
//! Plot document errors carry source spans; shape and session errors carry
//! the shape kind and counts involved.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::plot::ShapeKind;

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (filename or "<input>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Errors that occur while reading a plot document
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("syntax error: {message}")]
    #[diagnostic(code(tacplot::parse::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("unknown shape: {name}")]
    #[diagnostic(code(tacplot::parse::unknown_shape))]
    UnknownShape {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a shape kind")]
        span: SourceSpan,
        #[help]
        suggestion: Option<String>,
    },

    #[error("invalid number: {message}")]
    #[diagnostic(code(tacplot::parse::invalid_number))]
    InvalidNumber {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("invalid number")]
        span: SourceSpan,
    },

    #[error("{kind} takes {expected} anchors, found {got}")]
    #[diagnostic(code(tacplot::parse::anchor_count))]
    AnchorCount {
        kind: ShapeKind,
        expected: String,
        got: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("this shape")]
        span: SourceSpan,
    },
}

// ============================================================================
// Shape Errors
// ============================================================================

/// Errors from the final (non-preview) build of a shape
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("{kind} needs at least {min} anchors, got {got}")]
    #[diagnostic(code(tacplot::shape::too_few_anchors))]
    TooFewAnchors {
        kind: ShapeKind,
        min: usize,
        got: usize,
    },

    #[error("{kind} takes at most {max} anchors, got {got}")]
    #[diagnostic(code(tacplot::shape::too_many_anchors))]
    TooManyAnchors {
        kind: ShapeKind,
        max: usize,
        got: usize,
    },

    #[error("anchor {index} of {kind} is not finite")]
    #[diagnostic(code(tacplot::shape::non_finite_anchor))]
    NonFiniteAnchor { kind: ShapeKind, index: usize },

    #[error("{kind} outline contains NaN or infinite vertices")]
    #[diagnostic(
        code(tacplot::shape::non_finite_outline),
        help("the anchors form a degenerate configuration for this shape")
    )]
    NonFiniteOutline { kind: ShapeKind },
}

// ============================================================================
// Session Errors
// ============================================================================

/// Errors raised by the interactive controller
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("previous operation must finish first")]
    #[diagnostic(
        code(tacplot::session::busy),
        help("complete the shape with a click or right-click, or cancel it")
    )]
    Busy,

    #[error("no shape with id {0}")]
    #[diagnostic(code(tacplot::session::unknown_shape))]
    UnknownShape(u64),

    #[error("anchor index {index} out of range for {len} anchors")]
    #[diagnostic(code(tacplot::session::anchor_out_of_range))]
    AnchorOutOfRange { index: usize, len: usize },
}

/// Any error the controller can report
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum PlotError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Session(#[from] SessionError),
}
