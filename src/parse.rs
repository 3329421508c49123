//! Parse plot documents into shape entries

use miette::SourceSpan;
use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;

use crate::errors::{ParseError, SourceContext};
use crate::plot::ShapeKind;
use crate::types::{AnchorList, Point2D, check_point};
use crate::{PlotParser, Rule};

/// One line of a plot document.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotEntry {
    pub kind: ShapeKind,
    pub anchors: AnchorList,
    /// Byte range of the entry in the source.
    pub span: SourceSpan,
}

/// Parse a plot document.
///
/// `name` labels the source in diagnostics. Anchor counts are checked
/// against each kind's bounds here. Geometry is not: collinear arc anchors
/// parse fine and only fail when the entry is built.
pub fn parse_document(name: &str, source: &str) -> Result<Vec<PlotEntry>, ParseError> {
    let ctx = SourceContext::new(name, source);
    let pairs = PlotParser::parse(Rule::document, source).map_err(|e| {
        let span: SourceSpan = match e.location {
            InputLocation::Pos(p) => (p, 0).into(),
            InputLocation::Span((start, end)) => (start, end - start).into(),
        };
        ParseError::Syntax {
            message: e.variant.message().into_owned(),
            src: ctx.named_source(),
            span,
        }
    })?;

    let mut entries = Vec::new();
    for pair in pairs {
        if pair.as_rule() != Rule::document {
            continue;
        }
        for inner in pair.into_inner() {
            if inner.as_rule() == Rule::entry {
                entries.push(parse_entry(inner, &ctx)?);
            }
        }
    }
    Ok(entries)
}

fn span_of(pair: &Pair<Rule>) -> SourceSpan {
    let span = pair.as_span();
    (span.start(), span.end() - span.start()).into()
}

fn parse_entry(pair: Pair<Rule>, ctx: &SourceContext) -> Result<PlotEntry, ParseError> {
    let span = span_of(&pair);
    let mut kind = None;
    let mut anchors = AnchorList::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::shape_name => kind = Some(parse_shape_name(&inner, ctx)?),
            Rule::point => anchors.push(parse_point(inner, ctx)?),
            _ => {}
        }
    }

    // The grammar always yields a name first.
    let Some(kind) = kind else {
        return Err(ParseError::Syntax {
            message: "expected a shape name".to_string(),
            src: ctx.named_source(),
            span,
        });
    };

    check_anchor_count(kind, anchors.len(), span, ctx)?;
    Ok(PlotEntry {
        kind,
        anchors,
        span,
    })
}

fn parse_shape_name(pair: &Pair<Rule>, ctx: &SourceContext) -> Result<ShapeKind, ParseError> {
    let name = pair.as_str();
    ShapeKind::from_name(name).ok_or_else(|| ParseError::UnknownShape {
        name: name.to_string(),
        src: ctx.named_source(),
        span: span_of(pair),
        suggestion: ShapeKind::suggest(name).map(|k| format!("did you mean `{k}`?")),
    })
}

fn parse_point(pair: Pair<Rule>, ctx: &SourceContext) -> Result<Point2D, ParseError> {
    let text = pair.as_str();
    let span = span_of(&pair);
    let mut coords = [0.0; 2];
    for (slot, number) in coords.iter_mut().zip(pair.into_inner()) {
        *slot = parse_number(&number, ctx)?;
    }
    check_point(Point2D::new(coords[0], coords[1])).map_err(|e| ParseError::InvalidNumber {
        message: format!("{text}: {e}"),
        src: ctx.named_source(),
        span,
    })
}

fn parse_number(pair: &Pair<Rule>, ctx: &SourceContext) -> Result<f64, ParseError> {
    let text = pair.as_str();
    text.parse().map_err(|e| ParseError::InvalidNumber {
        message: format!("{text}: {e}"),
        src: ctx.named_source(),
        span: span_of(pair),
    })
}

fn check_anchor_count(
    kind: ShapeKind,
    got: usize,
    span: SourceSpan,
    ctx: &SourceContext,
) -> Result<(), ParseError> {
    let min = kind.min_anchors();
    let max = kind.max_anchors();
    if got >= min && max.is_none_or(|max| got <= max) {
        return Ok(());
    }
    let expected = match max {
        Some(max) if max == min => format!("{min}"),
        Some(max) => format!("{min} to {max}"),
        None => format!("at least {min}"),
    };
    Err(ParseError::AnchorCount {
        kind,
        expected,
        got,
        src: ctx.named_source(),
        span,
    })
}
