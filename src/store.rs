//! Finished shapes by kind
//!
//! The store maps lowercase kind names to the anchor lists of every finished
//! shape of that kind. Its `Display` output is a plot document that
//! [`parse_document`](crate::parse::parse_document) reads back.

use std::collections::BTreeMap;
use std::fmt;

use crate::errors::ParseError;
use crate::parse::parse_document;
use crate::plot::ShapeKind;
use crate::types::AnchorList;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotStore {
    shapes: BTreeMap<&'static str, Vec<AnchorList>>,
}

impl PlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a plot document.
    pub fn from_source(name: &str, source: &str) -> Result<Self, ParseError> {
        let mut store = Self::new();
        for entry in parse_document(name, source)? {
            store.insert(entry.kind, entry.anchors);
        }
        Ok(store)
    }

    pub fn insert(&mut self, kind: ShapeKind, anchors: AnchorList) {
        self.shapes.entry(kind.name()).or_default().push(anchors);
    }

    /// Anchor lists of every shape of `kind`, in insertion order.
    pub fn get(&self, kind: ShapeKind) -> &[AnchorList] {
        self.shapes
            .get(kind.name())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of shapes across all kinds.
    pub fn len(&self) -> usize {
        self.shapes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every shape, grouped by kind name in alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = (ShapeKind, &AnchorList)> {
        self.shapes.iter().flat_map(|(name, lists)| {
            let kind = ShapeKind::from_name(name);
            lists.iter().filter_map(move |anchors| Some((kind?, anchors)))
        })
    }
}

impl fmt::Display for PlotStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (kind, anchors) in self.iter() {
            writeln!(f, "{kind} {anchors}")?;
        }
        Ok(())
    }
}
