use std::{
    fmt::Display,
    ops::{Deref, Range},
};

/// Arena of spans for all the nodes of one parse
///
/// Nodes only carry a [`MetaId`], the spans themselves live here so that the
/// tree stays small and the spans can be thrown away once the model builder
/// no longer needs locations.
#[derive(Clone, Debug, Default)]
pub struct Spans(Vec<Span>);

impl Spans {
    pub fn add<T>(&mut self, span: Span, x: T) -> Meta<T> {
        let id = MetaId(self.0.len());
        self.0.push(span);
        Meta { node: x, id }
    }

    pub fn get(&self, x: impl Into<MetaId>) -> Span {
        self.0[x.into().0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> From<&Meta<T>> for MetaId {
    fn from(value: &Meta<T>) -> Self {
        value.id
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub file: usize,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(file: usize, value: Range<usize>) -> Self {
        Self {
            file,
            start: value.start,
            end: value.end,
        }
    }

    /// One-based line and column of the start of this span in `source`
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let start = self.start.min(source.len());
        let before = &source[..start];
        let line = before.matches('\n').count() + 1;
        let col = match before.rfind('\n') {
            Some(idx) => start - idx,
            None => start + 1,
        };
        (line, col)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MetaId(pub usize);

/// A node of the syntax tree together with the id of its span
///
/// Equality only looks at the node, so that trees from two parses of the
/// same input compare equal regardless of how the arena was filled.
#[derive(Clone, Debug)]
pub struct Meta<T> {
    pub node: T,
    pub id: MetaId,
}

impl<T: PartialEq> PartialEq for Meta<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<T: Eq> Eq for Meta<T> {}

impl<T: Display> Display for Meta<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.node.fmt(f)
    }
}

impl<T> Deref for Meta<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.node
    }
}
