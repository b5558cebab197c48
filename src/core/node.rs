//! Segment nodes of the route tree.
//!
//! A node owns its children outright: static children live in a vector kept
//! sorted by literal so lookups are a binary search with no allocation, while
//! the param and wildcard slots hold at most one child each. Handlers are kept
//! per node, keyed by method, in registration order.
use std::{cmp::Ordering, sync::Arc};

use http::Method;

/// What a node matches against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Exact literal text (already case-folded when matching is case-insensitive).
    Static(Box<str>),
    /// One path segment, bound to the name.
    Param(Arc<str>),
    /// Every remaining segment, bound to the name. Always terminal.
    Wildcard(Arc<str>),
}

/// A handler attached to a node for one method.
#[derive(Debug, Clone)]
pub struct Endpoint<T> {
    pub method: Method,
    /// The pattern string as it was registered for this method.
    pub pattern: Arc<str>,
    pub handler: T,
}

#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    pub(crate) kind: SegmentKind,
    pub(crate) statics: Vec<Node<T>>,
    pub(crate) param: Option<Box<Node<T>>>,
    pub(crate) wildcard: Option<Box<Node<T>>>,
    pub(crate) endpoints: Vec<Endpoint<T>>,
}

impl<T> Node<T> {
    pub(crate) fn root() -> Self {
        Self::new(SegmentKind::Static(Box::from("")))
    }

    fn new(kind: SegmentKind) -> Self {
        Self {
            kind,
            statics: Vec::new(),
            param: None,
            wildcard: None,
            endpoints: Vec::new(),
        }
    }

    /// Capture name of a param or wildcard node.
    pub(crate) fn capture_name(&self) -> Option<&Arc<str>> {
        match &self.kind {
            SegmentKind::Static(_) => None,
            SegmentKind::Param(name) | SegmentKind::Wildcard(name) => Some(name),
        }
    }

    pub(crate) fn find_static(&self, segment: &str, fold: bool) -> Option<&Node<T>> {
        self.static_index(segment, fold)
            .ok()
            .map(|idx| &self.statics[idx])
    }

    /// Descend into the static child for `literal`, creating it if missing.
    pub(crate) fn static_child_mut(&mut self, literal: &str, fold: bool) -> &mut Node<T> {
        let idx = match self.static_index(literal, fold) {
            Ok(idx) => idx,
            Err(idx) => {
                let stored = if fold {
                    literal.to_ascii_lowercase()
                } else {
                    literal.to_string()
                };
                self.statics
                    .insert(idx, Node::new(SegmentKind::Static(stored.into_boxed_str())));
                idx
            }
        };
        &mut self.statics[idx]
    }

    /// Descend into the param child, creating it if missing.
    ///
    /// Callers check for a name conflict before mutating the tree.
    pub(crate) fn param_child_mut(&mut self, name: &Arc<str>) -> &mut Node<T> {
        self.param
            .get_or_insert_with(|| Box::new(Node::new(SegmentKind::Param(Arc::clone(name)))))
    }

    /// Descend into the wildcard child, creating it if missing.
    pub(crate) fn wildcard_child_mut(&mut self, name: &Arc<str>) -> &mut Node<T> {
        self.wildcard
            .get_or_insert_with(|| Box::new(Node::new(SegmentKind::Wildcard(Arc::clone(name)))))
    }

    pub(crate) fn endpoint(&self, method: &Method) -> Option<&Endpoint<T>> {
        self.endpoints.iter().find(|ep| ep.method == *method)
    }

    pub(crate) fn has_endpoints(&self) -> bool {
        !self.endpoints.is_empty()
    }

    fn static_index(&self, segment: &str, fold: bool) -> Result<usize, usize> {
        self.statics.binary_search_by(|child| match &child.kind {
            SegmentKind::Static(literal) => compare_literal(literal, segment, fold),
            // statics only ever holds static nodes
            _ => Ordering::Less,
        })
    }
}

/// Order a stored literal against a request segment.
///
/// Stored literals are lowercase when folding, so only the segment side needs
/// folding and the sort order of `statics` stays plain byte order.
#[inline]
fn compare_literal(literal: &str, segment: &str, fold: bool) -> Ordering {
    if fold {
        literal
            .bytes()
            .cmp(segment.bytes().map(|b| b.to_ascii_lowercase()))
    } else {
        literal.as_bytes().cmp(segment.as_bytes())
    }
}
