//! Per-request match results.
//!
//! A [`MatchingContext`] is built fresh by every lookup and is never pooled or
//! shared between requests. Captured values borrow from the request path, and
//! capture names are shared with the route tree, so building one allocates at
//! most the parameter vector.
//!
//! Sharing a name is an `Arc` refcount increment, and so is the handler clone
//! made by [`Router::dispatch`](crate::core::Router::dispatch). Both touch
//! counters that every reader of the tree shares. Hot paths that only need the
//! handler for the duration of a call can look up through
//! [`Router::snapshot`](crate::core::Router::snapshot) and
//! [`RouteTree::at`](crate::core::RouteTree::at), which borrow the handler
//! instead of cloning it.
use std::{collections::HashMap, sync::Arc};

use serde::{Serialize, Serializer, ser::SerializeMap};

/// Path parameters captured during a match.
///
/// Lookup is by name; iteration order follows the path from left to right but
/// callers should only rely on presence and value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params<'p> {
    entries: Vec<(Arc<str>, &'p str)>,
}

impl<'p> Params<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value captured for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&'p str> {
        self.entries
            .iter()
            .find(|(key, _)| &**key == name)
            .map(|(_, value)| *value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &'p str)> + '_ {
        self.entries.iter().map(|(key, value)| (&**key, *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy the captures into an owned map, detaching them from the path.
    pub fn to_map(&self) -> HashMap<String, String> {
        self.iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    pub(crate) fn push(&mut self, name: &Arc<str>, value: &'p str) {
        self.entries.push((Arc::clone(name), value));
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }
}

impl Serialize for Params<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// The outcome of a successful match: the handler, its captures, and the
/// pattern that produced it.
///
/// `H` is whatever handler reference the lookup hands out: `&T` from a
/// borrowed [`RouteTree`](crate::core::RouteTree) lookup, or an owned `T`
/// from [`Router::dispatch`](crate::core::Router::dispatch).
#[derive(Debug, Clone)]
pub struct MatchingContext<'p, H> {
    handler: H,
    params: Params<'p>,
    matched_pattern: Arc<str>,
}

impl<'p, H> MatchingContext<'p, H> {
    pub(crate) fn new(handler: H, params: Params<'p>, matched_pattern: Arc<str>) -> Self {
        Self {
            handler,
            params,
            matched_pattern,
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn params(&self) -> &Params<'p> {
        &self.params
    }

    /// Shorthand for `params().get(name)`.
    pub fn param(&self, name: &str) -> Option<&'p str> {
        self.params.get(name)
    }

    /// The registered pattern string, for diagnostics and metrics labels.
    pub fn matched_pattern(&self) -> &str {
        &self.matched_pattern
    }

    /// Take the context apart into handler, captures and matched pattern.
    pub fn into_parts(self) -> (H, Params<'p>, Arc<str>) {
        (self.handler, self.params, self.matched_pattern)
    }

    pub fn map_handler<U>(self, f: impl FnOnce(H) -> U) -> MatchingContext<'p, U> {
        MatchingContext {
            handler: f(self.handler),
            params: self.params,
            matched_pattern: self.matched_pattern,
        }
    }
}

impl<'p, T: Clone> MatchingContext<'p, &T> {
    /// Detach the context from the tree by cloning the handler reference.
    pub fn cloned(self) -> MatchingContext<'p, T> {
        self.map_handler(T::clone)
    }
}
