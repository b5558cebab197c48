//! The route tree: registration and matching.
//!
//! One tree is shared by all methods; handlers hang off the node that ends a
//! registered pattern, keyed by method. Matching is a recursive descent that
//! tries, at every position, the static child, then the param child, then the
//! wildcard child, backtracking out of any branch that dead-ends. Lookups take
//! `&self` and never write, so a built tree can be shared freely between
//! threads.
use std::{fmt, sync::Arc};

use http::Method;

use crate::{
    config::{RouterConfig, TrailingSlashPolicy},
    core::{
        context::{MatchingContext, Params},
        error::{MatchError, MatchResult, RouteError, RouteResult},
        node::{Endpoint, Node},
        pattern::{PatternSegment, RoutePattern, count_segments, split_first, split_path},
    },
};

/// A trie of path segments with per-method handlers.
#[derive(Clone)]
pub struct RouteTree<T> {
    root: Node<T>,
    config: RouterConfig,
    len: usize,
}

impl<T> Default for RouteTree<T> {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

impl<T> RouteTree<T> {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            root: Node::root(),
            config,
            len: 0,
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Number of registered (method, pattern) routes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Register `handler` for `method` on `pattern`.
    ///
    /// The tree is left untouched when an error is returned.
    pub fn insert(&mut self, method: Method, pattern: &str, handler: T) -> RouteResult<()> {
        let parsed = self.parse(pattern)?;
        self.check_insert(&method, &parsed)?;

        let fold = !self.config.case_sensitive;
        let mut node = &mut self.root;
        for segment in parsed.segments() {
            node = match segment {
                PatternSegment::Static(literal) => node.static_child_mut(literal, fold),
                PatternSegment::Param(name) => node.param_child_mut(name),
                PatternSegment::Wildcard(name) => node.wildcard_child_mut(name),
            };
        }
        node.endpoints.push(Endpoint {
            method,
            pattern: parsed.shared_str(),
            handler,
        });
        self.len += 1;
        Ok(())
    }

    /// Resolve `method` and `path` to a handler and its captures.
    pub fn at<'t, 'p>(
        &'t self,
        method: &Method,
        path: &'p str,
    ) -> MatchResult<MatchingContext<'p, &'t T>> {
        let path = self.normalize_path(path);
        let miss = match self.check_path_len(path) {
            Ok(()) => match self.lookup(method, path) {
                Ok(ctx) => return Ok(ctx),
                Err(miss) => miss,
            },
            // a trailing slash may push a path just over the limit
            Err(too_many) => too_many,
        };

        match self.redirect_target(method, path) {
            Some(location) => Err(MatchError::TrailingSlashRedirect { location }),
            None => Err(miss),
        }
    }

    /// The path with its trailing slash toggled, if that path resolves for
    /// `method` under the redirect policy.
    fn redirect_target(&self, method: &Method, path: &str) -> Option<String> {
        if self.config.trailing_slash != TrailingSlashPolicy::Redirect {
            return None;
        }
        let location = toggle_trailing_slash(path)?;
        if self.check_path_len(&location).is_err() {
            return None;
        }
        let resolves = self.lookup(method, &location).is_ok();
        resolves.then_some(location)
    }

    /// Every method that would resolve `path`, in precedence order.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let path = self.normalize_path(path);
        if self.check_path_len(path).is_err() {
            return Vec::new();
        }
        let Some(rest) = split_path(path) else {
            return Vec::new();
        };
        let mut search = Search::new(None, !self.config.case_sensitive);
        search.descend(&self.root, rest);
        search.allowed
    }

    /// All registered routes as (method, pattern, handler), depth-first with
    /// static children before the param child before the wildcard child.
    pub fn routes(&self) -> Vec<(&Method, &str, &T)> {
        let mut out = Vec::with_capacity(self.len);
        collect_routes(&self.root, &mut out);
        out
    }

    fn lookup<'t, 'p>(
        &'t self,
        method: &Method,
        path: &'p str,
    ) -> MatchResult<MatchingContext<'p, &'t T>> {
        let Some(rest) = split_path(path) else {
            return Err(MatchError::NotFound);
        };

        let mut search = Search::new(Some(method), !self.config.case_sensitive);
        match search.descend(&self.root, rest) {
            Some(endpoint) => Ok(MatchingContext::new(
                &endpoint.handler,
                search.params,
                Arc::clone(&endpoint.pattern),
            )),
            None if search.allowed.is_empty() => Err(MatchError::NotFound),
            None => Err(MatchError::MethodNotAllowed {
                allowed: search.allowed,
            }),
        }
    }

    fn parse(&self, pattern: &str) -> RouteResult<RoutePattern> {
        let mut parsed = RoutePattern::parse(pattern)?;
        if self.config.trailing_slash == TrailingSlashPolicy::Ignore {
            parsed = parsed.without_trailing_slash();
        }
        if parsed.len() > self.config.max_path_segments {
            return Err(RouteError::malformed(
                pattern,
                format!(
                    "{} segments exceed the limit of {}",
                    parsed.len(),
                    self.config.max_path_segments
                ),
            ));
        }
        Ok(parsed)
    }

    /// Walk the existing tree along `parsed` without mutating it, reporting any
    /// conflict or duplicate that inserting it would cause.
    fn check_insert(&self, method: &Method, parsed: &RoutePattern) -> RouteResult<()> {
        let fold = !self.config.case_sensitive;
        let mut node = &self.root;
        for segment in parsed.segments() {
            let next = match segment {
                PatternSegment::Static(literal) => node.find_static(literal, fold),
                PatternSegment::Param(name) => {
                    check_capture_name(node.param.as_deref(), name, parsed, "parameter")?
                }
                PatternSegment::Wildcard(name) => {
                    check_capture_name(node.wildcard.as_deref(), name, parsed, "wildcard")?
                }
            };
            match next {
                Some(child) => node = child,
                // the rest of the path is new, nothing below can clash
                None => return Ok(()),
            }
        }

        if node.endpoint(method).is_some() {
            return Err(RouteError::DuplicateRoute {
                method: method.clone(),
                pattern: parsed.as_str().to_string(),
            });
        }
        Ok(())
    }

    fn normalize_path<'p>(&self, path: &'p str) -> &'p str {
        if self.config.trailing_slash == TrailingSlashPolicy::Ignore && path.len() > 1 {
            path.strip_suffix('/').unwrap_or(path)
        } else {
            path
        }
    }

    fn check_path_len(&self, path: &str) -> MatchResult<()> {
        match count_segments(path) {
            Some(n) if n > self.config.max_path_segments => Err(MatchError::TooManySegments {
                limit: self.config.max_path_segments,
            }),
            _ => Ok(()),
        }
    }
}

impl<T> fmt::Debug for RouteTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes: Vec<_> = self
            .routes()
            .into_iter()
            .map(|(method, pattern, _)| format!("{method} {pattern}"))
            .collect();
        f.debug_struct("RouteTree")
            .field("config", &self.config)
            .field("routes", &routes)
            .finish()
    }
}

fn check_capture_name<'n, T>(
    existing: Option<&'n Node<T>>,
    name: &Arc<str>,
    parsed: &RoutePattern,
    kind: &str,
) -> RouteResult<Option<&'n Node<T>>> {
    match existing {
        Some(child) => match child.capture_name() {
            Some(current) if current == name => Ok(Some(child)),
            current => Err(RouteError::conflict(
                parsed.as_str(),
                format!(
                    "{kind} '{name}' clashes with '{}' already registered at the same position",
                    current.map(|c| &**c).unwrap_or_default()
                ),
            )),
        },
        None => Ok(None),
    }
}

/// State for one traversal. `method` is `None` when only collecting the
/// methods that could serve a path.
struct Search<'m, 'p> {
    method: Option<&'m Method>,
    fold: bool,
    params: Params<'p>,
    allowed: Vec<Method>,
}

impl<'m, 'p> Search<'m, 'p> {
    fn new(method: Option<&'m Method>, fold: bool) -> Self {
        Self {
            method,
            fold,
            params: Params::new(),
            allowed: Vec::new(),
        }
    }

    fn descend<'t, T>(&mut self, node: &'t Node<T>, rest: Option<&'p str>) -> Option<&'t Endpoint<T>> {
        let Some(rest) = rest else {
            return self.terminal(node);
        };
        let (segment, tail) = split_first(rest);

        if let Some(child) = node.find_static(segment, self.fold) {
            if let Some(endpoint) = self.descend(child, tail) {
                return Some(endpoint);
            }
        }

        if !segment.is_empty() {
            if let Some(child) = node.param.as_deref() {
                let mark = self.params.len();
                if let Some(name) = child.capture_name() {
                    self.params.push(name, segment);
                }
                if let Some(endpoint) = self.descend(child, tail) {
                    return Some(endpoint);
                }
                self.params.truncate(mark);
            }
        }

        if !rest.is_empty() {
            if let Some(child) = node.wildcard.as_deref() {
                let mark = self.params.len();
                if let Some(name) = child.capture_name() {
                    self.params.push(name, rest);
                }
                if let Some(endpoint) = self.terminal(child) {
                    return Some(endpoint);
                }
                self.params.truncate(mark);
            }
        }

        None
    }

    /// The path ends at `node`: take its handler for the method, or remember
    /// which methods it does serve.
    fn terminal<'t, T>(&mut self, node: &'t Node<T>) -> Option<&'t Endpoint<T>> {
        if let Some(endpoint) = self.method.and_then(|method| node.endpoint(method)) {
            return Some(endpoint);
        }
        if node.has_endpoints() {
            for endpoint in &node.endpoints {
                if !self.allowed.contains(&endpoint.method) {
                    self.allowed.push(endpoint.method.clone());
                }
            }
        }
        None
    }
}

fn collect_routes<'t, T>(node: &'t Node<T>, out: &mut Vec<(&'t Method, &'t str, &'t T)>) {
    for endpoint in &node.endpoints {
        out.push((&endpoint.method, &*endpoint.pattern, &endpoint.handler));
    }
    for child in &node.statics {
        collect_routes(child, out);
    }
    if let Some(child) = node.param.as_deref() {
        collect_routes(child, out);
    }
    if let Some(child) = node.wildcard.as_deref() {
        collect_routes(child, out);
    }
}

/// The same path with one trailing slash added or removed; `None` for the root.
fn toggle_trailing_slash(path: &str) -> Option<String> {
    if path.len() <= 1 {
        return None;
    }
    Some(match path.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => format!("{path}/"),
    })
}
