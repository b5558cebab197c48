//! Router facade: registration plus dispatch over a published route tree.
//!
//! The `Router` owns a [`RouteTree`] behind an `ArcSwap`. Dispatch loads the
//! current snapshot without taking a lock and never writes shared state, so any
//! number of threads can match concurrently. Registration is serialised by a
//! writer mutex and works copy-on-write: the current tree is cloned, the clone
//! is mutated, and the finished tree is published in one store. Readers
//! therefore only ever see fully built trees, and registering after dispatch
//! has started is supported.
use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use arc_swap::ArcSwap;
use http::Method;

use crate::{
    config::RouterConfig,
    core::{
        context::MatchingContext,
        error::{MatchResult, RouteResult},
        tree::RouteTree,
    },
    ports::handler::SharedHandler,
};

/// Thread-safe HTTP router. Independent instances share nothing.
pub struct Router<T = SharedHandler> {
    tree: ArcSwap<RouteTree<T>>,
    writer: Mutex<()>,
    serving: AtomicBool,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Create an empty router with the default configuration
    /// (case-sensitive, strict trailing slash, 64 segments).
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    pub fn with_config(config: RouterConfig) -> Self {
        Self::from_tree(RouteTree::new(config))
    }

    /// Publish a tree that was built up front with `&mut` access.
    pub fn from_tree(tree: RouteTree<T>) -> Self {
        Self {
            tree: ArcSwap::from_pointee(tree),
            writer: Mutex::new(()),
            serving: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> RouterConfig {
        self.tree.load().config().clone()
    }

    /// The currently published tree.
    ///
    /// Useful for borrowed lookups via [`RouteTree::at`] that avoid cloning the
    /// handler reference; later registrations do not affect the snapshot.
    pub fn snapshot(&self) -> Arc<RouteTree<T>> {
        self.tree.load_full()
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.tree.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered routes as `(method, pattern)` pairs.
    pub fn routes(&self) -> Vec<(Method, String)> {
        self.tree
            .load()
            .routes()
            .into_iter()
            .map(|(method, pattern, _)| (method.clone(), pattern.to_string()))
            .collect()
    }

    /// Methods that would resolve `path`, e.g. for an `OPTIONS` response.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        self.tree.load().allowed_methods(path)
    }
}

impl<T: Clone> Router<T> {
    /// Register `handler` for `method` on `pattern`.
    ///
    /// Fails with `DuplicateRoute` if the pair is already registered,
    /// `RouteConflict` if the pattern clashes with an existing capture name,
    /// and `MalformedPattern` if the pattern does not parse. A failed call
    /// leaves the router unchanged.
    ///
    /// Every call clones the published tree, so registering many routes one at
    /// a time is quadratic. Start-up tables belong in [`Router::handle_all`],
    /// which publishes once, or in a [`RouteTree`] handed to
    /// [`Router::from_tree`].
    pub fn handle(&self, method: Method, pattern: &str, handler: T) -> RouteResult<()> {
        self.update(|tree| tree.insert(method.clone(), pattern, handler))?;
        self.log_registration(&method, pattern);
        Ok(())
    }

    pub fn handle_get(&self, pattern: &str, handler: T) -> RouteResult<()> {
        self.handle(Method::GET, pattern, handler)
    }

    pub fn handle_post(&self, pattern: &str, handler: T) -> RouteResult<()> {
        self.handle(Method::POST, pattern, handler)
    }

    pub fn handle_patch(&self, pattern: &str, handler: T) -> RouteResult<()> {
        self.handle(Method::PATCH, pattern, handler)
    }

    pub fn handle_put(&self, pattern: &str, handler: T) -> RouteResult<()> {
        self.handle(Method::PUT, pattern, handler)
    }

    pub fn handle_delete(&self, pattern: &str, handler: T) -> RouteResult<()> {
        self.handle(Method::DELETE, pattern, handler)
    }

    /// Register a batch of routes in one publication.
    ///
    /// Either every route is registered or, on the first error, none are.
    pub fn handle_all<P, I>(&self, routes: I) -> RouteResult<()>
    where
        P: AsRef<str>,
        I: IntoIterator<Item = (Method, P, T)>,
    {
        let mut registered = Vec::new();
        self.update(|tree| {
            for (method, pattern, handler) in routes {
                tree.insert(method.clone(), pattern.as_ref(), handler)?;
                registered.push((method, pattern.as_ref().to_string()));
            }
            Ok(())
        })?;
        for (method, pattern) in &registered {
            self.log_registration(method, pattern);
        }
        Ok(())
    }

    /// Resolve a request to its handler and path parameters.
    ///
    /// Returns a fresh context per call; captured values borrow from `path`.
    /// The handler is cloned out of the published tree, which for `Arc`
    /// handlers is a refcount increment. `snapshot().at(..)` borrows it instead.
    pub fn dispatch<'p>(&self, method: &Method, path: &'p str) -> MatchResult<MatchingContext<'p, T>> {
        if !self.serving.load(Ordering::Relaxed) {
            self.serving.store(true, Ordering::Relaxed);
        }
        let tree = self.tree.load();
        let result = tree.at(method, path).map(|ctx| ctx.cloned());
        if let Err(miss) = &result {
            tracing::trace!(http.method = %method, http.path = path, %miss, "dispatch miss");
        }
        result
    }

    fn update<F>(&self, mutate: F) -> RouteResult<()>
    where
        F: FnOnce(&mut RouteTree<T>) -> RouteResult<()>,
    {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = RouteTree::clone(&self.tree.load());
        mutate(&mut next)?;
        self.tree.store(Arc::new(next));
        Ok(())
    }

    fn log_registration(&self, method: &Method, pattern: &str) {
        if self.serving.load(Ordering::Relaxed) {
            tracing::info!(http.method = %method, pattern, "route registered after dispatch started");
        } else {
            tracing::debug!(http.method = %method, pattern, "route registered");
        }
    }
}
