//! Error taxonomy for registration and dispatch.
//!
//! Registration failures ([`RouteError`]) are returned to the caller of
//! `Router::handle*` and are fatal only to that call. Dispatch misses
//! ([`MatchError`]) are ordinary return values that callers map onto
//! 404 / 405 / 308 / 414 style responses.
use std::fmt;

use http::Method;
use thiserror::Error;

/// Errors raised while registering a route.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RouteError {
    /// The pattern is ambiguous against routes already in the tree.
    #[error("Route conflict for '{pattern}': {message}")]
    RouteConflict { pattern: String, message: String },

    /// The same (method, pattern) pair is already mapped to a handler.
    #[error("Duplicate route: {method} {pattern}")]
    DuplicateRoute { method: Method, pattern: String },

    /// The pattern string itself cannot be parsed.
    #[error("Malformed pattern '{pattern}': {reason}")]
    MalformedPattern { pattern: String, reason: String },
}

impl RouteError {
    pub(crate) fn conflict(pattern: &str, message: impl Into<String>) -> Self {
        RouteError::RouteConflict {
            pattern: pattern.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn malformed(pattern: &str, reason: impl Into<String>) -> Self {
        RouteError::MalformedPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for registration operations
pub type RouteResult<T> = Result<T, RouteError>;

/// A classified dispatch miss.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MatchError {
    /// No route matches the path under any method.
    #[error("No route matches the requested path")]
    NotFound,

    /// The path is routable, but not with the requested method.
    #[error("Method not allowed; allowed: {}", AllowList(.allowed))]
    MethodNotAllowed { allowed: Vec<Method> },

    /// The path only matches once its trailing slash is added or removed.
    #[error("Trailing slash mismatch; redirect to {location}")]
    TrailingSlashRedirect { location: String },

    /// The path has more segments than the router accepts.
    #[error("Path exceeds the limit of {limit} segments")]
    TooManySegments { limit: usize },
}

impl MatchError {
    /// Render the allowed methods as an `Allow` header value, if this is a 405.
    pub fn allow_header(&self) -> Option<String> {
        match self {
            MatchError::MethodNotAllowed { allowed } => Some(AllowList(allowed).to_string()),
            _ => None,
        }
    }
}

/// Result type for dispatch operations
pub type MatchResult<T> = Result<T, MatchError>;

struct AllowList<'a>(&'a [Method]);

impl fmt::Display for AllowList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, method) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(method.as_str())?;
        }
        Ok(())
    }
}
