//! Configuration data structures for Waypoint.
//!
//! These types map directly to TOML (also JSON / YAML) configuration files. They are
//! serde‑friendly and carry defaults so a minimal route table stays concise.
//! Builders and enums here are part of the public API for embedding.
use serde::{Deserialize, Serialize};

fn default_case_sensitive() -> bool {
    true
}

fn default_max_path_segments() -> usize {
    RouterConfig::DEFAULT_MAX_PATH_SEGMENTS
}

/// How a single trailing slash on a request path is treated.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrailingSlashPolicy {
    /// `/users` and `/users/` are different paths.
    #[default]
    Strict,
    /// A miss that would match with the slash toggled is reported as a redirect.
    Redirect,
    /// One trailing slash is dropped from both patterns and request paths.
    Ignore,
}

/// Knobs for the matching algorithm.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Match static segments byte-for-byte (`true`) or ASCII case-insensitively.
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,
    #[serde(default)]
    pub trailing_slash: TrailingSlashPolicy,
    /// Upper bound on segments in a pattern or request path.
    #[serde(default = "default_max_path_segments")]
    pub max_path_segments: usize,
}

impl RouterConfig {
    pub const DEFAULT_MAX_PATH_SEGMENTS: usize = 64;

    /// Create a new router configuration builder
    pub fn builder() -> RouterConfigBuilder {
        RouterConfigBuilder::default()
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            trailing_slash: TrailingSlashPolicy::Strict,
            max_path_segments: Self::DEFAULT_MAX_PATH_SEGMENTS,
        }
    }
}

/// Builder for RouterConfig
#[derive(Default)]
pub struct RouterConfigBuilder {
    config: RouterConfig,
}

impl RouterConfigBuilder {
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.config.case_sensitive = case_sensitive;
        self
    }

    pub fn trailing_slash(mut self, policy: TrailingSlashPolicy) -> Self {
        self.config.trailing_slash = policy;
        self
    }

    pub fn max_path_segments(mut self, limit: usize) -> Self {
        self.config.max_path_segments = limit;
        self
    }

    pub fn build(self) -> RouterConfig {
        self.config
    }
}

/// One route in a route table file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// HTTP method, e.g. "GET".
    pub method: String,
    pub pattern: String,
    /// Name of the handler the route resolves to.
    pub handler: String,
}

impl RouteEntry {
    pub fn new(
        method: impl Into<String>,
        pattern: impl Into<String>,
        handler: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            pattern: pattern.into(),
            handler: handler.into(),
        }
    }
}

/// A route table as loaded by the CLI: router options plus named routes.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct RouteTableConfig {
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}
