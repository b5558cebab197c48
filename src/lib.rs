//! Waypoint - a trie-based HTTP request router.
//!
//! Waypoint resolves an already parsed `(method, path)` pair to a registered
//! handler and the named parameters captured from the path. It does no I/O:
//! transports hand it a method and a path, and get back a handler reference
//! plus bindings, or a classified miss.
//!
//! # Features
//! - Static segments, `{name}` single-segment captures and trailing `*name` wildcards
//! - Deterministic precedence: static, then param, then wildcard, with backtracking
//! - `405 Method Not Allowed` detection with the list of allowed methods
//! - Case-insensitive matching and strict / redirect / ignore trailing-slash policies
//! - Lock-free concurrent dispatch with copy-on-write route registration
//! - Route tables loadable from TOML / YAML / JSON and a `waypoint` CLI
//!
//! # Quick Example
//! ```
//! use waypoint::{Router, core::MatchError};
//!
//! let router: Router<&str> = Router::new();
//! router.handle_get("/users/me", "current_user").unwrap();
//! router.handle_get("/users/{id}", "user_by_id").unwrap();
//!
//! let ctx = router.dispatch(&http::Method::GET, "/users/42").unwrap();
//! assert_eq!(*ctx.handler(), "user_by_id");
//! assert_eq!(ctx.param("id"), Some("42"));
//!
//! assert!(matches!(
//!     router.dispatch(&http::Method::POST, "/users/42"),
//!     Err(MatchError::MethodNotAllowed { .. })
//! ));
//! ```
//!
//! # Architecture
//! Matching logic lives in `core`, the handler capability is a trait in
//! `ports`, and `adapters` holds the glue that runs whole `http::Request`s
//! through a router. End users should prefer the re‑exports below.
//!
//! # Error Handling
//! Registration returns [`RouteError`], dispatch returns [`MatchError`];
//! neither panics on bad input. Application-level APIs (config loading, CLI)
//! return `eyre::Result<T>` with context attached.
//!
//! # Concurrency
//! A [`Router`] publishes immutable route trees through `arc_swap`. Dispatch
//! never locks and never writes shared state; registrations are serialised and
//! swap in a fully built tree.
pub mod config;
pub mod ports;
pub mod tracing_setup;

pub mod adapters;
pub mod core;

// Re-export the specific types needed by the binary crate
pub use crate::{
    adapters::HttpDispatcher,
    config::{RouterConfig, TrailingSlashPolicy},
    core::{MatchError, MatchingContext, Params, RouteError, RouteTree, Router},
    ports::handler::{Handler, SharedHandler, handler_fn},
};
