pub mod context;
pub mod error;
pub mod node;
pub mod pattern;
pub mod router;
pub mod tree;

pub use context::{MatchingContext, Params};
pub use error::{MatchError, MatchResult, RouteError, RouteResult};
pub use node::{Endpoint, SegmentKind};
pub use pattern::{PatternSegment, RoutePattern};
pub use router::Router;
pub use tree::RouteTree;
