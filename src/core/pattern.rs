//! Route pattern parsing.
//!
//! Patterns are slash-delimited. A segment wrapped in `{name}` captures one
//! path segment, a final `*name` segment captures the rest of the path, and
//! anything else is matched literally.
use std::{collections::HashSet, fmt, sync::Arc};

use crate::core::error::{RouteError, RouteResult};

const RESERVED_NAME_CHARS: [char; 4] = ['{', '}', '*', '/'];

/// One parsed pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    Static(String),
    Param(Arc<str>),
    Wildcard(Arc<str>),
}

impl PatternSegment {
    /// Capture name for param and wildcard segments.
    pub fn name(&self) -> Option<&str> {
        match self {
            PatternSegment::Static(_) => None,
            PatternSegment::Param(name) | PatternSegment::Wildcard(name) => Some(name),
        }
    }
}

/// A validated route pattern together with its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: Arc<str>,
    segments: Vec<PatternSegment>,
}

impl RoutePattern {
    /// Parse and validate a pattern such as `/repos/{owner}/{repo}/*rest`.
    pub fn parse(pattern: &str) -> RouteResult<Self> {
        let Some(mut rest) = split_path(pattern) else {
            return Err(RouteError::malformed(pattern, "patterns must start with '/'"));
        };

        let mut segments = Vec::new();
        let mut names = HashSet::new();

        while let Some(current) = rest {
            let (segment, tail) = split_first(current);
            rest = tail;

            let parsed = parse_segment(pattern, segment)?;
            if let PatternSegment::Wildcard(_) = parsed {
                if rest.is_some() {
                    return Err(RouteError::malformed(
                        pattern,
                        "a wildcard segment must be the last segment",
                    ));
                }
            }
            if let Some(name) = parsed.name() {
                if !names.insert(name.to_string()) {
                    return Err(RouteError::malformed(
                        pattern,
                        format!("capture name '{name}' is used more than once"),
                    ));
                }
            }
            segments.push(parsed);
        }

        Ok(Self {
            raw: Arc::from(pattern),
            segments,
        })
    }

    /// The pattern text as registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub(crate) fn shared_str(&self) -> Arc<str> {
        Arc::clone(&self.raw)
    }

    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    /// Number of segments; the root pattern `/` has none.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Drop a final empty segment, so `/users/` walks the same nodes as `/users`.
    pub(crate) fn without_trailing_slash(mut self) -> Self {
        if matches!(self.segments.last(), Some(PatternSegment::Static(s)) if s.is_empty()) {
            self.segments.pop();
        }
        self
    }

    /// Whether the pattern ends in a wildcard capture.
    pub fn has_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(PatternSegment::Wildcard(_)))
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_segment(pattern: &str, segment: &str) -> RouteResult<PatternSegment> {
    if let Some(inner) = segment.strip_prefix('{') {
        let Some(name) = inner.strip_suffix('}') else {
            return Err(RouteError::malformed(
                pattern,
                format!("unterminated parameter segment '{segment}'"),
            ));
        };
        validate_name(pattern, name, "parameter")?;
        return Ok(PatternSegment::Param(Arc::from(name)));
    }

    if let Some(name) = segment.strip_prefix('*') {
        validate_name(pattern, name, "wildcard")?;
        return Ok(PatternSegment::Wildcard(Arc::from(name)));
    }

    if segment.contains(['{', '}']) {
        return Err(RouteError::malformed(
            pattern,
            format!("braces must wrap the whole segment, got '{segment}'"),
        ));
    }

    Ok(PatternSegment::Static(segment.to_string()))
}

fn validate_name(pattern: &str, name: &str, kind: &str) -> RouteResult<()> {
    if name.is_empty() {
        return Err(RouteError::malformed(pattern, format!("{kind} name is empty")));
    }
    if name.contains(RESERVED_NAME_CHARS) {
        return Err(RouteError::malformed(
            pattern,
            format!("{kind} name '{name}' contains a reserved character"),
        ));
    }
    Ok(())
}

/// Strip the leading slash of a path.
///
/// Returns `None` when the path does not start with `/`, `Some(None)` for the
/// root path and `Some(Some(rest))` otherwise.
pub(crate) fn split_path(path: &str) -> Option<Option<&str>> {
    let rest = path.strip_prefix('/')?;
    Some(if rest.is_empty() { None } else { Some(rest) })
}

/// Split off the first segment; the tail is `None` once the path is exhausted.
#[inline]
pub(crate) fn split_first(rest: &str) -> (&str, Option<&str>) {
    match rest.find('/') {
        Some(idx) => (&rest[..idx], Some(&rest[idx + 1..])),
        None => (rest, None),
    }
}

/// Number of segments in a path, or `None` if it does not start with `/`.
pub(crate) fn count_segments(path: &str) -> Option<usize> {
    match split_path(path)? {
        None => Some(0),
        Some(rest) => Some(rest.bytes().filter(|b| *b == b'/').count() + 1),
    }
}
