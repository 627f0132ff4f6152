//! Dispatch path representation.
//!
//! # Responsibilities
//! - Hold the ordered, mutable segment sequence for one walk
//! - Normalize the empty path to `["_index"]`
//! - Derive segments from a raw request path (query string excluded)
//!
//! # Design Decisions
//! - Front-pop order: the walker always consumes from the head
//! - Segments are owned strings; handlers may replace the path wholesale
//! - Reserved segment names are constants, never magic literals

use std::collections::VecDeque;
use std::fmt;

/// Default segment substituted for an empty path.
pub const INDEX: &str = "_index";

/// Fallback key tried when a segment has no exact match.
pub const DEFAULT: &str = "_default";

/// Fallback key tried after `_default`, and the recovery target when a
/// handler raises `NotFound`.
pub const NOT_FOUND: &str = "_notfound";

/// Hook key that runs once before the first ordinary segment of a tree
/// entry.
pub const PRELUDE: &str = "_prelude";

/// Hook key that runs at most once after ordinary segments are exhausted.
pub const EPILOG: &str = "_epilog";

/// Sentinel segment that halts the current walk and hands the unconsumed
/// tail back to the enclosing subtree caller.
pub const POP: &str = "..";

/// Reserved keys that never appear as ordinary content segments.
pub const RESERVED: &[&str] = &[INDEX, DEFAULT, NOT_FOUND, PRELUDE, EPILOG];

/// Ordered sequence of path segments consumed head-first by the walker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchPath {
    segments: VecDeque<String>,
}

impl DispatchPath {
    /// Create an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a path from anything yielding string-like segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a raw request path on `/`, dropping empty segments.
    ///
    /// `"/article/42/"` becomes `["article", "42"]`; `"/"` becomes the
    /// empty path (which the walker normalizes to `["_index"]`). Query
    /// parameters are parsed elsewhere and never reach the dispatcher.
    pub fn from_request_path(raw: &str) -> Self {
        Self::from_segments(raw.split('/').filter(|s| !s.is_empty()))
    }

    /// Remove and return the head segment.
    pub fn pop_front(&mut self) -> Option<String> {
        self.segments.pop_front()
    }

    /// Look at the head segment without consuming it.
    pub fn peek(&self) -> Option<&str> {
        self.segments.front().map(String::as_str)
    }

    /// Prepend a segment (used to inject `_prelude` on tree entry).
    pub fn push_front(&mut self, segment: impl Into<String>) {
        self.segments.push_front(segment.into());
    }

    /// Append a segment.
    pub fn push_back(&mut self, segment: impl Into<String>) {
        self.segments.push_back(segment.into());
    }

    /// Drop every remaining segment.
    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// Replace this path with the empty path, returning the old contents.
    /// Used to hand the remaining segments to a nested subtree walk.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Iterate the remaining segments head-first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// True if any segment is a reserved key or the pop sentinel.
    ///
    /// The front controller rejects such paths before dispatch; reserved
    /// names are internal to tree composition and must not be reachable
    /// from the wire.
    pub fn contains_reserved(&self) -> bool {
        self.iter().any(|s| s == POP || RESERVED.contains(&s))
    }
}

impl fmt::Display for DispatchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/")?;
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for DispatchPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_segments(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_request_path_and_drops_empty_segments() {
        let path = DispatchPath::from_request_path("/article/42/");
        assert_eq!(path.iter().collect::<Vec<_>>(), vec!["article", "42"]);

        let root = DispatchPath::from_request_path("/");
        assert!(root.is_empty());

        let doubled = DispatchPath::from_request_path("//a//b");
        assert_eq!(doubled.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn pops_head_first() {
        let mut path = DispatchPath::from_segments(["a", "b"]);
        assert_eq!(path.pop_front().as_deref(), Some("a"));
        assert_eq!(path.pop_front().as_deref(), Some("b"));
        assert_eq!(path.pop_front(), None);
    }

    #[test]
    fn take_leaves_empty_path_behind() {
        let mut path = DispatchPath::from_segments(["x", "y"]);
        let taken = path.take();
        assert!(path.is_empty());
        assert_eq!(taken.len(), 2);
    }

    #[test]
    fn detects_reserved_segments() {
        assert!(DispatchPath::from_segments(["_prelude", "x"]).contains_reserved());
        assert!(DispatchPath::from_segments(["a", ".."]).contains_reserved());
        assert!(!DispatchPath::from_segments(["article", "42"]).contains_reserved());
    }

    #[test]
    fn displays_as_slash_joined() {
        let path = DispatchPath::from_segments(["admin", "articles"]);
        assert_eq!(path.to_string(), "/admin/articles");
    }
}
