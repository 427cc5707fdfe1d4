//! Ancestor and key-path context threaded through the engine.
//!
//! A [`Scope`] is a borrowed, stack-allocated linked list: each composite
//! level pushes one link (the enclosing value plus the key or index used to
//! step into it) and hands the extended scope down. Both views are read
//! nearest-first, which is the order validators receive them in.
use std::fmt;
use serde_json::Value;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// One step of a key path: an object key or an array index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

/// Position of the value currently being validated.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scope<'a> {
    link: Option<&'a Link<'a>>,
    depth: usize,
}

#[derive(Debug)]
pub(crate) struct Link<'a> {
    parent: Scope<'a>,
    ancestor: &'a Value,
    segment: Segment<'a>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl<'a> Link<'a> {
    pub(crate) fn new(parent: Scope<'a>, ancestor: &'a Value, segment: Segment<'a>) -> Self {
        Self { parent, ancestor, segment }
    }
}

impl<'a> Scope<'a> {
    /// The empty scope: no ancestors, empty key path.
    pub fn root() -> Self {
        Self { link: None, depth: 0 }
    }

    pub(crate) fn nested(link: &'a Link<'a>) -> Self {
        Self { link: Some(link), depth: link.parent.depth + 1 }
    }

    pub fn is_root(self) -> bool {
        self.link.is_none()
    }

    /// Number of composite levels between the root and this position.
    pub fn depth(self) -> usize {
        self.depth
    }

    /// Enclosing composite values, nearest first.
    pub fn ancestors(self) -> impl Iterator<Item = &'a Value> {
        self.links().map(|link| link.ancestor)
    }

    /// Keys and indices used to reach this position, nearest first.
    pub fn key_path(self) -> impl Iterator<Item = Segment<'a>> {
        self.links().map(|link| link.segment)
    }

    /// The nearest enclosing value (the object or array holding this one).
    pub fn parent(self) -> Option<&'a Value> {
        self.link.map(|link| link.ancestor)
    }

    /// The key or index of this position inside its parent.
    pub fn key(self) -> Option<Segment<'a>> {
        self.link.map(|link| link.segment)
    }

    /// RFC 6901 JSON Pointer of this position, root first (`""` at the root).
    pub fn pointer(self) -> String {
        let mut segments = self.key_path().collect::<Vec<_>>();
        segments.reverse();
        let mut out = String::new();
        for segment in segments {
            out.push('/');
            out.push_str(&segment.escaped());
        }
        out
    }

    fn links(self) -> impl Iterator<Item = &'a Link<'a>> {
        std::iter::successors(self.link, |link| link.parent.link)
    }
}

impl Segment<'_> {
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(key) => Some(key),
            Segment::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Key(_) => None,
            Segment::Index(index) => Some(*index),
        }
    }

    /// Pointer-escaped form (`~` → `~0`, `/` → `~1`).
    pub fn escaped(&self) -> String {
        match self {
            Segment::Key(key) => key.replace('~', "~0").replace('/', "~1"),
            Segment::Index(index) => index.to_string(),
        }
    }
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{key}"),
            Segment::Index(index) => write!(f, "{index}"),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn root_scope_is_empty() {
        let scope = Scope::root();
        assert!(scope.is_root());
        assert_eq!(scope.depth(), 0);
        assert_eq!(scope.ancestors().count(), 0);
        assert_eq!(scope.key_path().count(), 0);
        assert_eq!(scope.pointer(), "");
        assert!(scope.parent().is_none());
    }

    #[test]
    fn nested_scope_reads_nearest_first() {
        let outer = json!({"a": {"b/c": [1, 2]}});
        let inner = &outer["a"];
        let list = &inner["b/c"];

        let l1 = Link::new(Scope::root(), &outer, Segment::Key("a"));
        let s1 = Scope::nested(&l1);
        let l2 = Link::new(s1, inner, Segment::Key("b/c"));
        let s2 = Scope::nested(&l2);
        let l3 = Link::new(s2, list, Segment::Index(1));
        let s3 = Scope::nested(&l3);

        assert_eq!(s3.depth(), 3);
        assert_eq!(s3.ancestors().collect::<Vec<_>>(), vec![list, inner, &outer]);
        assert_eq!(
            s3.key_path().collect::<Vec<_>>(),
            vec![Segment::Index(1), Segment::Key("b/c"), Segment::Key("a")]
        );
        assert_eq!(s3.parent(), Some(list));
        assert_eq!(s3.key().and_then(|s| s.as_index()), Some(1));
        assert_eq!(s3.pointer(), "/a/b~1c/1");
    }
}
