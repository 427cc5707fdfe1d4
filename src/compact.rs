//! The public error model and the compaction pass that produces it.
//!
//! Compaction is a top-down collapse of the engine's `Outcome` tree:
//!
//! - a valid node becomes `None`, whatever its children look like;
//! - an invalid leaf becomes a [`FieldError`] or [`FormError`] by origin;
//! - an invalid array/object expands into its children, each compacted on
//!   its own (so valid siblings show up as `None`).
use std::fmt;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;
use crate::engine::{Origin, Outcome};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Result of [`validate`](crate::validate).
///
/// Serializes as `{"isValid": bool, "errors": <tree or null>}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub is_valid: bool,
    pub errors: Option<ErrorTree>,
}

/// A field's own rules rejected the value (or a required field was absent).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid field: {}", Reasons(.reasons))]
pub struct FieldError {
    /// Failure reasons in rule order.
    pub reasons: Vec<Value>,
    /// The rejected value; `None` when it was absent.
    pub data: Option<Value>,
}

/// A nested form failed as a whole: it was required but absent, or the data
/// had the wrong shape (array vs. object vs. primitive).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid form: {}", Reasons(.reasons))]
pub struct FormError {
    pub reasons: Vec<Value>,
    pub data: Option<Value>,
}

/// Compacted error tree. Positions holding `None` are valid.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorTree {
    Field(FieldError),
    Form(FormError),
    Array(Vec<Option<ErrorTree>>),
    Object(IndexMap<String, Option<ErrorTree>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Field,
    Form,
}

/// One leaf failure of an [`ErrorTree`], located by JSON Pointer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure<'a> {
    pub pointer: String,
    pub kind: ErrorKind,
    pub reasons: &'a [Value],
    pub data: Option<&'a Value>,
}

struct Reasons<'a>(&'a [Value]);

// ————————————————————————————————————————————————————————————————————————————
// COMPACTION
// ————————————————————————————————————————————————————————————————————————————

pub(crate) fn compact(outcome: Outcome<'_>) -> Option<ErrorTree> {
    if outcome.is_valid() {
        return None;
    }
    let tree = match outcome {
        Outcome::Leaf { origin: Origin::Field, reasons, data, .. } => {
            ErrorTree::Field(FieldError { reasons, data: data.cloned() })
        }
        Outcome::Leaf { origin: Origin::Form, reasons, data, .. } => {
            ErrorTree::Form(FormError { reasons, data: data.cloned() })
        }
        Outcome::Array { items, .. } => {
            ErrorTree::Array(items.into_iter().map(compact).collect())
        }
        Outcome::Object { entries, .. } => ErrorTree::Object(
            entries
                .into_iter()
                .map(|(key, outcome)| (key, compact(outcome)))
                .collect(),
        ),
    };
    Some(tree)
}

// ————————————————————————————————————————————————————————————————————————————
// NAVIGATION
// ————————————————————————————————————————————————————————————————————————————

impl ErrorTree {
    pub fn as_field(&self) -> Option<&FieldError> {
        match self {
            ErrorTree::Field(error) => Some(error),
            _ => None,
        }
    }

    pub fn as_form(&self) -> Option<&FormError> {
        match self {
            ErrorTree::Form(error) => Some(error),
            _ => None,
        }
    }

    /// Reasons of a leaf error; `None` for composite positions.
    pub fn reasons(&self) -> Option<&[Value]> {
        match self {
            ErrorTree::Field(error) => Some(&error.reasons),
            ErrorTree::Form(error) => Some(&error.reasons),
            ErrorTree::Array(_) | ErrorTree::Object(_) => None,
        }
    }

    /// Child position by object key or array index.
    ///
    /// The outer `Option` tells whether the position exists at all; the
    /// inner one is `None` when the position is valid.
    pub fn get(&self, key: &str) -> Option<Option<&ErrorTree>> {
        match self {
            ErrorTree::Object(entries) => entries.get(key).map(Option::as_ref),
            ErrorTree::Array(items) => key
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index))
                .map(Option::as_ref),
            ErrorTree::Field(_) | ErrorTree::Form(_) => None,
        }
    }

    /// Error at an RFC 6901 JSON Pointer, or `None` if the position is
    /// valid or does not exist.
    pub fn pointer(&self, pointer: &str) -> Option<&ErrorTree> {
        if pointer.is_empty() {
            return Some(self);
        }
        let mut node = self;
        for raw in pointer.strip_prefix('/')?.split('/') {
            let key = raw.replace("~1", "/").replace("~0", "~");
            node = node.get(&key)??;
        }
        Some(node)
    }

    /// Every leaf failure, depth first, in data order.
    pub fn failures(&self) -> Vec<Failure<'_>> {
        let mut out = Vec::new();
        collect_failures(self, &mut String::new(), &mut out);
        out
    }
}

fn collect_failures<'a>(tree: &'a ErrorTree, pointer: &mut String, out: &mut Vec<Failure<'a>>) {
    let mark = pointer.len();
    match tree {
        ErrorTree::Field(error) => out.push(Failure {
            pointer: pointer.clone(),
            kind: ErrorKind::Field,
            reasons: &error.reasons,
            data: error.data.as_ref(),
        }),
        ErrorTree::Form(error) => out.push(Failure {
            pointer: pointer.clone(),
            kind: ErrorKind::Form,
            reasons: &error.reasons,
            data: error.data.as_ref(),
        }),
        ErrorTree::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                if let Some(item) = item {
                    pointer.push_str(&format!("/{index}"));
                    collect_failures(item, pointer, out);
                    pointer.truncate(mark);
                }
            }
        }
        ErrorTree::Object(entries) => {
            for (key, entry) in entries {
                if let Some(entry) = entry {
                    pointer.push('/');
                    pointer.push_str(&key.replace('~', "~0").replace('/', "~1"));
                    collect_failures(entry, pointer, out);
                    pointer.truncate(mark);
                }
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// SERIALIZATION
// ————————————————————————————————————————————————————————————————————————————

#[derive(Serialize)]
struct LeafRepr<'a> {
    error: ErrorKind,
    reasons: &'a [Value],
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Value>,
}

impl Serialize for ErrorTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ErrorTree::Field(error) => LeafRepr {
                error: ErrorKind::Field,
                reasons: &error.reasons,
                data: error.data.as_ref(),
            }
            .serialize(serializer),
            ErrorTree::Form(error) => LeafRepr {
                error: ErrorKind::Form,
                reasons: &error.reasons,
                data: error.data.as_ref(),
            }
            .serialize(serializer),
            ErrorTree::Array(items) => items.serialize(serializer),
            ErrorTree::Object(entries) => entries.serialize(serializer),
        }
    }
}

impl fmt::Display for Reasons<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, reason) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            match reason {
                Value::String(s) => f.write_str(s)?,
                other => write!(f, "{other}")?,
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_leaf<'v>(is_valid: bool, reasons: &[&str], data: Option<&'v Value>) -> Outcome<'v> {
        Outcome::Leaf {
            origin: Origin::Field,
            is_valid,
            reasons: reasons.iter().map(|r| json!(r)).collect(),
            data,
        }
    }

    #[test]
    fn valid_composite_collapses_to_none() {
        let one = json!(1);
        let outcome = Outcome::Object {
            is_valid: true,
            entries: IndexMap::from([
                ("a".to_string(), field_leaf(true, &[], Some(&one))),
                ("b".to_string(), Outcome::Array {
                    is_valid: true,
                    items: vec![field_leaf(true, &[], Some(&one))],
                }),
            ]),
        };
        assert_eq!(compact(outcome), None);
    }

    #[test]
    fn invalid_composite_keeps_valid_siblings_as_none() {
        let good = json!(1);
        let bad = json!("x");
        let outcome = Outcome::Array {
            is_valid: false,
            items: vec![
                field_leaf(true, &[], Some(&good)),
                field_leaf(false, &["not a number"], Some(&bad)),
            ],
        };
        let tree = compact(outcome).unwrap();
        assert_eq!(
            tree,
            ErrorTree::Array(vec![
                None,
                Some(ErrorTree::Field(FieldError {
                    reasons: vec![json!("not a number")],
                    data: Some(json!("x")),
                })),
            ])
        );
    }

    #[test]
    fn leaf_origin_selects_error_kind() {
        let data = json!([]);
        let outcome = Outcome::Leaf {
            origin: Origin::Form,
            is_valid: false,
            reasons: vec![json!("Expected an object but got a array.")],
            data: Some(&data),
        };
        let tree = compact(outcome).unwrap();
        let form = tree.as_form().expect("form error");
        assert_eq!(form.data, Some(json!([])));
        assert!(tree.as_field().is_none());
        assert_eq!(form.to_string(), "invalid form: Expected an object but got a array.");
    }

    #[test]
    fn serializes_like_the_public_contract() {
        let tree = ErrorTree::Object(IndexMap::from([
            ("id".to_string(), None),
            ("age".to_string(), Some(ErrorTree::Field(FieldError {
                reasons: vec![json!("not a number")],
                data: Some(json!("x")),
            }))),
            ("address".to_string(), Some(ErrorTree::Form(FormError {
                reasons: vec![json!("The form is required.")],
                data: None,
            }))),
        ]));
        let validation = Validation { is_valid: false, errors: Some(tree) };
        assert_eq!(
            serde_json::to_value(&validation).unwrap(),
            json!({
                "isValid": false,
                "errors": {
                    "id": null,
                    "age": {"error": "field", "reasons": ["not a number"], "data": "x"},
                    "address": {"error": "form", "reasons": ["The form is required."]}
                }
            })
        );
    }

    #[test]
    fn pointer_and_failures_walk_the_tree() {
        let tree = ErrorTree::Object(IndexMap::from([
            ("ok".to_string(), None),
            ("a/b".to_string(), Some(ErrorTree::Array(vec![
                None,
                Some(ErrorTree::Field(FieldError { reasons: vec![json!("bad")], data: Some(json!(2)) })),
            ]))),
        ]));
        assert!(tree.pointer("/ok").is_none());
        assert!(tree.pointer("/missing").is_none());
        assert_eq!(tree.pointer("/a~1b/1").and_then(ErrorTree::reasons), Some(&[json!("bad")][..]));
        assert_eq!(tree.get("ok"), Some(None));

        let failures = tree.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].pointer, "/a~1b/1");
        assert_eq!(failures[0].kind, ErrorKind::Field);
        assert_eq!(failures[0].data, Some(&json!(2)));
    }
}
