//! Fatal errors: schema-authoring bugs and unusable schema documents.
//!
//! Bad *data* never ends up here; it is reported through the error tree of a
//! [`Validation`](crate::Validation).
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("form at `{pointer}` refers to undefined schema `{name}`")]
    UnresolvedReference { name: String, pointer: String },
    #[error("more than {limit} forms resolved in a row at `{pointer}` (a form that resolves to itself?)")]
    DepthExceeded { limit: usize, pointer: String },
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid schema document at JSON path {path}: {message}")]
    Malformed { path: String, message: String },
    #[error("`{at}` refers to undefined schema `{name}`")]
    UnknownReference { name: String, at: String },
    #[error("invalid rule at `{at}`: {message}")]
    InvalidRule { at: String, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A stock rule could not be built from its parameters.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("invalid date format `{0}`")]
    DateFormat(String),
}
