//! Recursive, schema-driven validation of JSON-shaped data.
//!
//! A schema is a tree of four node kinds: [`Field`] leaves carrying rules,
//! [`Form`] branches wrapping a reusable sub-schema, homogeneous arrays, and
//! objects (declared keys, or a wildcard over every key). [`validate`] walks
//! the schema and the data in lockstep and returns a [`Validation`] whose
//! error tree mirrors the data: `None` wherever things are fine, a
//! [`FieldError`] or [`FormError`] where they are not.
//!
//! ```
//! use form_shape::{field, form, rules, validate, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::object([
//!     ("name", field().validators([rules::is_string()]).required().into()),
//!     ("scores", Schema::array(field().validators([rules::is_number()]))),
//!     ("address", form(Schema::object([
//!         ("city", field().validators([rules::is_string()]).required().into()),
//!     ])).required().into()),
//! ]);
//!
//! let result = validate(&json!({"name": "Brian", "scores": [1, "x"], "address": null}), &schema).unwrap();
//! assert!(!result.is_valid);
//! let errors = result.errors.unwrap();
//! assert!(errors.pointer("/name").is_none());
//! assert_eq!(errors.pointer("/scores/1").unwrap().reasons().unwrap(), &[json!("not a number")]);
//! assert_eq!(errors.pointer("/address").unwrap().reasons().unwrap(), &[json!("The form is required.")]);
//! ```
pub mod compact;
pub mod document;
pub mod engine;
pub mod error;
pub mod path_de;
pub mod rule;
pub mod rules;
pub mod schema;
pub mod scope;

pub use compact::{ErrorKind, ErrorTree, Failure, FieldError, FormError, Validation};
pub use document::SchemaDocument;
pub use engine::{kind_of, validate, validate_with, Options, FIELD_REQUIRED, FORM_REQUIRED};
pub use error::{DocumentError, RuleError, SchemaError};
pub use rule::{rule, Rule, RuleRef};
pub use schema::{
    field, form, form_ref, form_with, Definitions, Field, FieldBuilder, Form, FormBuilder,
    FormSource, ObjectSchema, Schema, ANY_KEY,
};
pub use scope::{Scope, Segment};
