//! Recursive matching of a data tree against a schema tree.
//!
//! The engine walks both trees in lockstep and builds an `Outcome` tree
//! that mirrors the schema. Each node kind has one rule:
//!
//! - `Field` / `Form`: delegate (both own their absence policy).
//! - `Array(S)`: data must be an array; every item is matched against `S`.
//! - `Object(Keys)`: data must be an object; every *declared* key is matched.
//! - `Object(AnyKey(S))`: data must be an object; every *data* key is matched against `S`.
//!
//! Shape mismatches are ordinary form-level failures. Only schema bugs
//! (unknown form names, runaway self-reference) abort with a [`SchemaError`].
//! The depth guard counts forms resolved in a row without stepping into the
//! data, so arbitrarily deep data never trips it.
use std::sync::Arc;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use crate::compact::{compact, Validation};
use crate::error::SchemaError;
use crate::schema::{Definitions, ObjectSchema, Schema};
use crate::scope::{Link, Scope, Segment};

pub const FIELD_REQUIRED: &str = "The field is required.";
pub const FORM_REQUIRED: &str = "The form is required.";

const DEFAULT_MAX_FORM_CHAIN: usize = 256;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct Options {
    max_depth: usize,
    definitions: Arc<Definitions>,
}

/// Which kind of node produced a leaf failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Origin {
    Field,
    Form,
}

/// Full, uncompacted result tree.
#[derive(Debug)]
pub(crate) enum Outcome<'v> {
    Leaf {
        origin: Origin,
        is_valid: bool,
        reasons: Vec<Value>,
        data: Option<&'v Value>,
    },
    Array {
        is_valid: bool,
        items: Vec<Outcome<'v>>,
    },
    Object {
        is_valid: bool,
        entries: IndexMap<String, Outcome<'v>>,
    },
}

struct Engine<'o> {
    options: &'o Options,
}

// ————————————————————————————————————————————————————————————————————————————
// PUBLIC API
// ————————————————————————————————————————————————————————————————————————————

/// Validate `data` against `schema` with default [`Options`].
///
/// Pass `None` to validate an absent value.
pub fn validate<'v>(
    data: impl Into<Option<&'v Value>>,
    schema: &Schema,
) -> Result<Validation, SchemaError> {
    validate_with(data, schema, &Options::default())
}

pub fn validate_with<'v>(
    data: impl Into<Option<&'v Value>>,
    schema: &Schema,
    options: &Options,
) -> Result<Validation, SchemaError> {
    let data = data.into();
    tracing::debug!(schema = schema.kind_name(), data = kind_of(data), "validating");
    let outcome = Engine { options }.visit(data, schema, Scope::root(), 0)?;
    let is_valid = outcome.is_valid();
    let errors = compact(outcome);
    if !is_valid {
        tracing::debug!("validation failed");
    }
    Ok(Validation { is_valid, errors })
}

/// Kind name used in shape-mismatch messages.
pub fn kind_of(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Default for Options {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_FORM_CHAIN, definitions: Arc::default() }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upper bound on forms resolved back to back at one data position.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Registry that named forms ([`form_ref`](crate::form_ref)) resolve against.
    pub fn with_definitions(mut self, definitions: impl Into<Arc<Definitions>>) -> Self {
        self.definitions = definitions.into();
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }
}

impl<'v> Outcome<'v> {
    pub(crate) fn is_valid(&self) -> bool {
        match self {
            Outcome::Leaf { is_valid, .. }
            | Outcome::Array { is_valid, .. }
            | Outcome::Object { is_valid, .. } => *is_valid,
        }
    }

    fn mismatch(expected: &str, data: Option<&'v Value>) -> Self {
        Outcome::Leaf {
            origin: Origin::Form,
            is_valid: false,
            reasons: vec![Value::from(format!(
                "Expected an {expected} but got a {}.",
                kind_of(data)
            ))],
            data,
        }
    }
}

impl Engine<'_> {
    fn visit<'v>(
        &self,
        data: Option<&'v Value>,
        schema: &Schema,
        scope: Scope<'_>,
        form_chain: usize,
    ) -> Result<Outcome<'v>, SchemaError> {
        if form_chain > self.options.max_depth {
            return Err(SchemaError::DepthExceeded {
                limit: self.options.max_depth,
                pointer: scope.pointer(),
            });
        }
        tracing::trace!(node = schema.kind_name(), data = kind_of(data), depth = scope.depth(), "visit");
        match schema {
            Schema::Field(field) => Ok(field.validate(data, scope)),
            Schema::Form(form) => {
                if let Some(outcome) = form.absent(data) {
                    return Ok(outcome);
                }
                let resolved = form.resolve(&self.options.definitions, scope)?;
                self.visit(data, &resolved, scope, form_chain + 1)
            }
            Schema::Array(element) => match data {
                Some(parent @ Value::Array(items)) => {
                    self.visit_array(parent, items, element, scope)
                }
                other => Ok(Outcome::mismatch("array", other)),
            },
            Schema::Object(object) => match data {
                Some(parent @ Value::Object(map)) => {
                    self.visit_object(parent, map, object, scope)
                }
                other => Ok(Outcome::mismatch("object", other)),
            },
        }
    }

    fn visit_array<'v>(
        &self,
        parent: &'v Value,
        items: &'v [Value],
        element: &Schema,
        scope: Scope<'_>,
    ) -> Result<Outcome<'v>, SchemaError> {
        let mut results = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let link = Link::new(scope, parent, Segment::Index(index));
            results.push(self.visit(Some(item), element, Scope::nested(&link), 0)?);
        }
        Ok(Outcome::Array {
            is_valid: results.iter().all(Outcome::is_valid),
            items: results,
        })
    }

    fn visit_object<'v>(
        &self,
        parent: &'v Value,
        map: &'v Map<String, Value>,
        object: &ObjectSchema,
        scope: Scope<'_>,
    ) -> Result<Outcome<'v>, SchemaError> {
        let mut entries = IndexMap::new();
        match object {
            ObjectSchema::Keys(keys) => {
                for (key, sub) in keys {
                    let link = Link::new(scope, parent, Segment::Key(key.as_str()));
                    let outcome = self.visit(map.get(key), sub, Scope::nested(&link), 0)?;
                    entries.insert(key.clone(), outcome);
                }
            }
            ObjectSchema::AnyKey(element) => {
                for (key, value) in map {
                    let link = Link::new(scope, parent, Segment::Key(key.as_str()));
                    let outcome = self.visit(Some(value), element, Scope::nested(&link), 0)?;
                    entries.insert(key.clone(), outcome);
                }
            }
        }
        Ok(Outcome::Object {
            is_valid: entries.values().all(Outcome::is_valid),
            entries,
        })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
