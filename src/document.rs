//! Schema documents: the schema node kinds written down as JSON.
//!
//! ```json
//! {
//!   "definitions": {
//!     "address": {"type": "object", "properties": {
//!       "city": {"type": "field", "required": true, "rules": [{"rule": "string"}]}
//!     }}
//!   },
//!   "root": {"type": "object", "properties": {
//!     "name":    {"type": "field", "required": true, "rules": [{"rule": "string"}, {"rule": "min_length", "value": 2}]},
//!     "tags":    {"type": "array", "items": {"type": "field", "rules": [{"rule": "string"}]}},
//!     "scores":  {"type": "map", "values": {"type": "field", "rules": [{"rule": "number"}]}},
//!     "address": {"type": "form", "ref": "address", "required": true}
//!   }}
//! }
//! ```
//!
//! Rules come from [`crate::rules`]; each accepts an optional `"message"`
//! that replaces its failure reason.
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use crate::compact::Validation;
use crate::engine::{validate_with, Options};
use crate::error::{DocumentError, RuleError, SchemaError};
use crate::rule::RuleRef;
use crate::rules;
use crate::schema::{field, form, form_ref, Definitions, Schema};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// A loaded schema document: the root schema plus its named definitions.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    pub root: Schema,
    pub definitions: Arc<Definitions>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocumentRepr {
    #[serde(default)]
    definitions: IndexMap<String, NodeRepr>,
    root: NodeRepr,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
enum NodeRepr {
    Field {
        #[serde(default)]
        required: bool,
        #[serde(default)]
        attributes: Value,
        #[serde(default)]
        rules: Vec<RuleRepr>,
    },
    Form {
        #[serde(default)]
        required: bool,
        schema: Option<Box<NodeRepr>>,
        #[serde(rename = "ref")]
        reference: Option<String>,
    },
    Array {
        items: Box<NodeRepr>,
    },
    Object {
        properties: IndexMap<String, NodeRepr>,
    },
    Map {
        values: Box<NodeRepr>,
    },
}

#[derive(Debug, Deserialize)]
struct RuleRepr {
    #[serde(flatten)]
    kind: RuleKind,
    message: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
enum RuleKind {
    Number,
    Integer,
    String,
    Boolean,
    Even,
    Minimum { value: f64 },
    Maximum { value: f64 },
    MinLength { value: usize },
    MaxLength { value: usize },
    Pattern { regex: String },
    Email,
    OneOf { values: Vec<Value> },
    DateTime,
    Date { format: String },
    MatchesSibling { key: String },
}

// ————————————————————————————————————————————————————————————————————————————
// LOADING
// ————————————————————————————————————————————————————————————————————————————

impl SchemaDocument {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let source = std::fs::read_to_string(path)?;
        source.parse()
    }

    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        Self::from_repr(crate::path_de::from_value_with_path(value)?)
    }

    fn from_repr(repr: DocumentRepr) -> Result<Self, DocumentError> {
        let builder = Builder { names: &repr.definitions };
        let mut definitions = Definitions::with_capacity(repr.definitions.len());
        for (name, node) in &repr.definitions {
            let schema = builder.node(node, &format!("definitions.{name}"))?;
            definitions.insert(name.clone(), schema);
        }
        let root = builder.node(&repr.root, "root")?;
        tracing::debug!(definitions = definitions.len(), root = root.kind_name(), "loaded schema document");
        Ok(Self { root, definitions: Arc::new(definitions) })
    }

    /// Engine options carrying this document's definitions.
    pub fn options(&self) -> Options {
        Options::new().with_definitions(self.definitions.clone())
    }

    pub fn validate<'v>(&self, data: impl Into<Option<&'v Value>>) -> Result<Validation, SchemaError> {
        validate_with(data, &self.root, &self.options())
    }
}

impl FromStr for SchemaDocument {
    type Err = DocumentError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::from_repr(crate::path_de::from_str_with_path(source)?)
    }
}

struct Builder<'a> {
    names: &'a IndexMap<String, NodeRepr>,
}

impl Builder<'_> {
    fn node(&self, node: &NodeRepr, at: &str) -> Result<Schema, DocumentError> {
        let schema: Schema = match node {
            NodeRepr::Field { required, attributes, rules } => {
                let rules = rules
                    .iter()
                    .enumerate()
                    .map(|(i, r)| build_rule(r).map_err(|e| invalid_rule(format!("{at}.rules[{i}]"), e)))
                    .collect::<Result<Vec<_>, _>>()?;
                let mut builder = field().attributes(attributes.clone()).validators(rules);
                if *required {
                    builder = builder.required();
                }
                builder.into()
            }
            NodeRepr::Form { required, schema, reference } => {
                let mut builder = match (schema, reference) {
                    (Some(inner), None) => form(self.node(inner, &format!("{at}.schema"))?),
                    (None, Some(name)) if self.names.contains_key(name) => form_ref(name.clone()),
                    (None, Some(name)) => {
                        return Err(DocumentError::UnknownReference { name: name.clone(), at: at.to_string() });
                    }
                    _ => {
                        return Err(DocumentError::Malformed {
                            path: at.to_string(),
                            message: "a form needs exactly one of `schema` or `ref`".to_string(),
                        });
                    }
                };
                if *required {
                    builder = builder.required();
                }
                builder.into()
            }
            NodeRepr::Array { items } => Schema::array(self.node(items, &format!("{at}.items"))?),
            NodeRepr::Object { properties } => {
                let mut entries = Vec::with_capacity(properties.len());
                for (key, sub) in properties {
                    entries.push((key.clone(), self.node(sub, &format!("{at}.properties.{key}"))?));
                }
                Schema::object(entries)
            }
            NodeRepr::Map { values } => Schema::any_key(self.node(values, &format!("{at}.values"))?),
        };
        Ok(schema)
    }
}

fn build_rule(repr: &RuleRepr) -> Result<RuleRef, RuleError> {
    let rule = match &repr.kind {
        RuleKind::Number => rules::is_number(),
        RuleKind::Integer => rules::is_integer(),
        RuleKind::String => rules::is_string(),
        RuleKind::Boolean => rules::is_boolean(),
        RuleKind::Even => rules::is_even(),
        RuleKind::Minimum { value } => rules::minimum(*value),
        RuleKind::Maximum { value } => rules::maximum(*value),
        RuleKind::MinLength { value } => rules::min_length(*value),
        RuleKind::MaxLength { value } => rules::max_length(*value),
        RuleKind::Pattern { regex } => rules::pattern(regex)?,
        RuleKind::Email => rules::email(),
        RuleKind::OneOf { values } => rules::one_of(values.clone()),
        RuleKind::DateTime => rules::date_time(),
        RuleKind::Date { format } => rules::date(format)?,
        RuleKind::MatchesSibling { key } => rules::matches_sibling(key.clone()),
    };
    Ok(match &repr.message {
        Some(message) => rules::with_message(rule, message.clone()),
        None => rule,
    })
}

fn invalid_rule(at: String, error: RuleError) -> DocumentError {
    DocumentError::InvalidRule { at, message: error.to_string() }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
