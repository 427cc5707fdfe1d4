//! Schema trees: the closed set of node kinds the engine dispatches on.
//!
//! A schema is built once (through [`field()`], [`form()`] and the
//! constructors on [`Schema`]) and is immutable afterwards; validation only
//! ever borrows it. Every node is `Send + Sync`, so a single schema can be
//! shared across threads and reused for any number of validations.
pub mod field;
pub mod form;

use indexmap::IndexMap;

pub use field::{field, Field, FieldBuilder};
pub use form::{form, form_ref, form_with, Form, FormBuilder, FormSource};

/// Object key that turns an object schema into a wildcard over the data's keys.
///
/// See [`Schema::object`].
pub const ANY_KEY: &str = "*";

/// Named schemas that [`form_ref`] forms resolve against at validation time.
pub type Definitions = IndexMap<String, Schema>;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone)]
pub enum Schema {
    /// Leaf: runs its rules against a single value.
    Field(Field),
    /// Branch: a nested, reusable sub-schema with its own required flag.
    Form(Form),
    /// Homogeneous array; the element schema applies to every item.
    Array(Box<Schema>),
    Object(ObjectSchema),
}

#[derive(Debug, Clone)]
pub enum ObjectSchema {
    /// Declared keys, validated in declaration order. Data keys not listed
    /// here are ignored; listed keys missing from the data are validated as
    /// absent values.
    Keys(IndexMap<String, Schema>),
    /// Every entry of the data object is validated against one schema.
    AnyKey(Box<Schema>),
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Schema {
    pub fn array(element: impl Into<Schema>) -> Self {
        Schema::Array(Box::new(element.into()))
    }

    /// Object schema from `(key, schema)` entries, keeping their order.
    ///
    /// If one of the keys is [`ANY_KEY`], the object becomes an
    /// [`ObjectSchema::AnyKey`] over that entry's schema and every other
    /// declared key is discarded.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Schema)>,
    {
        let mut keys = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v))
            .collect::<IndexMap<String, Schema>>();
        match keys.shift_remove(ANY_KEY) {
            Some(element) => {
                if !keys.is_empty() {
                    tracing::warn!(
                        discarded = ?keys.keys().collect::<Vec<_>>(),
                        "object schema mixes `{ANY_KEY}` with concrete keys; the wildcard wins",
                    );
                }
                Schema::any_key(element)
            }
            None => Schema::Object(ObjectSchema::Keys(keys)),
        }
    }

    pub fn any_key(element: impl Into<Schema>) -> Self {
        Schema::Object(ObjectSchema::AnyKey(Box::new(element.into())))
    }

    /// Short lowercase name of the node kind (`field`, `form`, `array`,
    /// `object`, `map`).
    pub fn kind_name(&self) -> &'static str {
        match self {
            Schema::Field(_) => "field",
            Schema::Form(_) => "form",
            Schema::Array(_) => "array",
            Schema::Object(ObjectSchema::Keys(_)) => "object",
            Schema::Object(ObjectSchema::AnyKey(_)) => "map",
        }
    }
}

impl From<Field> for Schema {
    fn from(field: Field) -> Self {
        Schema::Field(field)
    }
}

impl From<FieldBuilder> for Schema {
    fn from(builder: FieldBuilder) -> Self {
        Schema::Field(builder.build())
    }
}

impl From<Form> for Schema {
    fn from(form: Form) -> Self {
        Schema::Form(form)
    }
}

impl From<FormBuilder> for Schema {
    fn from(builder: FormBuilder) -> Self {
        Schema::Form(builder.build())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_keeps_declaration_order() {
        let schema = Schema::object([
            ("zeta", field().into()),
            ("alpha", field().into()),
            ("mid", field().into()),
        ]);
        let Schema::Object(ObjectSchema::Keys(keys)) = schema else {
            panic!("expected declared keys");
        };
        assert_eq!(keys.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn any_key_takes_over_the_whole_object() {
        let schema = Schema::object([
            ("name", field().into()),
            (ANY_KEY, field().required().into()),
        ]);
        assert_eq!(schema.kind_name(), "map");
        let Schema::Object(ObjectSchema::AnyKey(element)) = schema else {
            panic!("expected wildcard");
        };
        let Schema::Field(element) = *element else {
            panic!("expected field element");
        };
        assert!(element.is_required());
    }

    #[test]
    fn builders_convert_into_schema_nodes() {
        assert_eq!(Schema::from(field()).kind_name(), "field");
        assert_eq!(Schema::from(form(field())).kind_name(), "form");
        assert_eq!(Schema::array(field()).kind_name(), "array");
    }
}
