use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use serde_json::Value;
use crate::engine::{Origin, Outcome, FORM_REQUIRED};
use crate::error::SchemaError;
use crate::scope::Scope;
use super::{Definitions, Schema};

/// Where a [`Form`] gets its sub-schema from.
#[derive(Clone)]
pub enum FormSource {
    Inline(Arc<Schema>),
    /// Re-evaluated every time the form validates a present value, so the
    /// thunk may build schemas that refer back to themselves.
    Deferred(Arc<dyn Fn() -> Schema + Send + Sync>),
    /// Looked up by name in the [`Definitions`] passed through
    /// [`Options`](crate::Options).
    Named(String),
}

/// Branch schema node wrapping a nested, reusable sub-schema.
#[derive(Debug, Clone)]
pub struct Form {
    source: FormSource,
    required: bool,
}

#[derive(Debug, Clone)]
pub struct FormBuilder {
    form: Form,
}

pub fn form(schema: impl Into<Schema>) -> FormBuilder {
    FormBuilder::new(FormSource::Inline(Arc::new(schema.into())))
}

/// Form whose sub-schema is produced lazily by `thunk`.
pub fn form_with<F>(thunk: F) -> FormBuilder
where
    F: Fn() -> Schema + Send + Sync + 'static,
{
    FormBuilder::new(FormSource::Deferred(Arc::new(thunk)))
}

/// Form referring to a named entry of the validation's [`Definitions`].
pub fn form_ref(name: impl Into<String>) -> FormBuilder {
    FormBuilder::new(FormSource::Named(name.into()))
}

impl FormBuilder {
    fn new(source: FormSource) -> Self {
        Self { form: Form { source, required: false } }
    }

    pub fn required(mut self) -> Self {
        self.form.required = true;
        self
    }

    pub fn build(self) -> Form {
        self.form
    }
}

impl Form {
    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn source(&self) -> &FormSource {
        &self.source
    }

    /// Outcome for an absent (`None`) or `null` value, or `None` when the
    /// value is present and the sub-schema has to be consulted.
    pub(crate) fn absent<'v>(&self, value: Option<&'v Value>) -> Option<Outcome<'v>> {
        if value.is_some_and(|v| !v.is_null()) {
            return None;
        }
        let reasons = if self.required {
            vec![Value::from(FORM_REQUIRED)]
        } else {
            Vec::new()
        };
        Some(Outcome::Leaf {
            origin: Origin::Form,
            is_valid: !self.required,
            reasons,
            data: value,
        })
    }

    pub(crate) fn resolve<'d>(
        &'d self,
        definitions: &'d Definitions,
        scope: Scope<'_>,
    ) -> Result<Cow<'d, Schema>, SchemaError> {
        match &self.source {
            FormSource::Inline(schema) => Ok(Cow::Borrowed(schema.as_ref())),
            FormSource::Deferred(thunk) => Ok(Cow::Owned(thunk())),
            FormSource::Named(name) => definitions
                .get(name)
                .map(Cow::Borrowed)
                .ok_or_else(|| SchemaError::UnresolvedReference {
                    name: name.clone(),
                    pointer: scope.pointer(),
                }),
        }
    }
}

impl fmt::Debug for FormSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormSource::Inline(schema) => f.debug_tuple("Inline").field(schema).finish(),
            FormSource::Deferred(_) => f.write_str("Deferred(..)"),
            FormSource::Named(name) => f.debug_tuple("Named").field(name).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::field;
    use serde_json::json;

    #[test]
    fn absent_policy_mirrors_required_flag() {
        let optional = form(field()).build();
        let required = form(field()).required().build();
        let null = Value::Null;

        for value in [None, Some(&null)] {
            match optional.absent(value) {
                Some(Outcome::Leaf { is_valid, reasons, .. }) => {
                    assert!(is_valid);
                    assert!(reasons.is_empty());
                }
                other => panic!("unexpected {other:?}"),
            }
            match required.absent(value) {
                Some(Outcome::Leaf { origin, is_valid, reasons, data }) => {
                    assert_eq!(origin, Origin::Form);
                    assert!(!is_valid);
                    assert_eq!(reasons, vec![json!("The form is required.")]);
                    assert_eq!(data, value);
                }
                other => panic!("unexpected {other:?}"),
            }
        }

        let present = json!({});
        assert!(required.absent(Some(&present)).is_none());
    }

    #[test]
    fn named_source_needs_a_definition() {
        let defs = Definitions::new();
        let f = form_ref("address").build();
        let err = f.resolve(&defs, Scope::root()).unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvedReference { ref name, .. } if name == "address"));

        let mut defs = Definitions::new();
        defs.insert("address".into(), field().into());
        assert_eq!(f.resolve(&defs, Scope::root()).unwrap().kind_name(), "field");
    }

    #[test]
    fn deferred_source_is_evaluated_on_each_resolve() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let f = form_with(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Schema::array(field())
        })
        .build();
        let defs = Definitions::new();
        for _ in 0..3 {
            assert_eq!(f.resolve(&defs, Scope::root()).unwrap().kind_name(), "array");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
