use std::fmt;
use serde_json::Value;
use crate::engine::{Origin, Outcome, FIELD_REQUIRED};
use crate::rule::RuleRef;
use crate::scope::Scope;

/// Leaf schema node: an ordered list of rules plus a required flag.
///
/// Built with [`field()`]; immutable afterwards.
#[derive(Clone, Default)]
pub struct Field {
    validators: Vec<RuleRef>,
    required: bool,
    attributes: Value,
}

/// Start building a [`Field`]: optional, no rules, `null` attributes.
pub fn field() -> FieldBuilder {
    FieldBuilder::default()
}

#[derive(Clone, Default)]
pub struct FieldBuilder {
    field: Field,
}

impl FieldBuilder {
    /// Opaque caller metadata, handed back verbatim by [`Field::attributes`].
    pub fn attributes(mut self, attributes: impl Into<Value>) -> Self {
        self.field.attributes = attributes.into();
        self
    }

    /// Append one closure rule.
    pub fn validator<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, Scope<'_>) -> Result<(), Value> + Send + Sync + 'static,
    {
        self.field.validators.push(std::sync::Arc::new(f));
        self
    }

    /// Append already-shared rules, keeping their order.
    pub fn validators(mut self, rules: impl IntoIterator<Item = RuleRef>) -> Self {
        self.field.validators.extend(rules);
        self
    }

    pub fn required(mut self) -> Self {
        self.field.required = true;
        self
    }

    pub fn build(self) -> Field {
        self.field
    }
}

impl Field {
    pub fn attributes(&self) -> &Value {
        &self.attributes
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn validators(&self) -> &[RuleRef] {
        &self.validators
    }

    /// Absent (`None`) and `null` values skip every rule and only answer to
    /// the required flag. Otherwise all rules run, in order, and every
    /// failure reason is kept.
    pub(crate) fn validate<'v>(&self, value: Option<&'v Value>, scope: Scope<'_>) -> Outcome<'v> {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            let reasons = if self.required {
                vec![Value::from(FIELD_REQUIRED)]
            } else {
                Vec::new()
            };
            return Outcome::Leaf {
                origin: Origin::Field,
                is_valid: !self.required,
                reasons,
                data: None,
            };
        };
        let reasons = self
            .validators
            .iter()
            .filter_map(|rule| rule.check(value, scope).err())
            .collect::<Vec<_>>();
        Outcome::Leaf {
            origin: Origin::Field,
            is_valid: reasons.is_empty(),
            reasons,
            data: Some(value),
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("validators", &self.validators.len())
            .field("required", &self.required)
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl fmt::Debug for FieldBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldBuilder").field(&self.field).finish()
    }
}
