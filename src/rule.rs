//! The validator predicate contract.
use std::sync::Arc;
use serde_json::Value;
use crate::scope::Scope;

/// A validator predicate judging one present, non-null value.
///
/// `Err(reason)` marks the value invalid; the reason is an opaque JSON value
/// (usually a message string) copied verbatim into the error tree. Rules must
/// be free of side effects visible to the engine: they may run any number of
/// times, against any number of values, from several threads at once.
///
/// Any `Fn(&Value, Scope<'_>) -> Result<(), Value>` closure is a rule.
pub trait Rule: Send + Sync {
    fn check(&self, value: &Value, scope: Scope<'_>) -> Result<(), Value>;
}

/// Shared handle to a rule, as stored inside a [`Field`](crate::Field).
pub type RuleRef = Arc<dyn Rule>;

impl<F> Rule for F
where
    F: Fn(&Value, Scope<'_>) -> Result<(), Value> + Send + Sync,
{
    fn check(&self, value: &Value, scope: Scope<'_>) -> Result<(), Value> {
        self(value, scope)
    }
}

/// Wrap a closure into a [`RuleRef`].
pub fn rule<F>(f: F) -> RuleRef
where
    F: Fn(&Value, Scope<'_>) -> Result<(), Value> + Send + Sync + 'static,
{
    Arc::new(f)
}
