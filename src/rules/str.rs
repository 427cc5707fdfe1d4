use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use crate::error::RuleError;
use crate::rule::{rule, RuleRef};

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("static email pattern")
});

/// Length in characters for strings, in items for arrays.
fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

pub fn min_length(min: usize) -> RuleRef {
    rule(move |value, _| match length_of(value) {
        Some(len) if len >= min => Ok(()),
        Some(_) => Err(Value::from(format!("must have at least {min} characters"))),
        None => Err(Value::from("has no length")),
    })
}

pub fn max_length(max: usize) -> RuleRef {
    rule(move |value, _| match length_of(value) {
        Some(len) if len <= max => Ok(()),
        Some(_) => Err(Value::from(format!("must have at most {max} characters"))),
        None => Err(Value::from("has no length")),
    })
}

/// The string must match `pattern` (unanchored unless the pattern anchors itself).
pub fn pattern(pattern: &str) -> Result<RuleRef, RuleError> {
    let regex = Regex::new(pattern)?;
    Ok(rule(move |value, _| match value.as_str() {
        Some(s) if regex.is_match(s) => Ok(()),
        _ => Err(Value::from(format!("must match /{}/", regex.as_str()))),
    }))
}

pub fn email() -> RuleRef {
    rule(|value, _| match value.as_str() {
        Some(s) if EMAIL.is_match(s) => Ok(()),
        _ => Err(Value::from("not an email address")),
    })
}
