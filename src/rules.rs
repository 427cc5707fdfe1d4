//! Stock rules for the common cases.
//!
//! Every constructor returns a shared [`RuleRef`] ready for
//! [`FieldBuilder::validators`](crate::FieldBuilder::validators). Failure
//! reasons are plain message strings; wrap a rule in [`with_message`] to
//! report something else.
pub mod num;
pub mod str;
pub mod time;

use serde_json::Value;
use crate::rule::{rule, RuleRef};

pub use num::{is_even, is_integer, maximum, minimum};
pub use str::{email, max_length, min_length, pattern};
pub use time::{date, date_time};

pub fn is_number() -> RuleRef {
    rule(|value, _| if value.is_number() { Ok(()) } else { Err(Value::from("not a number")) })
}

pub fn is_string() -> RuleRef {
    rule(|value, _| if value.is_string() { Ok(()) } else { Err(Value::from("not a string")) })
}

pub fn is_boolean() -> RuleRef {
    rule(|value, _| if value.is_boolean() { Ok(()) } else { Err(Value::from("not a boolean")) })
}

/// The value must equal one of `allowed`.
pub fn one_of(allowed: Vec<Value>) -> RuleRef {
    let message = format!(
        "must be one of {}",
        allowed.iter().map(Value::to_string).collect::<Vec<_>>().join(", ")
    );
    rule(move |value, _| {
        if allowed.contains(value) { Ok(()) } else { Err(Value::from(message.clone())) }
    })
}

/// Cross-field check: the value must equal its sibling `key` in the
/// enclosing object (e.g. a password confirmation).
pub fn matches_sibling(key: impl Into<String>) -> RuleRef {
    let key = key.into();
    rule(move |value, scope| {
        let sibling = scope.parent().and_then(|parent| parent.get(&key));
        if sibling == Some(value) {
            Ok(())
        } else {
            Err(Value::from(format!("must match `{key}`")))
        }
    })
}

/// Replace the failure reason of `inner` with `message`.
pub fn with_message(inner: RuleRef, message: impl Into<Value>) -> RuleRef {
    let message = message.into();
    rule(move |value, scope| inner.check(value, scope).map_err(|_| message.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::{Link, Scope, Segment};
    use serde_json::json;

    fn run(rule: &RuleRef, value: Value) -> Result<(), Value> {
        rule.check(&value, Scope::root())
    }

    #[test]
    fn type_rules_use_the_classic_messages() {
        assert!(run(&is_number(), json!(4.5)).is_ok());
        assert_eq!(run(&is_number(), json!("4")), Err(json!("not a number")));
        assert!(run(&is_string(), json!("")).is_ok());
        assert_eq!(run(&is_string(), json!(7)), Err(json!("not a string")));
        assert!(run(&is_boolean(), json!(false)).is_ok());
        assert_eq!(run(&is_boolean(), json!("true")), Err(json!("not a boolean")));
    }

    #[test]
    fn one_of_lists_allowed_values() {
        let r = one_of(vec![json!("red"), json!(2)]);
        assert!(run(&r, json!(2)).is_ok());
        assert_eq!(run(&r, json!("blue")), Err(json!(r#"must be one of "red", 2"#)));
    }

    #[test]
    fn matches_sibling_reads_the_parent_object() {
        let form = json!({"password": "hunter2", "confirm": "hunter2"});
        let link = Link::new(Scope::root(), &form, Segment::Key("confirm"));
        let scope = Scope::nested(&link);
        let r = matches_sibling("password");
        assert!(r.check(&json!("hunter2"), scope).is_ok());
        assert_eq!(r.check(&json!("hunter3"), scope), Err(json!("must match `password`")));
        assert!(r.check(&json!("hunter2"), Scope::root()).is_err());
    }

    #[test]
    fn with_message_overrides_the_reason() {
        let r = with_message(is_number(), json!({"code": "NaN"}));
        assert!(run(&r, json!(1)).is_ok());
        assert_eq!(run(&r, json!("x")), Err(json!({"code": "NaN"})));
    }
}
