use serde_json::Value;
use crate::rule::{rule, RuleRef};

/// Whole number (`3` and `3.0` both pass).
pub fn is_integer() -> RuleRef {
    rule(|value, _| match value.as_f64() {
        Some(n) if n.fract() == 0.0 => Ok(()),
        _ => Err(Value::from("not an integer")),
    })
}

/// Non-numbers fail too, like any other odd value.
pub fn is_even() -> RuleRef {
    rule(|value, _| match value.as_f64() {
        Some(n) if n % 2.0 == 0.0 => Ok(()),
        _ => Err(Value::from("not an even number")),
    })
}

/// Inclusive lower bound. Non-numbers are left to [`is_number`](super::is_number).
pub fn minimum(min: f64) -> RuleRef {
    rule(move |value, _| match value.as_f64() {
        Some(n) if n < min => Err(Value::from(format!("must be at least {min}"))),
        _ => Ok(()),
    })
}

/// Inclusive upper bound. Non-numbers are left to [`is_number`](super::is_number).
pub fn maximum(max: f64) -> RuleRef {
    rule(move |value, _| match value.as_f64() {
        Some(n) if n > max => Err(Value::from(format!("must be at most {max}"))),
        _ => Ok(()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;
    use serde_json::json;

    #[test]
    fn even_and_integer() {
        let even = is_even();
        assert!(even.check(&json!(4), Scope::root()).is_ok());
        assert_eq!(even.check(&json!(5), Scope::root()), Err(json!("not an even number")));
        assert!(even.check(&json!("4"), Scope::root()).is_err());

        let int = is_integer();
        assert!(int.check(&json!(3.0), Scope::root()).is_ok());
        assert_eq!(int.check(&json!(3.5), Scope::root()), Err(json!("not an integer")));
    }

    #[test]
    fn bounds_are_inclusive() {
        let min = minimum(18.0);
        assert!(min.check(&json!(18), Scope::root()).is_ok());
        assert_eq!(min.check(&json!(17), Scope::root()), Err(json!("must be at least 18")));
        assert!(min.check(&json!("seventeen"), Scope::root()).is_ok());

        let max = maximum(1.5);
        assert!(max.check(&json!(1.5), Scope::root()).is_ok());
        assert_eq!(max.check(&json!(2), Scope::root()), Err(json!("must be at most 1.5")));
    }
}
