use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde_json::Value;
use crate::error::RuleError;
use crate::rule::{rule, RuleRef};

/// RFC 3339 timestamp, e.g. `2024-05-01T12:30:00Z`.
pub fn date_time() -> RuleRef {
    rule(|value, _| match value.as_str().map(DateTime::<FixedOffset>::parse_from_rfc3339) {
        Some(Ok(_)) => Ok(()),
        _ => Err(Value::from("not an RFC 3339 date-time")),
    })
}

/// Calendar date in a strftime-style `format` (e.g. `%Y-%m-%d`).
pub fn date(format: &str) -> Result<RuleRef, RuleError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(RuleError::DateFormat(format.to_string()));
    }
    let format = format.to_string();
    Ok(rule(move |value, _| {
        match value.as_str().map(|s| NaiveDate::parse_from_str(s, &format)) {
            Some(Ok(_)) => Ok(()),
            _ => Err(Value::from(format!("not a date in the format `{format}`"))),
        }
    }))
}
