//! Human and machine renderings of validation results and schemas.
use std::fmt::{self, Write as _};
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use form_shape::{Definitions, ErrorKind, FormSource, ObjectSchema, Schema, Validation};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Validation result of one input document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReport {
    /// File path the document came from.
    pub source: String,
    /// Position of the document inside its file (NDJSON line, jq output).
    pub index: usize,
    #[serde(flatten)]
    pub validation: Validation,
}

// ————————————————————————————————————————————————————————————————————————————
// VALIDATION REPORTS
// ————————————————————————————————————————————————————————————————————————————

pub fn render_pretty(reports: &[DocumentReport]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let mut invalid = 0usize;
    for report in reports {
        let label = format!("{}#{}", report.source, report.index);
        let Some(errors) = report.validation.errors.as_ref() else {
            writeln!(out, "{} {}", "✔".green().bold(), label)?;
            continue;
        };
        invalid += 1;
        writeln!(out, "{} {}", "✘".red().bold(), label.bold())?;
        for failure in errors.failures() {
            let location = if failure.pointer.is_empty() { "/" } else { failure.pointer.as_str() };
            let kind = match failure.kind {
                ErrorKind::Field => "field".yellow(),
                ErrorKind::Form => "form".magenta(),
            };
            let data = failure.data.map(compact_json).unwrap_or_else(|| "undefined".to_string());
            writeln!(out, "    {} [{}] {}", location.cyan(), kind, data.dimmed())?;
            for reason in failure.reasons {
                writeln!(out, "      - {}", reason_text(reason))?;
            }
        }
    }
    let summary = format!("{} document(s), {} invalid", reports.len(), invalid);
    writeln!(out, "{}", if invalid == 0 { summary.green() } else { summary.red() })?;
    Ok(out)
}

pub fn render_json(reports: &[DocumentReport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(reports)
}

fn reason_text(reason: &Value) -> String {
    match reason {
        Value::String(s) => s.clone(),
        other => compact_json(other),
    }
}

fn compact_json(value: &Value) -> String {
    const MAX: usize = 60;
    let text = value.to_string();
    if text.chars().count() <= MAX {
        return text;
    }
    let mut short = text.chars().take(MAX).collect::<String>();
    short.push('…');
    short
}

// ————————————————————————————————————————————————————————————————————————————
// SCHEMA OUTLINE
// ————————————————————————————————————————————————————————————————————————————

/// Indented outline of a schema and its definitions.
pub fn outline(root: &Schema, definitions: &Definitions) -> Result<String, fmt::Error> {
    let mut out = String::new();
    outline_node(&mut out, "root", root, 0)?;
    if !definitions.is_empty() {
        out.push_str("definitions:\n");
        for (name, schema) in definitions {
            outline_node(&mut out, name, schema, 1)?;
        }
    }
    Ok(out)
}

fn outline_node(out: &mut String, label: &str, schema: &Schema, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    match schema {
        Schema::Field(field) => {
            let mut notes = vec![format!("{} rule(s)", field.validators().len())];
            if field.is_required() {
                notes.insert(0, "required".to_string());
            }
            if !field.attributes().is_null() {
                notes.push(format!("attributes {}", compact_json(field.attributes())));
            }
            writeln!(out, "{indent}{label}: field ({})", notes.join(", "))
        }
        Schema::Form(form) => {
            let required = if form.is_required() { " (required)" } else { "" };
            match form.source() {
                FormSource::Inline(inner) => {
                    writeln!(out, "{indent}{label}: form{required}")?;
                    outline_node(out, "schema", inner, depth + 1)
                }
                FormSource::Deferred(_) => writeln!(out, "{indent}{label}: form <deferred>{required}"),
                FormSource::Named(name) => writeln!(out, "{indent}{label}: form -> {name}{required}"),
            }
        }
        Schema::Array(element) => {
            writeln!(out, "{indent}{label}: array")?;
            outline_node(out, "[]", element, depth + 1)
        }
        Schema::Object(ObjectSchema::Keys(keys)) => {
            writeln!(out, "{indent}{label}: object")?;
            for (key, sub) in keys {
                outline_node(out, key, sub, depth + 1)?;
            }
            Ok(())
        }
        Schema::Object(ObjectSchema::AnyKey(element)) => {
            writeln!(out, "{indent}{label}: map")?;
            outline_node(out, "*", element, depth + 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_shape::{field, form_ref, rules, validate};
    use serde_json::json;

    #[test]
    fn outline_lists_every_node() {
        let schema = Schema::object([
            ("name", field().validators([rules::is_string()]).required().into()),
            ("tags", Schema::array(field())),
            ("home", form_ref("address").into()),
        ]);
        let mut definitions = Definitions::new();
        definitions.insert("address".into(), Schema::any_key(field()));
        let text = outline(&schema, &definitions).unwrap();
        assert_eq!(
            text,
            "root: object\n\
             \x20 name: field (required, 1 rule(s))\n\
             \x20 tags: array\n\
             \x20   []: field (0 rule(s))\n\
             \x20 home: form -> address\n\
             definitions:\n\
             \x20 address: map\n\
             \x20   *: field (0 rule(s))\n"
        );
    }

    #[test]
    fn pretty_report_lists_failure_locations() {
        colored::control::set_override(false);
        let schema = Schema::array(field().validators([rules::is_number()]));
        let reports = vec![
            DocumentReport {
                source: "a.json".into(),
                index: 0,
                validation: validate(&json!([1, "x"]), &schema).unwrap(),
            },
            DocumentReport {
                source: "b.json".into(),
                index: 0,
                validation: validate(&json!([2]), &schema).unwrap(),
            },
        ];
        let text = render_pretty(&reports).unwrap();
        assert!(text.contains("a.json#0"));
        assert!(text.contains("/1 [field] \"x\""));
        assert!(text.contains("- not a number"));
        assert!(text.contains("✔ b.json#0"));
        assert!(text.ends_with("2 document(s), 1 invalid\n"));
    }

    #[test]
    fn json_report_flattens_validation() {
        let schema = Schema::from(field().required());
        let reports = vec![DocumentReport {
            source: "-".into(),
            index: 3,
            validation: validate(None, &schema).unwrap(),
        }];
        let value: Value = serde_json::from_str(&render_json(&reports).unwrap()).unwrap();
        assert_eq!(
            value,
            json!([{
                "source": "-",
                "index": 3,
                "isValid": false,
                "errors": {"error": "field", "reasons": ["The field is required."]}
            }])
        );
    }
}
