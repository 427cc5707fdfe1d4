//! Golden-case runner: `fixtures/<case>/{schema,data,expected}.json`.
//!
//! A case without `data.json` validates an absent value. Pass a directory
//! to run another fixture set.
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::Value;
use form_shape::SchemaDocument;

fn run_case(dir: &Path) -> Result<Option<String>> {
    let document = SchemaDocument::load(dir.join("schema.json"))?;
    let data_path = dir.join("data.json");
    let data = if data_path.exists() {
        Some(read_json(&data_path)?)
    } else {
        None
    };
    let expected = read_json(&dir.join("expected.json"))?;
    let actual = serde_json::to_value(document.validate(data.as_ref())?)?;
    if actual == expected {
        Ok(None)
    } else {
        Ok(Some(format!(
            "expected {}\n     got {}",
            serde_json::to_string(&expected)?,
            serde_json::to_string(&actual)?
        )))
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&source).with_context(|| format!("failed to parse {}", path.display()))
}

fn main() -> ExitCode {
    let root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("../fixtures"));

    let mut cases = match std::fs::read_dir(&root) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_dir())
            .collect::<Vec<_>>(),
        Err(error) => {
            eprintln!("cannot read fixtures at {}: {error}", root.display());
            return ExitCode::from(2);
        }
    };
    cases.sort();

    let mut failed = 0usize;
    for case in &cases {
        let name = case.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        match run_case(case) {
            Ok(None) => eprintln!("{} {name}", "✅".green()),
            Ok(Some(diff)) => {
                failed += 1;
                eprintln!("{} {name}\n     {diff}", "❌".red());
            }
            Err(error) => {
                failed += 1;
                eprintln!("{} {name}: {error:#}", "💥".red());
            }
        }
    }
    eprintln!("{} case(s), {failed} failed", cases.len());
    if failed == 0 { ExitCode::SUCCESS } else { ExitCode::from(1) }
}
