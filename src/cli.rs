//! Minimal CLI: load schema → (check documents | print outline)
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use serde_json::Value;
use form_shape::SchemaDocument;
use crate::report::{self, DocumentReport};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// validate JSON/NDJSON documents against a form-shape schema document
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,

    /// more logging on stderr (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// validate every input document and report failures
    Check(CheckOut),
    /// load a schema document and print its outline
    Schema(SchemaOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// schema document (.json)
    #[arg(long, short)]
    schema: PathBuf,

    /// report format
    #[arg(long, value_enum, default_value_t = Format::Pretty)]
    format: Format,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    /// schema document (.json)
    #[arg(long, short)]
    schema: PathBuf,
}

/// One document pulled out of an input file.
struct Loaded {
    source: String,
    index: usize,
    value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_all(&self) -> Result<Vec<Loaded>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let mut out = Vec::new();
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file {source_path_str}"))?;
            let documents = if self.ndjson {
                source
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(serde_json::from_str::<Value>)
                    .collect::<Result<Vec<_>, _>>()
            } else {
                serde_json::from_str::<Value>(&source).map(|value| vec![value])
            };
            let documents = documents
                .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
            let mut index = 0;
            for document in documents {
                for value in self.preprocess(document, &source_path_str)? {
                    out.push(Loaded { source: source_path_str.clone(), index, value });
                    index += 1;
                }
            }
        }
        tracing::debug!(documents = out.len(), "loaded inputs");
        Ok(out)
    }

    fn preprocess(&self, document: Value, source_path_str: &str) -> Result<Vec<Value>> {
        let document = match self.json_pointer.as_deref() {
            None => document,
            Some(pointer) => match document.pointer(pointer) {
                Some(node) => node.clone(),
                None => bail!("JSON pointer {pointer} matched nothing in {source_path_str}"),
            },
        };
        match self.jq_expr.as_deref() {
            None => Ok(vec![document]),
            Some(jq_expr) => crate::jq_exec::run_jaq(jq_expr, &document).with_context(|| {
                format!("Failed to apply jq expression to source file ({source_path_str})")
            }),
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    /// Returns whether every checked document was valid.
    pub fn run(&self) -> Result<bool> {
        match &self.cmd {
            Command::Check(target) => {
                let document = SchemaDocument::load(&target.schema)
                    .with_context(|| format!("failed to load schema {}", target.schema.display()))?;
                let inputs = target.input_settings.load_all()?;

                let reports = inputs
                    .into_par_iter()
                    .map(|loaded| {
                        let validation = document.validate(&loaded.value)?;
                        Ok(DocumentReport { source: loaded.source, index: loaded.index, validation })
                    })
                    .collect::<Result<Vec<_>, form_shape::SchemaError>>()?;

                let all_valid = reports.iter().all(|r| r.validation.is_valid);
                let rendered = match target.format {
                    Format::Pretty => report::render_pretty(&reports)?,
                    Format::Json => report::render_json(&reports)?,
                };
                emit(target.out.as_deref(), &rendered)?;
                Ok(all_valid)
            }
            Command::Schema(target) => {
                let document = SchemaDocument::load(&target.schema)
                    .with_context(|| format!("failed to load schema {}", target.schema.display()))?;
                print!("{}", report::outline(&document.root, &document.definitions)?);
                Ok(true)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn emit(out: Option<&Path>, rendered: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, rendered)
                .with_context(|| format!("failed to write {}", out.display()))
        }
        None => {
            print!("{rendered}");
            Ok(())
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_check_arguments() {
        let cli = CommandLineInterface::try_parse_from([
            "form-shape", "-vv", "check", "--schema", "s.json", "-i", "a.json", "b/*.json",
            "--ndjson", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.verbosity(), 2);
        let Command::Check(check) = cli.cmd else { panic!("expected check") };
        assert_eq!(check.schema, PathBuf::from("s.json"));
        assert_eq!(check.input_settings.input, vec!["a.json", "b/*.json"]);
        assert!(check.input_settings.ndjson);
        assert!(matches!(check.format, Format::Json));
    }

    #[test]
    fn json_pointer_selects_a_subnode() {
        let settings = InputSettings {
            ndjson: false,
            json_pointer: Some("/data/0".into()),
            jq_expr: None,
            input: vec![],
        };
        let doc = serde_json::json!({"data": [{"x": 1}]});
        assert_eq!(settings.preprocess(doc.clone(), "t.json").unwrap(), vec![serde_json::json!({"x": 1})]);

        let missing = InputSettings { json_pointer: Some("/nope".into()), ..settings };
        assert!(missing.preprocess(doc, "t.json").is_err());
    }

    #[test]
    fn literal_paths_pass_through_untouched() {
        let paths = resolve_file_path_patterns(["a.json", "dir/b.json"]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("a.json"), PathBuf::from("dir/b.json")]);
    }
}
