//! CLI: class descriptor manifests → (schema files | printed schema)
use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use crate::builder::ClassSchemaBuilder;
use crate::collect::{self, Failure, Merged, SourceFile};
use crate::manifest::{self, ManifestOptions};
use crate::mapper::{IntegerTypeMapper, StringTypeMapper, TypeMapperRegistry};
use crate::writer::{render_pretty, DirectorySchemaWriter, SchemaWriter};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate JSON Schema documents from class descriptors exported by a static analyzer
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// build every class and write one `<Class.Name>.json` per class
    Build(BuildOut),
    /// build and print schemas to stdout (or a single file)
    Print(PrintOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select a subnode in each manifest (e.g. /data/classes)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each manifest; every output is a document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more manifests. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

/// Type mappers, consulted in the order given.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum MapperKind {
    Integer,
    String,
}

#[derive(clap::Parser, Debug)]
struct BuildOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// directory receiving the schema files (created if missing)
    #[arg(long)]
    out_dir: PathBuf,

    #[arg(long = "mapper", value_enum, default_value = "integer")]
    mappers: Vec<MapperKind>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct PrintOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// print only this class (all classes, keyed by name, if omitted)
    #[arg(long)]
    class: Option<String>,

    #[arg(long = "mapper", value_enum, default_value = "integer")]
    mappers: Vec<MapperKind>,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> Result<Vec<SourceFile>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let options = ManifestOptions {
            json_pointer: self.json_pointer.clone(),
            jq_expr: self.jq_expr.clone(),
        };
        Ok(manifest::load_files(&source_paths, &options)?)
    }
}

impl MapperKind {
    fn registry(kinds: &[MapperKind]) -> TypeMapperRegistry {
        kinds.iter().fold(TypeMapperRegistry::empty(), |registry, kind| match kind {
            MapperKind::Integer => registry.with(IntegerTypeMapper),
            MapperKind::String => registry.with(StringTypeMapper),
        })
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Build(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let files = target.input_settings.load()?;
                let merged = generate(&files, &target.mappers);
                let writer = DirectorySchemaWriter::new(&target.out_dir);

                let mut failures = merged.failures.len();
                for (class_name, schema) in &merged.schemas {
                    match writer.write(class_name, schema) {
                        Ok(path) => {
                            eprintln!("{} {class_name} → {}", "✅".green(), path.display())
                        }
                        Err(error) => {
                            failures += 1;
                            eprintln!("{} {class_name}: {error}", "❌".red());
                        }
                    }
                }
                report_failures(&merged.failures);

                if failures > 0 {
                    let total = merged.schemas.len() + merged.failures.len();
                    bail!("{failures} of {total} classes failed");
                }
                let summary = format!(
                    "{} schemas written to {}",
                    merged.schemas.len(),
                    target.out_dir.display()
                );
                eprintln!("{}", summary.bold());
                Ok(())
            }
            Command::Print(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let files = target.input_settings.load()?;
                let merged = generate(&files, &target.mappers);
                report_failures(&merged.failures);

                let rendered = match target.class.as_deref() {
                    Some(name) => {
                        let wanted = name.trim_start_matches('\\');
                        let Some(schema) = merged
                            .schemas
                            .iter()
                            .find(|(k, _)| k.trim_start_matches('\\') == wanted)
                            .map(|(_, v)| v)
                        else {
                            bail!("class \"{name}\" was not found or failed to build");
                        };
                        render_pretty(schema)?
                    }
                    None => {
                        let all: BTreeMap<&str, _> =
                            merged.schemas.iter().map(|(k, v)| (k.as_str(), v)).collect();
                        render_pretty(&all)?
                    }
                };

                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("failed to create {}", parent.display()))?;
                    }
                    std::fs::write(out, &rendered)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                } else {
                    println!("{rendered}");
                }

                if !merged.failures.is_empty() {
                    bail!("{} classes failed", merged.failures.len());
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn generate(files: &[SourceFile], mappers: &[MapperKind]) -> Merged {
    let builder = ClassSchemaBuilder::new(MapperKind::registry(mappers));
    let collection = collect::collect_all(&builder, files);
    let mut merged = collect::merge(collection.records);
    let mut failures = collection.failures;
    failures.append(&mut merged.failures);
    merged.failures = failures;
    merged
}

fn report_failures(failures: &[Failure]) {
    for failure in failures {
        eprintln!(
            "{} {} ({}): {}",
            "❌".red(),
            failure.class,
            failure.file.display(),
            failure.message
        );
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            let entries = glob::glob(pattern)
                .with_context(|| format!("invalid glob pattern: {pattern}"))?;
            for entry in entries {
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
    fn mapper_order_follows_arguments() {
        let cli = CommandLineInterface::parse_from([
            "class-json-schema", "build", "-i", "a.json", "--out-dir", "out",
            "--mapper", "string", "--mapper", "integer",
        ]);
        let Command::Build(target) = &cli.cmd else { panic!("expected build") };
        assert_eq!(target.mappers, [MapperKind::String, MapperKind::Integer]);
        assert_eq!(
            format!("{:?}", MapperKind::registry(&target.mappers)),
            r#"["string", "integer"]"#
        );
    }

    #[test]
    fn integer_mapper_is_the_default() {
        let cli = CommandLineInterface::parse_from(["class-json-schema", "print", "-i", "a.json"]);
        let Command::Print(target) = &cli.cmd else { panic!("expected print") };
        assert_eq!(target.mappers, [MapperKind::Integer]);
    }

    #[test]
    fn glob_matching_nothing_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.json", dir.path().display());
        assert!(resolve_file_path_patterns([pattern.as_str()]).is_err());

        std::fs::write(dir.path().join("a.json"), "{}").unwrap();
        let found = resolve_file_path_patterns([pattern.as_str(), "literal.json"]).unwrap();
        assert_eq!(found, [dir.path().join("a.json"), PathBuf::from("literal.json")]);
    }

    #[test]
    fn build_writes_one_file_per_class() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("classes.json");
        std::fs::write(
            &manifest,
            serde_json::json!([
                {"name": "App\\Dto\\Rating", "members": [
                    {"name": "score", "visibility": "public",
                     "type": {"kind": "integer-range", "min": 1, "max": 10}}
                ]},
                {"name": "App\\Dto\\Empty"}
            ])
            .to_string(),
        )
        .unwrap();
        let out_dir = dir.path().join("schemas");
        let cli = CommandLineInterface::parse_from([
            "class-json-schema".to_string(),
            "build".into(),
            "-i".into(),
            manifest.display().to_string(),
            "--out-dir".into(),
            out_dir.display().to_string(),
        ]);
        cli.run().unwrap();

        let rating = std::fs::read_to_string(out_dir.join("App.Dto.Rating.json")).unwrap();
        let rating: serde_json::Value = serde_json::from_str(&rating).unwrap();
        assert_eq!(rating["properties"]["score"]["maximum"], 10);
        assert!(out_dir.join("App.Dto.Empty.json").exists());
    }
}
