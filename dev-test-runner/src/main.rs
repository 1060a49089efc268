//! Golden-file runner: every `<Name>.class.json` under the fixture tree is
//! built with the default mappers and compared byte for byte against the
//! sibling `<Name>.schema.json`.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use class_json_schema::{manifest, writer, ClassSchemaBuilder, Schema};

const CLASS_SUFFIX: &str = ".class.json";

#[derive(Debug)]
struct Fixture {
    name: String,
    class_file: PathBuf,
    schema_file: PathBuf,
}

fn discover(root: &Path) -> Result<Vec<Fixture>, Box<dyn std::error::Error>> {
    let pattern = format!("{}/**/*{CLASS_SUFFIX}", root.display());
    let mut out = Vec::new();
    for entry in glob::glob(&pattern)? {
        let class_file = entry?;
        let Some(name) = class_file
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(CLASS_SUFFIX))
            .map(str::to_string)
        else {
            continue;
        };
        out.push(Fixture {
            schema_file: class_file.with_file_name(format!("{name}.schema.json")),
            class_file,
            name,
        });
    }
    Ok(out)
}

fn check(builder: &ClassSchemaBuilder, fixture: &Fixture) -> Result<(), String> {
    let source = std::fs::read_to_string(&fixture.class_file).map_err(|e| e.to_string())?;
    let doc: serde_json::Value = serde_json::from_str(&source).map_err(|e| e.to_string())?;
    let classes = manifest::parse_document(doc).map_err(|e| e.to_string())?;
    let [class] = classes.as_slice() else {
        return Err(format!("expected one class, found {}", classes.len()));
    };
    let schema = builder.build(class).map_err(|e| e.to_string())?;
    let actual = writer::render_pretty(&Schema::from(schema)).map_err(|e| e.to_string())?;

    let expected = std::fs::read_to_string(&fixture.schema_file).map_err(|e| e.to_string())?;
    if actual != expected.trim_end() {
        return Err(format!("expected:\n{}\nactual:\n{actual}", expected.trim_end()));
    }
    Ok(())
}

/// Returns the number of failed fixtures.
fn run(root: &Path) -> Result<usize, Box<dyn std::error::Error>> {
    let builder = ClassSchemaBuilder::default();
    let fixtures = discover(root)?;
    let mut failed = 0;
    for fixture in &fixtures {
        match check(&builder, fixture) {
            Ok(()) => eprintln!("✅ {}", fixture.name),
            Err(error) => {
                failed += 1;
                eprintln!("❌ {}: {error}", fixture.name);
            }
        }
    }
    eprintln!("—— {} fixtures, {failed} failed ——", fixtures.len());
    Ok(failed)
}

fn default_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

fn main() -> ExitCode {
    let root = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(default_root);
    match run(&root) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("failed to read fixtures under {}: {error}", root.display());
            ExitCode::FAILURE
        }
    }
}
