//! Persisting rendered schemas, one file per class.
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::WriteError;
use crate::schema::Schema;

static FILE_STEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.]+$").expect("static regex"));

pub trait SchemaWriter {
    /// Returns the path of the written document.
    fn write(&self, class_name: &str, schema: &Schema) -> Result<PathBuf, WriteError>;
}

/// Writes `<Qualified.Class.Name>.json` files into one directory.
#[derive(Debug, Clone)]
pub struct DirectorySchemaWriter {
    output_directory: PathBuf,
}

impl DirectorySchemaWriter {
    pub fn new(output_directory: impl Into<PathBuf>) -> Self {
        Self { output_directory: output_directory.into() }
    }

    fn ensure_directory_exists(&self) -> Result<(), WriteError> {
        std::fs::create_dir_all(&self.output_directory).map_err(|source| WriteError::CreateDir {
            path: self.output_directory.clone(),
            source,
        })
    }
}

impl SchemaWriter for DirectorySchemaWriter {
    fn write(&self, class_name: &str, schema: &Schema) -> Result<PathBuf, WriteError> {
        let path = self.output_directory.join(format!("{}.json", file_stem(class_name)?));
        let json = render_pretty(schema)?;

        self.ensure_directory_exists()?;
        std::fs::write(&path, json)
            .map_err(|source| WriteError::Write { path: path.clone(), source })?;
        tracing::debug!(class = class_name, path = %path.display(), "schema written");
        Ok(path)
    }
}

/// `App\Dto\User` → `App.Dto.User`.
pub fn file_stem(class_name: &str) -> Result<String, WriteError> {
    let stem = class_name.trim_start_matches('\\').replace('\\', ".");
    if !FILE_STEM.is_match(&stem) {
        return Err(WriteError::InvalidClassName(class_name.to_string()));
    }
    Ok(stem)
}

/// Pretty JSON with four-space indentation; slashes stay unescaped.
pub fn render_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    // serde_json only ever emits UTF-8.
    Ok(String::from_utf8_lossy(&out).into_owned())
}
