//! Class descriptor manifests exported by the host analyzer.
//!
//! A manifest document is either one class object or an array of them.
//! Each input file may be narrowed with a JSON pointer and then fanned out
//! into several documents by a jq filter.
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::builder::ClassDescriptor;
use crate::collect::SourceFile;
use crate::path_de::{from_value_with_path, PathError};

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read \"{}\": {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("\"{}\" is not valid JSON: {source}", path.display())]
    Syntax {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("\"{}\": JSON pointer {pointer} selects nothing", path.display())]
    PointerMiss { path: PathBuf, pointer: String },

    #[error("\"{}\": jq filter failed: {message}", path.display())]
    Filter { path: PathBuf, message: String },

    #[error("\"{}\": invalid class descriptor {source}", path.display())]
    Descriptor {
        path: PathBuf,
        #[source]
        source: PathError,
    },
}

/// How each input document is narrowed before it is read as descriptors.
#[derive(Debug, Clone, Default)]
pub struct ManifestOptions {
    pub json_pointer: Option<String>,
    pub jq_expr: Option<String>,
}

/// One class object, or an array of class objects.
pub fn parse_document(doc: Value) -> Result<Vec<ClassDescriptor>, PathError> {
    match doc {
        Value::Array(_) => from_value_with_path(doc),
        other => from_value_with_path(other).map(|c| vec![c]),
    }
}

pub fn load_file(path: &Path, options: &ManifestOptions) -> Result<SourceFile, ManifestError> {
    let source = std::fs::read_to_string(path)
        .map_err(|source| ManifestError::Read { path: path.to_path_buf(), source })?;
    let mut root: Value = serde_json::from_str(&source)
        .map_err(|source| ManifestError::Syntax { path: path.to_path_buf(), source })?;

    if let Some(pointer) = options.json_pointer.as_deref() {
        root = root
            .pointer_mut(pointer)
            .map(Value::take)
            .ok_or_else(|| ManifestError::PointerMiss {
                path: path.to_path_buf(),
                pointer: pointer.to_string(),
            })?;
    }

    let docs = match options.jq_expr.as_deref() {
        None => vec![root],
        Some(jq_expr) => crate::jq_exec::run_filter(jq_expr, &root).map_err(|e| {
            ManifestError::Filter { path: path.to_path_buf(), message: format!("{e:#}") }
        })?,
    };

    let mut classes = Vec::new();
    for doc in docs {
        let parsed = parse_document(doc)
            .map_err(|source| ManifestError::Descriptor { path: path.to_path_buf(), source })?;
        classes.extend(parsed);
    }
    tracing::debug!(path = %path.display(), classes = classes.len(), "manifest loaded");
    Ok(SourceFile { path: path.to_path_buf(), classes })
}

pub fn load_files(
    paths: &[PathBuf],
    options: &ManifestOptions,
) -> Result<Vec<SourceFile>, ManifestError> {
    paths.iter().map(|p| load_file(p, options)).collect()
}
