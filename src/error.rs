//! Error taxonomy shared by the schema model, the mappers, the builder and
//! the transport/writer boundaries.
use std::path::PathBuf;

use serde_json::{Map, Value};
use thiserror::Error;

/// A schema node was declared with fields that contradict each other.
///
/// `constraint` names the offending field (`minimum`, `default`, `enum`, ...).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid schema constraint \"{constraint}\": {reason}")]
pub struct ConstraintViolation {
    pub constraint: &'static str,
    pub reason: &'static str,
    pub context: Map<String, Value>,
}

impl ConstraintViolation {
    pub fn new(constraint: &'static str, reason: &'static str) -> Self {
        Self { constraint, reason, context: Map::new() }
    }

    /// Attach a context value for error reports.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }
}

/// No registered mapper recognized the type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("type \"{type_name}\" is not supported yet")]
pub struct UnsupportedType {
    pub type_name: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error(transparent)]
    Unsupported(#[from] UnsupportedType),
    #[error(transparent)]
    Constraint(#[from] ConstraintViolation),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("anonymous class \"{class}\" is not supported for schema generation")]
    AnonymousClass { class: String },

    #[error("class {class}, member ${member}: {source}")]
    Constraint {
        class: String,
        member: String,
        #[source]
        source: ConstraintViolation,
    },
}

/// Failure to encode or decode a transported schema record.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("record must be a JSON object")]
    NotAnObject,

    #[error("missing or invalid \"{0}\"")]
    InvalidField(&'static str),

    #[error("malformed record {0}")]
    Malformed(#[from] crate::path_de::PathError),

    #[error("decoded schema is invalid: {0}")]
    Constraint(#[from] ConstraintViolation),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to persist one rendered schema document.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("invalid class name for file generation: \"{0}\"")]
    InvalidClassName(String),

    #[error("directory \"{}\" was not created: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write schema to \"{}\": {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode schema: {0}")]
    Encode(#[from] serde_json::Error),
}
