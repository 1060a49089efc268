//! Immutable JSON-Schema node model.
//!
//! Every node is validated once when it is built and never changes afterwards:
//! - integer / string nodes go through their `*Draft` field sets,
//! - object nodes own their property nodes (a `Ref` only names another schema),
//! - `Raw` carries an already rendered object across process boundaries.
//!
//! Rendering lives in [`crate::emit`].
pub mod meta;
pub mod int;
pub mod str;
pub mod obj;
#[cfg(test)]
pub(crate) mod arb;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ConstraintViolation;

pub use meta::SchemaMetadata;
pub use int::{IntegerDraft, IntegerSchema};
pub use str::{StringDraft, StringSchema};
pub use obj::ObjectSchema;

#[derive(Clone, Debug, PartialEq)]
pub enum Schema {
    Integer(IntegerSchema),
    String(StringSchema),
    Object(ObjectSchema),
    Ref(RefSchema),
    Raw(RawSchema),
}

/// `{"$ref": ...}` pointing at a schema defined elsewhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefSchema {
    reference: String,
}

impl RefSchema {
    pub fn new(reference: impl Into<String>) -> Self {
        Self { reference: reference.into() }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }
}

/// Pre-rendered schema object, passed through untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct RawSchema {
    data: Map<String, Value>,
}

impl RawSchema {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }
}

impl TryFrom<Value> for RawSchema {
    type Error = ConstraintViolation;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(data) => Ok(Self { data }),
            other => Err(ConstraintViolation::new("raw", "Raw schema must be a JSON object")
                .with("value", other)),
        }
    }
}

impl Schema {
    /// Variant name, as used by the transport encoding.
    pub fn kind(&self) -> &'static str {
        match self {
            Schema::Integer(_) => "integer",
            Schema::String(_) => "string",
            Schema::Object(_) => "object",
            Schema::Ref(_) => "ref",
            Schema::Raw(_) => "raw",
        }
    }

    pub fn to_json(&self) -> Value {
        crate::emit::emit_schema(self)
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Schema::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<IntegerSchema> for Schema {
    fn from(x: IntegerSchema) -> Self {
        Schema::Integer(x)
    }
}

impl From<StringSchema> for Schema {
    fn from(x: StringSchema) -> Self {
        Schema::String(x)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(x: ObjectSchema) -> Self {
        Schema::Object(x)
    }
}

impl From<RefSchema> for Schema {
    fn from(x: RefSchema) -> Self {
        Schema::Ref(x)
    }
}

impl From<RawSchema> for Schema {
    fn from(x: RawSchema) -> Self {
        Schema::Raw(x)
    }
}
