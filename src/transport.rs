//! Tagged, self-describing encoding of `(class name, schema)` records, for
//! handing built schemas from per-file workers to the merge step.
//!
//! ```json
//! {"class_name": "App\\Dto\\User",
//!  "schema": {"kind": "object", "node": {"properties": {...}, "required": [...], ...}}}
//! ```
//!
//! Decoding never trusts the payload: unknown kinds and fields are rejected,
//! and every node is rebuilt through the validating constructors. `raw`
//! nodes are the one exception and only need to be JSON objects.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConstraintViolation, TransportError};
use crate::path_de::from_value_with_path;
use crate::schema::{
    IntegerDraft, IntegerSchema, ObjectSchema, RawSchema, RefSchema, Schema, SchemaMetadata,
    StringDraft, StringSchema,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRecord {
    pub class_name: String,
    pub schema: Schema,
}

impl SchemaRecord {
    pub fn new(class_name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        Self { class_name: class_name.into(), schema: schema.into() }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RecordWire {
    class_name: String,
    schema: NodeWire,
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", content = "node", rename_all = "lowercase", deny_unknown_fields)]
enum NodeWire {
    Integer(IntegerDraft),
    String(StringDraft),
    Object(ObjectWire),
    Ref(RefWire),
    Raw(Map<String, Value>),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ObjectWire {
    #[serde(default, skip_serializing_if = "SchemaMetadata::is_empty")]
    metadata: SchemaMetadata,
    #[serde(default)]
    properties: IndexMap<String, NodeWire>,
    #[serde(default)]
    required: Vec<String>,
    additional_properties: bool,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RefWire {
    r#ref: String,
}

fn to_wire(schema: &Schema) -> NodeWire {
    match schema {
        Schema::Integer(x) => NodeWire::Integer(x.as_draft().clone()),
        Schema::String(x) => NodeWire::String(x.as_draft().clone()),
        Schema::Object(x) => NodeWire::Object(ObjectWire {
            metadata: x.metadata().clone(),
            properties: x.properties().iter().map(|(k, v)| (k.clone(), to_wire(v))).collect(),
            required: x.required().to_vec(),
            additional_properties: x.additional_properties(),
        }),
        Schema::Ref(x) => NodeWire::Ref(RefWire { r#ref: x.reference().to_string() }),
        Schema::Raw(x) => NodeWire::Raw(x.data().clone()),
    }
}

fn from_wire(node: NodeWire) -> Result<Schema, ConstraintViolation> {
    Ok(match node {
        NodeWire::Integer(d) => IntegerSchema::new(d)?.into(),
        NodeWire::String(d) => StringSchema::new(d)?.into(),
        NodeWire::Object(o) => {
            let properties = o
                .properties
                .into_iter()
                .map(|(k, v)| from_wire(v).map(|s| (k, s)))
                .collect::<Result<IndexMap<_, _>, _>>()?;
            ObjectSchema::new(o.metadata, properties, o.required, o.additional_properties)?.into()
        }
        NodeWire::Ref(r) => RefSchema::new(r.r#ref).into(),
        NodeWire::Raw(data) => RawSchema::new(data).into(),
    })
}

pub fn encode(record: &SchemaRecord) -> Result<Value, TransportError> {
    let wire = RecordWire {
        class_name: record.class_name.clone(),
        schema: to_wire(&record.schema),
    };
    Ok(serde_json::to_value(wire)?)
}

pub fn decode(value: Value) -> Result<SchemaRecord, TransportError> {
    let Value::Object(map) = &value else {
        return Err(TransportError::NotAnObject);
    };
    match map.get("class_name") {
        Some(Value::String(name)) if !name.is_empty() => {}
        _ => return Err(TransportError::InvalidField("class_name")),
    }
    if !map.get("schema").is_some_and(Value::is_object) {
        return Err(TransportError::InvalidField("schema"));
    }

    let wire: RecordWire = from_value_with_path(value)?;
    let schema = from_wire(wire.schema)?;
    Ok(SchemaRecord { class_name: wire.class_name, schema })
}

pub fn encode_to_string(record: &SchemaRecord) -> Result<String, TransportError> {
    Ok(serde_json::to_string(&encode(record)?)?)
}

pub fn decode_from_str(src: &str) -> Result<SchemaRecord, TransportError> {
    decode(serde_json::from_str(src)?)
}
