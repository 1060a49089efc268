//! Canonical rendering of schema nodes into JSON values.
//!
//! Key order is fixed: metadata keys first (`title`, `description`,
//! `deprecated`, `readOnly`, `writeOnly`), then `type`, then the type keys in
//! declaration order. Unset fields are left out, never rendered as `null`;
//! `additionalProperties` is always rendered.
use serde_json::{Map, Value};

use crate::schema::{
    IntegerSchema, ObjectSchema, RawSchema, RefSchema, Schema, SchemaMetadata, StringSchema,
};

pub fn emit_schema(schema: &Schema) -> Value {
    match schema {
        Schema::Integer(x) => emit_integer(x),
        Schema::String(x) => emit_string(x),
        Schema::Object(x) => emit_object(x),
        Schema::Ref(x) => emit_ref(x),
        Schema::Raw(x) => emit_raw(x),
    }
}

pub fn emit_metadata(meta: &SchemaMetadata) -> Map<String, Value> {
    let mut o = Map::new();
    if let Some(v) = &meta.title {
        o.insert("title".into(), Value::from(v.as_str()));
    }
    if let Some(v) = &meta.description {
        o.insert("description".into(), Value::from(v.as_str()));
    }
    if let Some(v) = meta.deprecated {
        o.insert("deprecated".into(), Value::from(v));
    }
    if let Some(v) = meta.read_only {
        o.insert("readOnly".into(), Value::from(v));
    }
    if let Some(v) = meta.write_only {
        o.insert("writeOnly".into(), Value::from(v));
    }
    o
}

// Metadata and type keys are disjoint sets; an overlap is a bug in this module.
fn merge(meta: &SchemaMetadata, body: Map<String, Value>) -> Value {
    let mut out = emit_metadata(meta);
    for (k, v) in body {
        debug_assert!(!out.contains_key(&k), "schema key `{k}` overlaps with metadata");
        out.insert(k, v);
    }
    Value::Object(out)
}

fn emit_integer(x: &IntegerSchema) -> Value {
    let mut o = Map::new();
    o.insert("type".into(), Value::from("integer"));
    if let Some(m) = x.minimum() {
        o.insert("minimum".into(), Value::from(m));
    }
    if let Some(m) = x.maximum() {
        o.insert("maximum".into(), Value::from(m));
    }
    if let Some(d) = x.default_value() {
        o.insert("default".into(), Value::from(d));
    }
    if let Some(e) = x.enum_values() {
        o.insert("enum".into(), Value::Array(e.iter().copied().map(Value::from).collect()));
    }
    merge(x.metadata(), o)
}

fn emit_string(x: &StringSchema) -> Value {
    let mut o = Map::new();
    o.insert("type".into(), Value::from("string"));
    if let Some(n) = x.min_length() {
        o.insert("minLength".into(), Value::from(n));
    }
    if let Some(n) = x.max_length() {
        o.insert("maxLength".into(), Value::from(n));
    }
    if let Some(p) = x.pattern() {
        o.insert("pattern".into(), Value::from(p));
    }
    if let Some(f) = x.format() {
        o.insert("format".into(), Value::from(f));
    }
    if let Some(d) = x.default_value() {
        o.insert("default".into(), Value::from(d));
    }
    if let Some(e) = x.enum_values() {
        o.insert("enum".into(), Value::Array(e.iter().cloned().map(Value::from).collect()));
    }
    merge(x.metadata(), o)
}

fn emit_object(x: &ObjectSchema) -> Value {
    let mut o = Map::new();
    o.insert("type".into(), Value::from("object"));
    if !x.properties().is_empty() {
        let props = x
            .properties()
            .iter()
            .map(|(name, schema)| (name.clone(), emit_schema(schema)))
            .collect::<Map<_, _>>();
        o.insert("properties".into(), Value::Object(props));
    }
    if !x.required().is_empty() {
        o.insert(
            "required".into(),
            Value::Array(x.required().iter().cloned().map(Value::from).collect()),
        );
    }
    o.insert("additionalProperties".into(), Value::from(x.additional_properties()));
    merge(x.metadata(), o)
}

fn emit_ref(x: &RefSchema) -> Value {
    let mut o = Map::new();
    o.insert("$ref".into(), Value::from(x.reference()));
    Value::Object(o)
}

fn emit_raw(x: &RawSchema) -> Value {
    Value::Object(x.data().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{IntegerDraft, StringDraft};
    use crate::schema::arb;
    use indexmap::IndexMap;
    use proptest::prelude::*;
    use serde_json::json;

    fn object(props: Vec<(&str, Schema)>, required: &[&str]) -> ObjectSchema {
        ObjectSchema::new(
            SchemaMetadata::default(),
            props.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            required.iter().map(|s| s.to_string()).collect(),
            false,
        )
        .unwrap()
    }

    #[test]
    fn integer_with_every_field() {
        let schema = Schema::from(
            IntegerSchema::new(IntegerDraft {
                metadata: SchemaMetadata { description: Some("score".into()), ..Default::default() },
                minimum: Some(0),
                maximum: Some(10),
                default: Some(5),
                r#enum: Some(vec![0, 5, 10]),
            })
            .unwrap(),
        );
        assert_eq!(
            serde_json::to_string(&schema).unwrap(),
            r#"{"description":"score","type":"integer","minimum":0,"maximum":10,"default":5,"enum":[0,5,10]}"#
        );
    }

    #[test]
    fn unset_fields_are_omitted() {
        let value = emit_schema(&IntegerSchema::unconstrained().into());
        assert_eq!(value, json!({"type": "integer"}));
        assert!(!value.as_object().unwrap().values().any(Value::is_null));
    }

    #[test]
    fn string_key_order() {
        let schema = Schema::from(
            StringSchema::new(StringDraft {
                min_length: Some(1),
                max_length: Some(8),
                pattern: Some("^[a-z/]+$".into()),
                format: Some("uri".into()),
                default: Some("a/b".into()),
                r#enum: Some(vec!["a/b".into()]),
                ..Default::default()
            })
            .unwrap(),
        );
        let keys = schema.to_json().as_object().unwrap().keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys, ["type", "minLength", "maxLength", "pattern", "format", "default", "enum"]);
    }

    #[test]
    fn object_key_order_and_nesting() {
        let obj = ObjectSchema::new(
            SchemaMetadata {
                title: Some("User".into()),
                description: Some("User DTO".into()),
                deprecated: Some(false),
                read_only: Some(true),
                write_only: Some(false),
            },
            IndexMap::from([("id".to_string(), Schema::from(IntegerSchema::unconstrained()))]),
            vec!["id".into()],
            false,
        )
        .unwrap();
        let value = emit_schema(&obj.into());
        let keys = value.as_object().unwrap().keys().cloned().collect::<Vec<_>>();
        assert_eq!(
            keys,
            [
                "title", "description", "deprecated", "readOnly", "writeOnly",
                "type", "properties", "required", "additionalProperties",
            ]
        );
        assert_eq!(value["properties"]["id"], json!({"type": "integer"}));
        assert_eq!(value["additionalProperties"], false);
    }

    #[test]
    fn empty_object_omits_required_and_properties() {
        let value = emit_schema(&ObjectSchema::empty().into());
        assert_eq!(value, json!({"type": "object", "additionalProperties": false}));
    }

    #[test]
    fn rating_scenario() {
        let obj = object(
            vec![("rating", IntegerSchema::range(Some(1), Some(10)).unwrap().into())],
            &["rating"],
        );
        assert_eq!(
            serde_json::to_string(&Schema::from(obj)).unwrap(),
            r#"{"type":"object","properties":{"rating":{"type":"integer","minimum":1,"maximum":10}},"required":["rating"],"additionalProperties":false}"#
        );
    }

    #[test]
    fn ref_and_raw_pass_through() {
        let obj = object(
            vec![
                ("owner", RefSchema::new("App.Dto.User.json").into()),
                ("flag", RawSchema::try_from(json!({"type": "boolean"})).unwrap().into()),
            ],
            &[],
        );
        let value = emit_schema(&obj.into());
        assert_eq!(value["properties"]["owner"], json!({"$ref": "App.Dto.User.json"}));
        assert_eq!(value["properties"]["flag"], json!({"type": "boolean"}));
    }

    #[test]
    fn rendering_is_repeatable() {
        let obj = object(
            vec![
                ("b", IntegerSchema::range(None, Some(3)).unwrap().into()),
                ("a", StringSchema::unconstrained().into()),
            ],
            &["b", "a"],
        );
        let schema = Schema::from(obj);
        let first = serde_json::to_string(&schema).unwrap();
        for _ in 0..3 {
            assert_eq!(serde_json::to_string(&schema).unwrap(), first);
        }
        let reparsed: Value = serde_json::from_str(&first).unwrap();
        assert_eq!(reparsed, schema.to_json());
    }

    fn has_null(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::Array(items) => items.iter().any(has_null),
            Value::Object(map) => map.values().any(has_null),
            _ => false,
        }
    }

    proptest! {
        #[test]
        fn any_valid_tree_renders_stably(schema in arb::schema()) {
            let first = serde_json::to_string(&schema).unwrap();
            prop_assert_eq!(serde_json::to_string(&schema).unwrap(), first.clone());

            let reparsed: Value = serde_json::from_str(&first).unwrap();
            prop_assert_eq!(&reparsed, &schema.to_json());
            prop_assert!(!has_null(&reparsed));
            if let Some(obj) = schema.as_object() {
                prop_assert_eq!(reparsed.get("required").is_some(), !obj.required().is_empty());
                prop_assert_eq!(
                    reparsed["additionalProperties"].as_bool(),
                    Some(obj.additional_properties())
                );
            }
        }
    }
}
