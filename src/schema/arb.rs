//! proptest strategies producing valid schema trees.
use std::collections::BTreeSet;

use indexmap::IndexMap;
use proptest::prelude::*;
use proptest::sample::Index;
use serde_json::{Map, Value};

use super::{
    IntegerDraft, IntegerSchema, ObjectSchema, RawSchema, RefSchema, Schema, SchemaMetadata,
    StringDraft, StringSchema,
};

pub fn metadata() -> impl Strategy<Value = SchemaMetadata> {
    (
        proptest::option::of("[A-Za-z ]{0,8}"),
        proptest::option::of("[A-Za-z /]{0,12}"),
        any::<Option<bool>>(),
        any::<Option<bool>>(),
        any::<Option<bool>>(),
    )
        .prop_map(|(title, description, deprecated, read_only, write_only)| SchemaMetadata {
            title,
            description,
            deprecated,
            read_only,
            write_only,
        })
}

/// Bounds, default and enum are drawn from one interval so they agree.
pub fn integer() -> impl Strategy<Value = IntegerSchema> {
    (
        -50i64..50,
        0i64..20,
        any::<(bool, bool, bool)>(),
        any::<Option<Index>>(),
        prop::collection::vec(0i64..20, 0..4),
        metadata(),
    )
        .prop_map(|(lo, span, (has_min, has_max, has_enum), default_at, offsets, metadata)| {
            let values: Vec<i64> = offsets
                .into_iter()
                .map(|o| lo + o % (span + 1))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            let r#enum = (has_enum && !values.is_empty()).then_some(values);
            let default = default_at.map(|at| match &r#enum {
                Some(values) => values[at.index(values.len())],
                None => lo + at.index(span as usize + 1) as i64,
            });
            IntegerSchema::new(IntegerDraft {
                metadata,
                minimum: has_min.then_some(lo),
                maximum: has_max.then_some(lo + span),
                default,
                r#enum,
            })
            .expect("drawn from one interval")
        })
}

pub fn string() -> impl Strategy<Value = StringSchema> {
    (
        proptest::option::of(0u64..10),
        proptest::option::of(0u64..10),
        proptest::option::of("[a-z]{0,6}"),
        proptest::option::of(prop_oneof![Just("uri".to_string()), Just("date".to_string())]),
        proptest::option::of("[a-z/]{0,5}"),
        proptest::option::of(prop::collection::btree_set("[a-z/]{1,4}", 1..4)),
        metadata(),
    )
        .prop_map(|(min_length, max_length, pattern, format, default, values, metadata)| {
            StringSchema::new(StringDraft {
                metadata,
                min_length,
                max_length,
                pattern,
                format,
                default,
                r#enum: values.map(|v| v.into_iter().collect()),
            })
            .expect("enum drawn from a set")
        })
}

pub fn raw() -> impl Strategy<Value = RawSchema> {
    prop::collection::btree_map("[a-z]{1,5}", any::<i32>(), 0..4).prop_map(|fields| {
        RawSchema::new(fields.into_iter().map(|(k, v)| (k, Value::from(v))).collect::<Map<_, _>>())
    })
}

/// Any node kind, objects nested up to three levels.
pub fn schema() -> impl Strategy<Value = Schema> {
    let leaf = prop_oneof![
        integer().prop_map(Schema::from),
        string().prop_map(Schema::from),
        "[A-Za-z./#]{1,12}".prop_map(|r| Schema::from(RefSchema::new(r))),
        raw().prop_map(Schema::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        (
            metadata(),
            prop::collection::vec(("[a-z]{1,6}", inner, any::<bool>()), 0..4),
            any::<bool>(),
        )
            .prop_map(|(metadata, members, additional_properties)| {
                let mut properties = IndexMap::new();
                let mut required = Vec::new();
                for (name, schema, is_required) in members {
                    if properties.contains_key(&name) {
                        continue;
                    }
                    if is_required {
                        required.push(name.clone());
                    }
                    properties.insert(name, schema);
                }
                Schema::from(
                    ObjectSchema::new(metadata, properties, required, additional_properties)
                        .expect("required names are declared once"),
                )
            })
    })
}
