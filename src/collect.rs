//! Whole-codebase pass: build every class of every file on a worker pool,
//! ship the results as transport records, and merge them by class name.
//!
//! Each class is built independently of every other class, so the merged
//! output does not depend on worker scheduling.
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::PathBuf;

use rayon::prelude::*;
use serde_json::Value;

use crate::builder::{ClassDescriptor, ClassReflection, ClassSchemaBuilder};
use crate::schema::Schema;
use crate::transport::{self, SchemaRecord};

/// Classes declared in one analyzed file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub classes: Vec<ClassDescriptor>,
}

/// An encoded record and the file it came from.
#[derive(Debug, Clone)]
pub struct Collected {
    pub file: PathBuf,
    pub record: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub file: PathBuf,
    pub class: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Collection {
    pub records: Vec<Collected>,
    pub failures: Vec<Failure>,
}

impl Collection {
    fn extend(&mut self, other: Collection) {
        self.records.extend(other.records);
        self.failures.extend(other.failures);
    }
}

#[derive(Debug, Default)]
pub struct Merged {
    pub schemas: BTreeMap<String, Schema>,
    pub failures: Vec<Failure>,
}

pub fn collect_file(builder: &ClassSchemaBuilder, file: &SourceFile) -> Collection {
    let mut out = Collection::default();
    for class in &file.classes {
        if class.is_anonymous() {
            continue;
        }
        let encoded = builder
            .build(class)
            .map_err(|e| e.to_string())
            .and_then(|obj| {
                transport::encode(&SchemaRecord::new(class.name(), obj)).map_err(|e| e.to_string())
            });
        match encoded {
            Ok(record) => out.records.push(Collected { file: file.path.clone(), record }),
            Err(message) => {
                tracing::warn!(file = %file.path.display(), class = class.name(), "{message}");
                out.failures.push(Failure {
                    file: file.path.clone(),
                    class: class.name().to_string(),
                    message,
                });
            }
        }
    }
    out
}

/// Files are processed in parallel; results keep the input file order.
pub fn collect_all(builder: &ClassSchemaBuilder, files: &[SourceFile]) -> Collection {
    let parts: Vec<Collection> = files.par_iter().map(|f| collect_file(builder, f)).collect();
    let mut out = Collection::default();
    for part in parts {
        out.extend(part);
    }
    tracing::info!(
        files = files.len(),
        records = out.records.len(),
        failures = out.failures.len(),
        "collection finished"
    );
    out
}

pub fn merge(records: Vec<Collected>) -> Merged {
    let mut chosen: BTreeMap<String, (PathBuf, Schema)> = BTreeMap::new();
    let mut failures = Vec::new();

    for Collected { file, record } in records {
        let class_hint = record
            .get("class_name")
            .and_then(Value::as_str)
            .unwrap_or("<unknown>")
            .to_string();
        let SchemaRecord { class_name, schema } = match transport::decode(record) {
            Ok(r) => r,
            Err(err) => {
                tracing::warn!(
                    file = %file.display(),
                    class = %class_hint,
                    "dropping record: {err}"
                );
                failures.push(Failure { file, class: class_hint, message: err.to_string() });
                continue;
            }
        };

        match chosen.entry(class_name) {
            Entry::Vacant(slot) => {
                slot.insert((file, schema));
            }
            Entry::Occupied(mut slot) => {
                let class_name = slot.key().clone();
                let (kept_file, kept) = slot.get_mut();
                if render(kept) != render(&schema) {
                    tracing::warn!(
                        class = %class_name,
                        first = %kept_file.display(),
                        second = %file.display(),
                        "conflicting schemas for one class; keeping the first file in path order"
                    );
                }
                if file < *kept_file {
                    *kept_file = file;
                    *kept = schema;
                }
            }
        }
    }

    Merged {
        schemas: chosen.into_iter().map(|(k, (_, s))| (k, s)).collect(),
        failures,
    }
}

fn render(schema: &Schema) -> String {
    schema.to_json().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{MemberDescriptor, Visibility};
    use crate::ir::Ty;
    use serde_json::json;

    fn class(name: &str, members: Vec<(&str, Ty)>) -> ClassDescriptor {
        ClassDescriptor::new(
            name,
            members
                .into_iter()
                .map(|(n, t)| MemberDescriptor::new(n, Visibility::Public, t))
                .collect(),
        )
    }

    fn file(path: &str, classes: Vec<ClassDescriptor>) -> SourceFile {
        SourceFile { path: PathBuf::from(path), classes }
    }

    #[test]
    fn skips_anonymous_and_reports_broken_classes() {
        let mut anon = class("class@anonymous", vec![("id", Ty::Integer)]);
        anon.anonymous = true;
        let broken = class("App\\Broken", vec![("n", Ty::range(Some(3), Some(1)))]);
        let ok = class("App\\Ok", vec![("n", Ty::Integer)]);

        let out = collect_file(&ClassSchemaBuilder::default(), &file("src/a.php", vec![anon, broken, ok]));

        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].record["class_name"], "App\\Ok");
        assert_eq!(out.failures.len(), 1);
        assert_eq!(out.failures[0].class, "App\\Broken");
        assert!(out.failures[0].message.contains("\"minimum\""));
    }

    #[test]
    fn merge_is_independent_of_record_order() {
        let files: Vec<SourceFile> = (0..16)
            .map(|i| {
                file(
                    &format!("src/f{i:02}.php"),
                    vec![class(&format!("App\\C{i}"), vec![("v", Ty::range(Some(0), Some(i)))])],
                )
            })
            .collect();
        let builder = ClassSchemaBuilder::default();
        let forward = collect_all(&builder, &files).records;
        let mut backward = forward.clone();
        backward.reverse();

        let a = merge(forward);
        let b = merge(backward);
        assert_eq!(a.schemas.len(), 16);
        let render_all = |m: &Merged| {
            m.schemas.iter().map(|(k, v)| format!("{k}={}", render(v))).collect::<Vec<_>>()
        };
        assert_eq!(render_all(&a), render_all(&b));
    }

    #[test]
    fn duplicate_class_keeps_first_file_in_path_order() {
        let builder = ClassSchemaBuilder::default();
        let files = vec![
            file("src/z.php", vec![class("App\\Dup", vec![("late", Ty::Integer)])]),
            file("src/a.php", vec![class("App\\Dup", vec![("early", Ty::Integer)])]),
        ];
        let merged = merge(collect_all(&builder, &files).records);
        let obj = merged.schemas["App\\Dup"].as_object().unwrap();
        assert!(obj.property("early").is_some());
        assert!(obj.property("late").is_none());
    }

    #[test]
    fn corrupt_records_are_reported_not_substituted() {
        let records = vec![
            Collected { file: "a".into(), record: json!({"class_name": "App\\X", "schema": {"kind": "integer", "node": {"minimum": 2, "maximum": 1}}}) },
            Collected { file: "b".into(), record: json!(42) },
        ];
        let merged = merge(records);
        assert!(merged.schemas.is_empty());
        assert_eq!(merged.failures.len(), 2);
        assert_eq!(merged.failures[0].class, "App\\X");
        assert_eq!(merged.failures[1].class, "<unknown>");
    }
}
