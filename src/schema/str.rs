use serde::{Deserialize, Serialize};

use super::SchemaMetadata;
use crate::error::ConstraintViolation;

/// Unchecked field set of a string node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StringDraft {
    #[serde(default, skip_serializing_if = "SchemaMetadata::is_empty")]
    pub metadata: SchemaMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#enum: Option<Vec<String>>,
}

/// String node. Only enum uniqueness is checked here; length, pattern and
/// default are not cross-validated yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringSchema {
    fields: StringDraft,
}

impl StringSchema {
    pub fn new(draft: StringDraft) -> Result<Self, ConstraintViolation> {
        if let Some(values) = &draft.r#enum {
            for (i, value) in values.iter().enumerate() {
                if values[..i].contains(value) {
                    return Err(ConstraintViolation::new("enum", "Enum values must be unique")
                        .with("value", value.as_str()));
                }
            }
        }
        Ok(Self { fields: draft })
    }

    pub fn unconstrained() -> Self {
        Self { fields: StringDraft::default() }
    }

    pub fn metadata(&self) -> &SchemaMetadata {
        &self.fields.metadata
    }

    pub fn min_length(&self) -> Option<u64> {
        self.fields.min_length
    }

    pub fn max_length(&self) -> Option<u64> {
        self.fields.max_length
    }

    pub fn pattern(&self) -> Option<&str> {
        self.fields.pattern.as_deref()
    }

    pub fn format(&self) -> Option<&str> {
        self.fields.format.as_deref()
    }

    pub fn default_value(&self) -> Option<&str> {
        self.fields.default.as_deref()
    }

    pub fn enum_values(&self) -> Option<&[String]> {
        self.fields.r#enum.as_deref()
    }

    pub fn as_draft(&self) -> &StringDraft {
        &self.fields
    }
}
