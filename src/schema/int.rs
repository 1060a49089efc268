use serde::{Deserialize, Serialize};

use super::SchemaMetadata;
use crate::error::ConstraintViolation;

/// Unchecked field set of an integer node. Turned into an [`IntegerSchema`]
/// only through [`IntegerSchema::new`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntegerDraft {
    #[serde(default, skip_serializing_if = "SchemaMetadata::is_empty")]
    pub metadata: SchemaMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#enum: Option<Vec<i64>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntegerSchema {
    fields: IntegerDraft,
}

impl IntegerSchema {
    pub fn new(draft: IntegerDraft) -> Result<Self, ConstraintViolation> {
        check(&draft)?;
        Ok(Self { fields: draft })
    }

    /// `{"type": "integer"}` with no bounds.
    pub fn unconstrained() -> Self {
        Self { fields: IntegerDraft::default() }
    }

    /// Closed or half-open interval; an absent bound stays absent.
    pub fn range(minimum: Option<i64>, maximum: Option<i64>) -> Result<Self, ConstraintViolation> {
        Self::new(IntegerDraft { minimum, maximum, ..IntegerDraft::default() })
    }

    pub fn metadata(&self) -> &SchemaMetadata {
        &self.fields.metadata
    }

    pub fn minimum(&self) -> Option<i64> {
        self.fields.minimum
    }

    pub fn maximum(&self) -> Option<i64> {
        self.fields.maximum
    }

    pub fn default_value(&self) -> Option<i64> {
        self.fields.default
    }

    pub fn enum_values(&self) -> Option<&[i64]> {
        self.fields.r#enum.as_deref()
    }

    pub fn as_draft(&self) -> &IntegerDraft {
        &self.fields
    }
}

fn check(d: &IntegerDraft) -> Result<(), ConstraintViolation> {
    if let (Some(min), Some(max)) = (d.minimum, d.maximum) {
        if min > max {
            return Err(ConstraintViolation::new("minimum", "Min cannot be greater than Max")
                .with("minimum", min)
                .with("maximum", max));
        }
    }

    if let Some(default) = d.default {
        if let Some(min) = d.minimum.filter(|min| default < *min) {
            return Err(ConstraintViolation::new("default", "Default value is lower than minimum")
                .with("default", default)
                .with("minimum", min));
        }
        if let Some(max) = d.maximum.filter(|max| default > *max) {
            return Err(ConstraintViolation::new("default", "Default value is greater than maximum")
                .with("default", default)
                .with("maximum", max));
        }
    }

    if let Some(values) = &d.r#enum {
        if let Some(default) = d.default.filter(|v| !values.contains(v)) {
            return Err(ConstraintViolation::new(
                "default",
                "Default value must be one of the enum values",
            )
            .with("default", default)
            .with("enum", values.clone()));
        }

        for (i, value) in values.iter().enumerate() {
            if let Some(min) = d.minimum.filter(|min| value < min) {
                return Err(ConstraintViolation::new("enum", "Enum value is lower than minimum")
                    .with("value", *value)
                    .with("minimum", min));
            }
            if let Some(max) = d.maximum.filter(|max| value > max) {
                return Err(ConstraintViolation::new("enum", "Enum value is greater than maximum")
                    .with("value", *value)
                    .with("maximum", max));
            }
            if values[..i].contains(value) {
                return Err(ConstraintViolation::new("enum", "Enum values must be unique")
                    .with("value", *value));
            }
        }
    }

    Ok(())
}
