use indexmap::IndexMap;

use super::{Schema, SchemaMetadata};
use crate::error::ConstraintViolation;

/// Object node. `properties` keeps declaration order; every `required` name
/// is a key of `properties`, listed once.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectSchema {
    metadata: SchemaMetadata,
    properties: IndexMap<String, Schema>,
    required: Vec<String>,
    additional_properties: bool,
}

impl ObjectSchema {
    pub fn new(
        metadata: SchemaMetadata,
        properties: IndexMap<String, Schema>,
        required: Vec<String>,
        additional_properties: bool,
    ) -> Result<Self, ConstraintViolation> {
        for (i, name) in required.iter().enumerate() {
            if !properties.contains_key(name) {
                return Err(ConstraintViolation::new("required", "Required property is not declared")
                    .with("property", name.as_str()));
            }
            if required[..i].contains(name) {
                return Err(ConstraintViolation::new("required", "Required property is listed twice")
                    .with("property", name.as_str()));
            }
        }
        Ok(Self { metadata, properties, required, additional_properties })
    }

    /// Closed object without properties.
    pub fn empty() -> Self {
        Self {
            metadata: SchemaMetadata::default(),
            properties: IndexMap::new(),
            required: Vec::new(),
            additional_properties: false,
        }
    }

    pub fn metadata(&self) -> &SchemaMetadata {
        &self.metadata
    }

    pub fn properties(&self) -> &IndexMap<String, Schema> {
        &self.properties
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn additional_properties(&self) -> bool {
        self.additional_properties
    }

    pub fn property(&self, name: &str) -> Option<&Schema> {
        self.properties.get(name)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}
