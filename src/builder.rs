//! Class → object schema.
//!
//! Walks the physically declared members of one class, keeps the public
//! ones whose type a mapper understands, and decides which of them are
//! required. Members without a mapper are dropped without error; constraint
//! violations abort the class.
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::{BuildError, MapError};
use crate::ir::Ty;
use crate::mapper::TypeMapperRegistry;
use crate::schema::{ObjectSchema, SchemaMetadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// Where a member's declaration comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MemberOrigin {
    #[default]
    Declared,
    /// Folded into a constructor parameter.
    Promoted {
        #[serde(default, rename = "paramHasDefault")]
        param_has_default: bool,
    },
    /// Only known from a doc annotation; not a physical member.
    Annotated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDescriptor {
    pub name: String,
    pub visibility: Visibility,
    #[serde(default)]
    pub has_default: bool,
    #[serde(default)]
    pub origin: MemberOrigin,
    /// Readable type.
    #[serde(rename = "type")]
    pub ty: Ty,
}

impl MemberDescriptor {
    pub fn new(name: impl Into<String>, visibility: Visibility, ty: Ty) -> Self {
        Self {
            name: name.into(),
            visibility,
            has_default: false,
            origin: MemberOrigin::Declared,
            ty,
        }
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn promoted(mut self, param_has_default: bool) -> Self {
        self.origin = MemberOrigin::Promoted { param_has_default };
        self
    }

    pub fn annotated(mut self) -> Self {
        self.origin = MemberOrigin::Annotated;
        self
    }

    /// A default on the member, or on the constructor parameter it was
    /// promoted from, makes it optional.
    pub fn is_optional(&self) -> bool {
        self.has_default
            || matches!(self.origin, MemberOrigin::Promoted { param_has_default: true })
    }
}

/// Read-only view of a class, as provided by the host analyzer.
pub trait ClassReflection {
    /// Fully-qualified name.
    fn name(&self) -> &str;
    fn is_anonymous(&self) -> bool;
    /// Members in declaration order.
    fn members(&self) -> &[MemberDescriptor];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub name: String,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(default)]
    pub members: Vec<MemberDescriptor>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>, members: Vec<MemberDescriptor>) -> Self {
        Self { name: name.into(), anonymous: false, members }
    }
}

impl ClassReflection for ClassDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }
}

#[derive(Debug, Default)]
pub struct ClassSchemaBuilder {
    registry: TypeMapperRegistry,
}

impl ClassSchemaBuilder {
    pub fn new(registry: TypeMapperRegistry) -> Self {
        Self { registry }
    }

    pub fn build<C: ClassReflection + ?Sized>(
        &self,
        class: &C,
    ) -> Result<ObjectSchema, BuildError> {
        if class.is_anonymous() {
            return Err(BuildError::AnonymousClass { class: class.name().to_string() });
        }

        let mut properties = IndexMap::new();
        let mut required = Vec::new();
        let mut seen = IndexSet::new();

        for member in class.members() {
            if member.origin == MemberOrigin::Annotated {
                tracing::debug!(
                    class = class.name(),
                    member = %member.name,
                    "skipping annotation-only member"
                );
                continue;
            }
            // Host reflection lists each member once; the first declaration
            // decides even when it is later filtered out.
            if !seen.insert(member.name.as_str()) {
                continue;
            }
            if member.visibility != Visibility::Public {
                tracing::debug!(
                    class = class.name(),
                    member = %member.name,
                    visibility = ?member.visibility,
                    "skipping non-public member"
                );
                continue;
            }

            let schema = match self.registry.map(&member.ty) {
                Ok(schema) => schema,
                Err(MapError::Unsupported(err)) => {
                    tracing::debug!(
                        class = class.name(),
                        member = %member.name,
                        "{err}; member omitted"
                    );
                    continue;
                }
                Err(MapError::Constraint(source)) => {
                    return Err(BuildError::Constraint {
                        class: class.name().to_string(),
                        member: member.name.clone(),
                        source,
                    });
                }
            };

            properties.insert(member.name.clone(), schema);
            if !member.is_optional() {
                required.push(member.name.clone());
            }
        }

        // Names in `required` were just inserted into `properties`, once each.
        ObjectSchema::new(SchemaMetadata::default(), properties, required, false).map_err(|source| {
            BuildError::Constraint {
                class: class.name().to_string(),
                member: String::new(),
                source,
            }
        })
    }
}
