//! Ordered chain of single-purpose type mappers.
//!
//! The registry asks each mapper in registration order and keeps the first
//! schema produced. A later mapper never sees a type an earlier one matched.
//! New kinds are supported by appending a mapper, not by editing a switch.
pub mod int;
pub mod str;

use std::fmt;

use crate::error::{ConstraintViolation, MapError, UnsupportedType};
use crate::ir::Ty;
use crate::schema::Schema;

pub use int::IntegerTypeMapper;
pub use str::StringTypeMapper;

pub trait TypeMapper: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// `Ok(None)` when the type is not this mapper's business. A recognized
    /// type whose schema cannot be built is an error, not a `None`.
    fn map(&self, ty: &Ty) -> Result<Option<Schema>, ConstraintViolation>;
}

pub struct TypeMapperRegistry {
    mappers: Vec<Box<dyn TypeMapper>>,
}

impl TypeMapperRegistry {
    pub fn new(mappers: Vec<Box<dyn TypeMapper>>) -> Self {
        Self { mappers }
    }

    pub fn empty() -> Self {
        Self { mappers: Vec::new() }
    }

    /// Append a mapper at the lowest priority.
    pub fn with(mut self, mapper: impl TypeMapper + 'static) -> Self {
        self.mappers.push(Box::new(mapper));
        self
    }

    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }

    /// First non-`None` result wins; no match is [`UnsupportedType`].
    pub fn map(&self, ty: &Ty) -> Result<Schema, MapError> {
        for mapper in &self.mappers {
            if let Some(schema) = mapper.map(ty)? {
                tracing::trace!(mapper = mapper.name(), ty = %ty, "type mapped");
                return Ok(schema);
            }
        }
        Err(UnsupportedType { type_name: ty.describe() }.into())
    }
}

impl Default for TypeMapperRegistry {
    fn default() -> Self {
        Self::empty().with(IntegerTypeMapper)
    }
}

// A registry nests inside another registry as a single link of the chain.
impl TypeMapper for TypeMapperRegistry {
    fn name(&self) -> &'static str {
        "registry"
    }

    fn map(&self, ty: &Ty) -> Result<Option<Schema>, ConstraintViolation> {
        match TypeMapperRegistry::map(self, ty) {
            Ok(schema) => Ok(Some(schema)),
            Err(MapError::Unsupported(_)) => Ok(None),
            Err(MapError::Constraint(err)) => Err(err),
        }
    }
}

impl fmt::Debug for TypeMapperRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.mappers.iter().map(|m| m.name())).finish()
    }
}
