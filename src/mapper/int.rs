use super::TypeMapper;
use crate::error::ConstraintViolation;
use crate::ir::Ty;
use crate::schema::{IntegerSchema, Schema};

/// `int<a, b>` becomes a bounded integer; any other integer type an
/// unconstrained one.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerTypeMapper;

impl TypeMapper for IntegerTypeMapper {
    fn name(&self) -> &'static str {
        "integer"
    }

    fn map(&self, ty: &Ty) -> Result<Option<Schema>, ConstraintViolation> {
        if let Ty::IntegerRange { min, max } = ty {
            return IntegerSchema::range(*min, *max).map(|s| Some(s.into()));
        }

        if ty.is_integer() {
            return Ok(Some(IntegerSchema::unconstrained().into()));
        }

        Ok(None)
    }
}
