use super::TypeMapper;
use crate::error::ConstraintViolation;
use crate::ir::Ty;
use crate::schema::{Schema, StringDraft, StringSchema};

/// String kinds. Not part of the default chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringTypeMapper;

impl TypeMapper for StringTypeMapper {
    fn name(&self) -> &'static str {
        "string"
    }

    fn map(&self, ty: &Ty) -> Result<Option<Schema>, ConstraintViolation> {
        if !ty.is_string() {
            return Ok(None);
        }

        let draft = match ty {
            Ty::NonEmptyString => StringDraft { min_length: Some(1), ..StringDraft::default() },
            _ => match constant_strings(ty) {
                Some(values) => StringDraft { r#enum: Some(values), ..StringDraft::default() },
                None => StringDraft::default(),
            },
        };
        StringSchema::new(draft).map(|s| Some(s.into()))
    }
}

/// Distinct literal values, first-seen order, if the type is made of literals only.
fn constant_strings(ty: &Ty) -> Option<Vec<String>> {
    let mut out = Vec::new();
    let mut push = |t: &Ty| match t {
        Ty::ConstantString { value } => {
            if !out.contains(value) {
                out.push(value.clone());
            }
            true
        }
        _ => false,
    };
    let all_literal = match ty {
        Ty::Union { types } => types.iter().all(&mut push),
        other => push(other),
    };
    all_literal.then_some(out)
}
