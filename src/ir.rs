// Resolved member types as handed over by the host analyzer. No schema
// knowledge here; mappers decide what each kind becomes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Narrowest statically known type for reading a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Ty {
    Integer,
    /// `int<min, max>`; an absent bound is open.
    IntegerRange {
        #[serde(default)]
        min: Option<i64>,
        #[serde(default)]
        max: Option<i64>,
    },
    ConstantInteger { value: i64 },
    String,
    NonEmptyString,
    ConstantString { value: String },
    Float,
    Bool,
    Null,
    Mixed,
    Array { item: Box<Ty> },
    Object { class: String },
    Union { types: Vec<Ty> },
}

impl Ty {
    pub fn range(min: Option<i64>, max: Option<i64>) -> Self {
        Ty::IntegerRange { min, max }
    }

    /// True when every value of the type is an integer.
    pub fn is_integer(&self) -> bool {
        match self {
            Ty::Integer | Ty::IntegerRange { .. } | Ty::ConstantInteger { .. } => true,
            Ty::Union { types } => !types.is_empty() && types.iter().all(Ty::is_integer),
            _ => false,
        }
    }

    /// True when every value of the type is a string.
    pub fn is_string(&self) -> bool {
        match self {
            Ty::String | Ty::NonEmptyString | Ty::ConstantString { .. } => true,
            Ty::Union { types } => !types.is_empty() && types.iter().all(Ty::is_string),
            _ => false,
        }
    }

    /// Printable description, in the analyzer's notation.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Integer => f.write_str("int"),
            Ty::IntegerRange { min, max } => {
                let lo = min.map_or_else(|| "min".to_string(), |v| v.to_string());
                let hi = max.map_or_else(|| "max".to_string(), |v| v.to_string());
                write!(f, "int<{lo}, {hi}>")
            }
            Ty::ConstantInteger { value } => write!(f, "{value}"),
            Ty::String => f.write_str("string"),
            Ty::NonEmptyString => f.write_str("non-empty-string"),
            Ty::ConstantString { value } => write!(f, "'{value}'"),
            Ty::Float => f.write_str("float"),
            Ty::Bool => f.write_str("bool"),
            Ty::Null => f.write_str("null"),
            Ty::Mixed => f.write_str("mixed"),
            Ty::Array { item } => write!(f, "array<{item}>"),
            Ty::Object { class } => f.write_str(class),
            Ty::Union { types } => {
                for (i, t) in types.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{t}")?;
                }
                Ok(())
            }
        }
    }
}
