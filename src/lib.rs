//! JSON Schema documents for the public data members of statically
//! analyzed classes.
//!
//! A [`ClassSchemaBuilder`] walks a class's members, asks a
//! [`TypeMapperRegistry`] for each member's schema and assembles an
//! [`ObjectSchema`]. Schemas serialize to canonical JSON with a fixed key
//! order, so the same input always renders byte-identical output.
pub mod builder;
pub mod cli;
pub mod collect;
pub mod emit;
pub mod error;
pub mod ir;
pub mod jq_exec;
pub mod manifest;
pub mod mapper;
pub mod path_de;
pub mod schema;
pub mod transport;
pub mod writer;

pub use builder::{
    ClassDescriptor, ClassReflection, ClassSchemaBuilder, MemberDescriptor, MemberOrigin,
    Visibility,
};
pub use error::{
    BuildError, ConstraintViolation, MapError, TransportError, UnsupportedType, WriteError,
};
pub use ir::Ty;
pub use mapper::{IntegerTypeMapper, StringTypeMapper, TypeMapper, TypeMapperRegistry};
pub use schema::{
    IntegerSchema, ObjectSchema, RawSchema, RefSchema, Schema, SchemaMetadata, StringSchema,
};
pub use writer::{DirectorySchemaWriter, SchemaWriter};
