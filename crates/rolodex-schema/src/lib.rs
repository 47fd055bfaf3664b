//! # rolodex-schema
//!
//! Live reflection of the SQLite catalog: table lists, column shapes,
//! foreign keys, and indexes. Descriptors are produced fresh on every
//! call, so they always match the current schema.

pub mod error;
pub mod reflect;

pub use error::SchemaError;
pub use reflect::{SchemaReflector, TableReflection, quote_identifier};
