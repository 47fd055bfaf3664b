//! Table descriptors produced by the schema reflector.
//!
//! Field names follow the wire shape the dashboard consumes (`type`,
//! `primary_key`, `constrained_columns`, ...), with Rust-side names kept
//! descriptive via serde renames.

use serde::Serialize;

/// Full description of one table, reflected live from the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
    pub indexes: Vec<IndexDescriptor>,
}

/// One column of a table.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,

    /// Declared SQL type, as the catalog spells it.
    #[serde(rename = "type")]
    pub declared_type: String,

    pub nullable: bool,

    #[serde(rename = "primary_key")]
    pub is_primary_key: bool,

    #[serde(rename = "autoincrement")]
    pub is_autoincrement: bool,

    /// Default expression in string form, if the column declares one.
    pub default: Option<String>,
}

/// A foreign key constraint.
#[derive(Debug, Clone, Serialize)]
pub struct ForeignKeyDescriptor {
    #[serde(rename = "constrained_columns")]
    pub local_columns: Vec<String>,

    #[serde(rename = "referred_table")]
    pub referenced_table: String,

    #[serde(rename = "referred_columns")]
    pub referenced_columns: Vec<String>,
}

/// An index over a table.
#[derive(Debug, Clone, Serialize)]
pub struct IndexDescriptor {
    pub name: String,
    pub columns: Vec<String>,

    #[serde(rename = "unique")]
    pub is_unique: bool,
}
