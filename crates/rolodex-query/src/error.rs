//! Error types for the query gateway.

use rolodex_schema::SchemaError;
use thiserror::Error;

/// Errors produced by the gate and the gateway.
///
/// `EmptyQuery`, `NotReadOnly`, and `UnknownTable` carry the exact
/// messages the HTTP layer returns verbatim.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The submitted query was blank after trimming.
    #[error("Query cannot be empty")]
    EmptyQuery,

    /// The gate did not accept the query as a read.
    #[error("Only SELECT queries are allowed")]
    NotReadOnly,

    /// Browse was pointed at a table that is not in the live list.
    #[error("Table not found")]
    UnknownTable,

    /// The engine rejected the query; its message passes through
    /// untouched.
    #[error("Query execution error: {0}")]
    Execution(String),

    /// Storage failure outside query execution itself.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl From<SchemaError> for QueryError {
    fn from(e: SchemaError) -> Self {
        match e {
            SchemaError::UnknownTable => QueryError::UnknownTable,
            SchemaError::Storage(e) => QueryError::Storage(e),
        }
    }
}
