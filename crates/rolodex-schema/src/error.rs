//! Error types for schema reflection.

use thiserror::Error;

/// Errors that can occur while reflecting the storage catalog.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The requested table is not in the live table list. The message
    /// stays generic; the offending name is only logged.
    #[error("Table not found")]
    UnknownTable,

    /// Underlying storage failure.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}
