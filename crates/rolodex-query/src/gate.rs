//! Pluggable read-only gates for ad-hoc queries.

use std::sync::Arc;

use rolodex_core::config::GateKind;
use sqlparser::ast::Statement;
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;

use crate::error::QueryError;

/// Decides whether an ad-hoc query may run.
///
/// Callers hand in already-trimmed, non-empty query text.
pub trait QueryGate: Send + Sync {
    fn check(&self, query: &str) -> Result<(), QueryError>;
}

/// Case-insensitive `SELECT` prefix check.
///
/// Purely syntactic: any text whose first six characters spell `SELECT`
/// passes, whitespace after the keyword not required.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrefixGate;

impl QueryGate for PrefixGate {
    fn check(&self, query: &str) -> Result<(), QueryError> {
        match query.as_bytes().get(..6) {
            Some(prefix) if prefix.eq_ignore_ascii_case(b"SELECT") => Ok(()),
            _ => Err(QueryError::NotReadOnly),
        }
    }
}

/// Full parse. Accepts exactly one statement, and only when that
/// statement is a plain query.
pub struct ParsingGate {
    dialect: SQLiteDialect,
}

impl ParsingGate {
    pub fn new() -> Self {
        Self {
            dialect: SQLiteDialect {},
        }
    }
}

impl Default for ParsingGate {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryGate for ParsingGate {
    fn check(&self, query: &str) -> Result<(), QueryError> {
        let statements = Parser::parse_sql(&self.dialect, query).map_err(|e| {
            tracing::debug!(error = %e, "query rejected: parse failure");
            QueryError::NotReadOnly
        })?;

        match statements.as_slice() {
            [Statement::Query(_)] => Ok(()),
            _ => Err(QueryError::NotReadOnly),
        }
    }
}

/// Build the gate selected by configuration.
pub fn gate_for(kind: GateKind) -> Arc<dyn QueryGate> {
    match kind {
        GateKind::Prefix => Arc::new(PrefixGate),
        GateKind::Parse => Arc::new(ParsingGate::new()),
    }
}
