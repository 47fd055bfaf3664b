//! Validated table paging and gated ad-hoc reads.

use std::sync::Arc;

use rolodex_core::value::{CellValue, QueryResult, ResultRow};
use rolodex_schema::{SchemaReflector, quote_identifier};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Executor, Row, SqlitePool, Statement};

use crate::error::QueryError;
use crate::gate::QueryGate;

/// One browse page plus the table's total row count.
#[derive(Debug)]
pub struct BrowsePage {
    pub result: QueryResult,
    pub total_count: i64,
}

/// Executes reads against the live database.
#[derive(Clone)]
pub struct QueryGateway {
    pool: SqlitePool,
    reflector: SchemaReflector,
    gate: Arc<dyn QueryGate>,
}

impl QueryGateway {
    pub fn new(pool: SqlitePool, gate: Arc<dyn QueryGate>) -> Self {
        let reflector = SchemaReflector::new(pool.clone());
        Self {
            pool,
            reflector,
            gate,
        }
    }

    /// Page through one table.
    ///
    /// The table name is checked against the live list before being
    /// interpolated; limit and offset travel as bound parameters.
    pub async fn browse(
        &self,
        table: &str,
        offset: u64,
        limit: u64,
    ) -> Result<BrowsePage, QueryError> {
        if !self
            .reflector
            .list_tables()
            .await?
            .iter()
            .any(|name| name == table)
        {
            tracing::debug!(table, "browse rejected: unknown table");
            return Err(QueryError::UnknownTable);
        }

        let quoted = quote_identifier(table);
        let sql = format!("SELECT * FROM {quoted} LIMIT ? OFFSET ?");

        // Column names come from statement metadata so an empty page
        // still reports them.
        let statement = (&self.pool).prepare(sql.as_str()).await?;
        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        let rows = statement
            .query()
            .bind(clamp_to_i64(limit))
            .bind(clamp_to_i64(offset))
            .fetch_all(&self.pool)
            .await?;

        let total_count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {quoted}"))
            .fetch_one(&self.pool)
            .await?;

        Ok(BrowsePage {
            result: build_result(columns, &rows),
            total_count,
        })
    }

    /// Fetch every row of one table, unpaged.
    pub async fn dump_table(&self, table: &str) -> Result<QueryResult, QueryError> {
        if !self
            .reflector
            .list_tables()
            .await?
            .iter()
            .any(|name| name == table)
        {
            return Err(QueryError::UnknownTable);
        }

        let sql = format!("SELECT * FROM {}", quote_identifier(table));
        let statement = (&self.pool).prepare(sql.as_str()).await?;
        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        let rows = statement.query().fetch_all(&self.pool).await?;

        Ok(build_result(columns, &rows))
    }

    /// Run one gated ad-hoc query and stringify its result set.
    ///
    /// The query runs inside a transaction that is always rolled back;
    /// nothing on this path ever commits. Engine failures surface with
    /// the engine's own message.
    pub async fn execute_readonly(&self, raw_query: &str) -> Result<QueryResult, QueryError> {
        let query = raw_query.trim();
        if query.is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        self.gate.check(query)?;

        let mut tx = self.pool.begin().await?;

        let statement = (&mut *tx).prepare(query).await.map_err(engine_error)?;
        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        let rows = statement
            .query()
            .fetch_all(&mut *tx)
            .await
            .map_err(engine_error)?;

        tx.rollback().await?;

        tracing::debug!(rows = rows.len(), "ad-hoc query executed");
        Ok(build_result(columns, &rows))
    }
}

/// Map an execution failure to the pass-through error, keeping the
/// engine's message intact.
fn engine_error(e: sqlx::Error) -> QueryError {
    match e {
        sqlx::Error::Database(db) => QueryError::Execution(db.message().to_string()),
        other => QueryError::Execution(other.to_string()),
    }
}

fn clamp_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn build_result(columns: Vec<String>, rows: &[SqliteRow]) -> QueryResult {
    let result_rows = rows
        .iter()
        .map(|row| {
            let mut out = ResultRow::with_capacity(columns.len());
            for (index, name) in columns.iter().enumerate() {
                out.push(name.clone(), cell_to_value(row, index));
            }
            out
        })
        .collect();
    QueryResult::new(columns, result_rows)
}

// SQLite values are dynamically typed; probe the storage classes in
// order and reduce whatever matches to its string form.
fn cell_to_value(row: &SqliteRow, index: usize) -> CellValue {
    if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
        return match value {
            Some(v) => CellValue::Text(v.to_string()),
            None => CellValue::Null,
        };
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(index) {
        return match value {
            Some(v) => CellValue::Text(v.to_string()),
            None => CellValue::Null,
        };
    }
    if let Ok(value) = row.try_get::<Option<String>, _>(index) {
        return match value {
            Some(v) => CellValue::Text(v),
            None => CellValue::Null,
        };
    }
    if let Ok(value) = row.try_get::<Option<Vec<u8>>, _>(index) {
        return match value {
            Some(bytes) => CellValue::Text(hex::encode(bytes)),
            None => CellValue::Null,
        };
    }
    CellValue::Null
}
