//! Catalog reflection via SQLite pragmas.

use std::collections::BTreeMap;

use rolodex_core::table::{
    ColumnDescriptor, ForeignKeyDescriptor, IndexDescriptor, TableDescriptor,
};
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use crate::error::SchemaError;

/// Quote an identifier for interpolation into SQLite statements.
///
/// Pragmas cannot take bound parameters, so every table or index name
/// that reaches one goes through this.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Outcome of describing one table during a full walk: the descriptor,
/// or the failure that prevented it.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TableReflection {
    Described(TableDescriptor),
    Failed { error: String },
}

/// Reflects tables, columns, foreign keys, and indexes from a live pool.
#[derive(Clone)]
pub struct SchemaReflector {
    pool: SqlitePool,
}

impl SchemaReflector {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All user tables, alphabetically. Internal `sqlite_*` tables are
    /// excluded.
    pub async fn list_tables(&self) -> Result<Vec<String>, SchemaError> {
        let rows = sqlx::query(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| row.get::<String, _>("name"))
            .collect())
    }

    /// Describe one table.
    ///
    /// The name is validated against the live table list before any
    /// pragma runs; an unknown name fails with `UnknownTable`.
    pub async fn describe(&self, table: &str) -> Result<TableDescriptor, SchemaError> {
        if !self.list_tables().await?.iter().any(|name| name == table) {
            tracing::debug!(table, "describe rejected: unknown table");
            return Err(SchemaError::UnknownTable);
        }
        self.describe_unchecked(table).await
    }

    /// Describe every live table. A failure on one table is recorded as
    /// its `Failed` entry and the walk continues.
    pub async fn describe_all(&self) -> Result<BTreeMap<String, TableReflection>, SchemaError> {
        let mut tables = BTreeMap::new();
        for name in self.list_tables().await? {
            match self.describe_unchecked(&name).await {
                Ok(descriptor) => {
                    tables.insert(name, TableReflection::Described(descriptor));
                }
                Err(e) => {
                    tracing::warn!(table = %name, error = %e, "table reflection failed");
                    tables.insert(
                        name,
                        TableReflection::Failed {
                            error: e.to_string(),
                        },
                    );
                }
            }
        }
        Ok(tables)
    }

    async fn describe_unchecked(&self, table: &str) -> Result<TableDescriptor, SchemaError> {
        Ok(TableDescriptor {
            name: table.to_string(),
            columns: self.reflect_columns(table).await?,
            foreign_keys: self.reflect_foreign_keys(table).await?,
            indexes: self.reflect_indexes(table).await?,
        })
    }

    // Columns
    async fn reflect_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>, SchemaError> {
        let rows = sqlx::query(&format!("PRAGMA table_info({})", quote_identifier(table)))
            .fetch_all(&self.pool)
            .await?;

        // Rowid aliasing (and therefore autoincrement) only applies to a
        // lone INTEGER primary key column.
        let pk_count = rows
            .iter()
            .filter(|row| row.get::<i64, _>("pk") > 0)
            .count();

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.get("name");
            let declared_type: String = row.get("type");
            let notnull: i64 = row.get("notnull");
            let default: Option<String> = row.get("dflt_value");
            let pk: i64 = row.get("pk");

            let is_primary_key = pk > 0;
            let is_autoincrement =
                is_primary_key && pk_count == 1 && declared_type.eq_ignore_ascii_case("integer");

            columns.push(ColumnDescriptor {
                name,
                declared_type,
                nullable: notnull == 0,
                is_primary_key,
                is_autoincrement,
                default,
            });
        }

        Ok(columns)
    }

    // Foreign keys (grouped by constraint id; `seq` orders the columns
    // inside each one)
    async fn reflect_foreign_keys(
        &self,
        table: &str,
    ) -> Result<Vec<ForeignKeyDescriptor>, SchemaError> {
        let rows = sqlx::query(&format!(
            "PRAGMA foreign_key_list({})",
            quote_identifier(table)
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut groups: BTreeMap<i64, Vec<(i64, String, String, Option<String>)>> =
            BTreeMap::new();
        for row in rows {
            let id: i64 = row.get("id");
            let seq: i64 = row.get("seq");
            let referenced_table: String = row.get("table");
            let local_column: String = row.get("from");
            let referenced_column: Option<String> = row.get("to");

            groups
                .entry(id)
                .or_default()
                .push((seq, referenced_table, local_column, referenced_column));
        }

        let mut foreign_keys = Vec::with_capacity(groups.len());
        for (_, mut members) in groups {
            members.sort_by_key(|(seq, ..)| *seq);

            let referenced_table = members[0].1.clone();
            let local_columns: Vec<String> =
                members.iter().map(|(_, _, local, _)| local.clone()).collect();

            // A NULL `to` column means the constraint implicitly
            // references the primary key of the target table.
            let referenced_columns = if members.iter().any(|(.., to)| to.is_none()) {
                self.primary_key_of(&referenced_table).await?
            } else {
                members.into_iter().filter_map(|(.., to)| to).collect()
            };

            foreign_keys.push(ForeignKeyDescriptor {
                local_columns,
                referenced_table,
                referenced_columns,
            });
        }

        Ok(foreign_keys)
    }

    async fn primary_key_of(&self, table: &str) -> Result<Vec<String>, SchemaError> {
        let rows = sqlx::query(&format!("PRAGMA table_info({})", quote_identifier(table)))
            .fetch_all(&self.pool)
            .await?;

        let mut key: Vec<(i64, String)> = rows
            .into_iter()
            .filter(|row| row.get::<i64, _>("pk") > 0)
            .map(|row| (row.get::<i64, _>("pk"), row.get::<String, _>("name")))
            .collect();
        key.sort_by_key(|(position, _)| *position);

        Ok(key.into_iter().map(|(_, name)| name).collect())
    }

    // Indexes
    async fn reflect_indexes(&self, table: &str) -> Result<Vec<IndexDescriptor>, SchemaError> {
        let rows = sqlx::query(&format!("PRAGMA index_list({})", quote_identifier(table)))
            .fetch_all(&self.pool)
            .await?;

        let mut indexes = Vec::new();
        for row in rows {
            let name: String = row.get("name");
            // Implicit autoindexes back PRIMARY KEY and UNIQUE clauses
            if name.starts_with("sqlite_autoindex") {
                continue;
            }
            let unique: i64 = row.get("unique");

            let member_rows = sqlx::query(&format!("PRAGMA index_info({})", quote_identifier(&name)))
                .fetch_all(&self.pool)
                .await?;
            let mut members: Vec<(i64, Option<String>)> = member_rows
                .into_iter()
                .map(|row| {
                    (
                        row.get::<i64, _>("seqno"),
                        row.get::<Option<String>, _>("name"),
                    )
                })
                .collect();
            members.sort_by_key(|(seqno, _)| *seqno);

            indexes.push(IndexDescriptor {
                name,
                // expression members carry no column name and are skipped
                columns: members.into_iter().filter_map(|(_, name)| name).collect(),
                is_unique: unique != 0,
            });
        }

        // index_list reports newest first; alphabetical is stable
        indexes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(indexes)
    }
}
