//! Commission persistence.

use chrono::NaiveDateTime;
use rolodex_core::Commission;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::clamp;

/// A commission joined with its client's name for the admin listing.
/// `client_name` falls back to "Unknown" when the client row is gone.
#[derive(Debug, Clone)]
pub struct CommissionWithClient {
    pub commission: Commission,
    pub client_name: String,
}

#[derive(Clone)]
pub struct CommissionStore {
    pool: SqlitePool,
}

impl CommissionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        client_id: i64,
        amount: f64,
        source: Option<&str>,
    ) -> anyhow::Result<Commission> {
        let id = sqlx::query("INSERT INTO commissions (client_id, amount, source) VALUES (?, ?, ?)")
            .bind(client_id)
            .bind(amount)
            .bind(source)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        self.find_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("inserted commission {id} not found"))
    }

    pub async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Commission>> {
        let row = sqlx::query(
            "SELECT id, client_id, amount, source, created_at FROM commissions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(from_row).transpose()
    }

    pub async fn page(&self, offset: u64, limit: u64) -> anyhow::Result<Vec<Commission>> {
        let rows = sqlx::query(
            "SELECT id, client_id, amount, source, created_at FROM commissions LIMIT ? OFFSET ?",
        )
        .bind(clamp(limit))
        .bind(clamp(offset))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(from_row).collect()
    }

    /// Every commission recorded for one client.
    pub async fn for_client(&self, client_id: i64) -> anyhow::Result<Vec<Commission>> {
        let rows = sqlx::query(
            "SELECT id, client_id, amount, source, created_at FROM commissions WHERE client_id = ?",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(from_row).collect()
    }

    /// Page of commissions with client names resolved in one join.
    pub async fn page_with_client(
        &self,
        offset: u64,
        limit: u64,
    ) -> anyhow::Result<Vec<CommissionWithClient>> {
        let rows = sqlx::query(
            "SELECT c.id, c.client_id, c.amount, c.source, c.created_at, \
                    cl.name AS client_name \
             FROM commissions c LEFT JOIN clients cl ON cl.id = c.client_id \
             LIMIT ? OFFSET ?",
        )
        .bind(clamp(limit))
        .bind(clamp(offset))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let client_name = row
                    .try_get::<Option<String>, _>("client_name")?
                    .unwrap_or_else(|| "Unknown".to_string());
                Ok(CommissionWithClient {
                    commission: from_row(row)?,
                    client_name,
                })
            })
            .collect()
    }

    pub async fn recent(&self, limit: u64) -> anyhow::Result<Vec<Commission>> {
        let rows = sqlx::query(
            "SELECT id, client_id, amount, source, created_at FROM commissions \
             ORDER BY created_at DESC LIMIT ?",
        )
        .bind(clamp(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(from_row).collect()
    }

    pub async fn count(&self) -> anyhow::Result<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM commissions")
            .fetch_one(&self.pool)
            .await?)
    }

    pub async fn total_amount(&self) -> anyhow::Result<f64> {
        Ok(
            sqlx::query_scalar("SELECT COALESCE(SUM(amount), 0.0) FROM commissions")
                .fetch_one(&self.pool)
                .await?,
        )
    }
}

fn from_row(row: SqliteRow) -> anyhow::Result<Commission> {
    Ok(Commission {
        id: row.try_get("id")?,
        client_id: row.try_get("client_id")?,
        amount: row.try_get("amount")?,
        source: row.try_get("source")?,
        created_at: row
            .try_get::<Option<NaiveDateTime>, _>("created_at")?
            .map(|naive| naive.and_utc()),
    })
}
