//! Client persistence.

use chrono::NaiveDateTime;
use rolodex_core::Client;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::clamp;

#[derive(Clone)]
pub struct ClientStore {
    pool: SqlitePool,
}

impl ClientStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> anyhow::Result<Client> {
        let id = sqlx::query("INSERT INTO clients (name, email, phone) VALUES (?, ?, ?)")
            .bind(name)
            .bind(email)
            .bind(phone)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        self.find_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("inserted client {id} not found"))
    }

    pub async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Client>> {
        let row = sqlx::query("SELECT id, name, email, phone, created_at FROM clients WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(from_row).transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Client>> {
        let row =
            sqlx::query("SELECT id, name, email, phone, created_at FROM clients WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        row.map(from_row).transpose()
    }

    pub async fn page(&self, offset: u64, limit: u64) -> anyhow::Result<Vec<Client>> {
        let rows =
            sqlx::query("SELECT id, name, email, phone, created_at FROM clients LIMIT ? OFFSET ?")
                .bind(clamp(limit))
                .bind(clamp(offset))
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(from_row).collect()
    }

    pub async fn recent(&self, limit: u64) -> anyhow::Result<Vec<Client>> {
        let rows = sqlx::query(
            "SELECT id, name, email, phone, created_at FROM clients \
             ORDER BY created_at DESC LIMIT ?",
        )
        .bind(clamp(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(from_row).collect()
    }

    pub async fn count(&self) -> anyhow::Result<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?)
    }
}

fn from_row(row: SqliteRow) -> anyhow::Result<Client> {
    Ok(Client {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        created_at: row
            .try_get::<Option<NaiveDateTime>, _>("created_at")?
            .map(|naive| naive.and_utc()),
    })
}
