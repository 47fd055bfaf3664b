//! Identity persistence over the users table.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rolodex_auth::CredentialStore;
use rolodex_core::Identity;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::clamp;

const COLUMNS: &str = "id, email, name, hashed_password, is_active, created_at";

#[derive(Clone)]
pub struct IdentityStore {
    pool: SqlitePool,
}

impl IdentityStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an identity and read it back with its generated fields.
    pub async fn insert(
        &self,
        email: &str,
        name: &str,
        hashed_password: &str,
        is_active: bool,
    ) -> anyhow::Result<Identity> {
        let id = sqlx::query(
            "INSERT INTO users (email, name, hashed_password, is_active) VALUES (?, ?, ?, ?)",
        )
        .bind(email)
        .bind(name)
        .bind(hashed_password)
        .bind(is_active)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.find_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("inserted user {id} not found"))
    }

    pub async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Identity>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(from_row).transpose()
    }

    pub async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn page(&self, offset: u64, limit: u64) -> anyhow::Result<Vec<Identity>> {
        let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM users LIMIT ? OFFSET ?"))
            .bind(clamp(limit))
            .bind(clamp(offset))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(from_row).collect()
    }

    /// Newest identities first.
    pub async fn recent(&self, limit: u64) -> anyhow::Result<Vec<Identity>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM users ORDER BY created_at DESC LIMIT ?"
        ))
        .bind(clamp(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(from_row).collect()
    }

    pub async fn count(&self) -> anyhow::Result<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?)
    }

    pub async fn count_active(&self) -> anyhow::Result<i64> {
        Ok(
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_active = 1")
                .fetch_one(&self.pool)
                .await?,
        )
    }
}

#[async_trait]
impl CredentialStore for IdentityStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Identity>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(from_row).transpose()
    }
}

fn from_row(row: SqliteRow) -> anyhow::Result<Identity> {
    Ok(Identity {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        hashed_password: row.try_get("hashed_password")?,
        is_active: row.try_get("is_active")?,
        created_at: row
            .try_get::<Option<NaiveDateTime>, _>("created_at")?
            .map(|naive| naive.and_utc()),
    })
}
