//! Pool construction and schema bootstrap.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Open a pool against `url`, creating the database file on first use.
///
/// Foreign keys stay unenforced. Referential checks happen in the
/// handlers, and reads must keep working when a client row has been
/// deleted out from under its commissions.
pub async fn connect(url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(false);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    Ok(pool)
}

/// Create the three application tables and their indexes if missing.
pub async fn ensure_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    let statements = [
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER NOT NULL,
            email VARCHAR NOT NULL,
            name VARCHAR NOT NULL,
            hashed_password VARCHAR NOT NULL,
            is_active BOOLEAN,
            created_at DATETIME DEFAULT (CURRENT_TIMESTAMP),
            PRIMARY KEY (id)
        )",
        "CREATE UNIQUE INDEX IF NOT EXISTS ix_users_email ON users (email)",
        "CREATE INDEX IF NOT EXISTS ix_users_id ON users (id)",
        "CREATE TABLE IF NOT EXISTS clients (
            id INTEGER NOT NULL,
            name VARCHAR NOT NULL,
            email VARCHAR,
            phone VARCHAR,
            created_at DATETIME DEFAULT (CURRENT_TIMESTAMP),
            PRIMARY KEY (id)
        )",
        "CREATE UNIQUE INDEX IF NOT EXISTS ix_clients_email ON clients (email)",
        "CREATE INDEX IF NOT EXISTS ix_clients_id ON clients (id)",
        "CREATE TABLE IF NOT EXISTS commissions (
            id INTEGER NOT NULL,
            client_id INTEGER NOT NULL,
            amount NUMERIC(12, 2) NOT NULL,
            source VARCHAR,
            created_at DATETIME DEFAULT (CURRENT_TIMESTAMP),
            PRIMARY KEY (id),
            FOREIGN KEY(client_id) REFERENCES clients (id)
        )",
        "CREATE INDEX IF NOT EXISTS ix_commissions_id ON commissions (id)",
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::debug!("schema ensured");
    Ok(())
}
