//! Persisted records: identities, clients, commissions.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// An account that can sign in to the admin backend.
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    pub name: String,
    /// SHA-256 hex digest of the password. Never serialized.
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// A business contact commissions are tracked against.
#[derive(Debug, Clone, Serialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A commission earned from a client.
#[derive(Debug, Clone, Serialize)]
pub struct Commission {
    pub id: i64,
    pub client_id: i64,
    pub amount: f64,
    pub source: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}
