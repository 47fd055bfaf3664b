//! Audit event types.
//!
//! Format follows: `[timestamp] EVENT_TYPE actor=... [table=...] [sql=...]`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type of audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    // ===== Session events =====
    /// An identity signed in and received a token.
    SignIn,
    /// A sign-in attempt was rejected.
    SignInFailed,
    /// A new identity was registered.
    Registered,
    /// A bearer token was rejected at the session boundary.
    TokenRejected,

    // ===== Inspection events =====
    /// The schema (or part of it) was read.
    SchemaRead,
    /// A table was paged through.
    TableBrowsed,
    /// An ad-hoc query ran to completion.
    QueryExecuted,
    /// An ad-hoc query was turned away by the gate.
    QueryRejected,
    /// An ad-hoc query reached the engine and failed there.
    QueryFailed,

    // ===== Data events =====
    /// A record was created through the collaborator surface.
    RecordCreated,
}

impl std::fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SignIn => write!(f, "SIGN_IN"),
            Self::SignInFailed => write!(f, "SIGN_IN_FAILED"),
            Self::Registered => write!(f, "REGISTERED"),
            Self::TokenRejected => write!(f, "TOKEN_REJECTED"),
            Self::SchemaRead => write!(f, "SCHEMA_READ"),
            Self::TableBrowsed => write!(f, "TABLE_BROWSED"),
            Self::QueryExecuted => write!(f, "QUERY_EXECUTED"),
            Self::QueryRejected => write!(f, "QUERY_REJECTED"),
            Self::QueryFailed => write!(f, "QUERY_FAILED"),
            Self::RecordCreated => write!(f, "RECORD_CREATED"),
        }
    }
}

/// An audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event ID.
    pub event_id: Uuid,

    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,

    /// Event type.
    pub event_type: AuditEventType,

    /// Acting identity's email. Absent when the request never
    /// authenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// Table the event touched, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    /// Ad-hoc query text, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,

    /// Number of rows returned or created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,

    /// Failure detail, for rejected and failed events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditEvent {
    /// Create a new audit event of the given type.
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            event_type,
            actor: None,
            table: None,
            sql: None,
            row_count: None,
            error: None,
        }
    }

    /// Create a builder for an audit event.
    pub fn builder(event_type: AuditEventType) -> AuditEventBuilder {
        AuditEventBuilder::new(event_type)
    }

    /// Format the event as a human-readable log line.
    pub fn to_log_line(&self) -> String {
        let mut line = format!(
            "[{}] {}",
            self.occurred_at.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            self.event_type,
        );

        if let Some(ref actor) = self.actor {
            line.push_str(&format!(" actor={}", actor));
        }

        if let Some(ref table) = self.table {
            line.push_str(&format!(" table={}", table));
        }

        if let Some(ref sql) = self.sql {
            // Truncate long SQL for console output, on a char boundary
            let sql_preview = match sql.char_indices().nth(100) {
                Some((cut, _)) => format!("{}...", &sql[..cut]),
                None => sql.clone(),
            };
            line.push_str(&format!(" sql=\"{}\"", sql_preview.replace('\n', " ")));
        }

        if let Some(row_count) = self.row_count {
            line.push_str(&format!(" rows={}", row_count));
        }

        if let Some(ref error) = self.error {
            line.push_str(&format!(" error=\"{}\"", error.replace('"', "'")));
        }

        line
    }
}

/// Builder for creating audit events.
#[derive(Debug)]
pub struct AuditEventBuilder {
    event: AuditEvent,
}

impl AuditEventBuilder {
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            event: AuditEvent::new(event_type),
        }
    }

    /// Set the acting identity's email.
    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.event.actor = Some(actor.into());
        self
    }

    /// Set the table touched.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.event.table = Some(table.into());
        self
    }

    /// Set the ad-hoc query text.
    pub fn sql(mut self, sql: impl Into<String>) -> Self {
        self.event.sql = Some(sql.into());
        self
    }

    /// Set the row count.
    pub fn row_count(mut self, count: u64) -> Self {
        self.event.row_count = Some(count);
        self
    }

    /// Set the failure detail.
    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.event.error = Some(error.into());
        self
    }

    /// Build the audit event.
    pub fn build(self) -> AuditEvent {
        self.event
    }
}
