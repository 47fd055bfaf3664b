//! # rolodex-audit
//!
//! Audit logging for the Rolodex admin backend.
//!
//! Every security-relevant operation (sign-ins, rejected tokens, schema
//! reads, table browses, ad-hoc queries, record creation) produces a
//! structured [`AuditEvent`]. Events are emitted through the `tracing`
//! pipeline under the `audit` target, as JSON plus a human-readable
//! line.

pub mod event;
pub mod logger;

pub use event::{AuditEvent, AuditEventBuilder, AuditEventType};
pub use logger::AuditLogger;
