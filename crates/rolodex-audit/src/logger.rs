//! Emission of audit events through the tracing pipeline.

use crate::event::AuditEvent;

/// Writes audit events to the `audit` log target.
///
/// Each record carries the serialized event as a field and the
/// human-readable line as the message, so both structured subscribers
/// and console output get a usable form.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditLogger;

impl AuditLogger {
    pub fn new() -> Self {
        Self
    }

    /// Emit one event.
    pub fn record(&self, event: &AuditEvent) {
        match serde_json::to_string(event) {
            Ok(json) => {
                tracing::info!(target: "audit", event = %json, "{}", event.to_log_line());
            }
            Err(e) => {
                tracing::warn!(target: "audit", error = %e, "audit event serialization failed");
            }
        }
    }
}
