//! The admin session boundary.
//!
//! Guarded routes pass through [`require_identity`], which validates
//! the bearer token and resolves the signing identity before the
//! request reaches any handler. Every rejection collapses to the same
//! 401 body regardless of cause.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use rolodex_audit::{AuditEvent, AuditEventType};
use rolodex_core::Identity;

use crate::error::ApiError;
use crate::state::AppState;

/// The identity resolved by the boundary, available to guarded
/// handlers through request extensions.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

/// Token validation happens before the identity lookup, so requests
/// without a valid token never touch storage. Inactive identities are
/// turned away here even though their tokens verify.
pub async fn require_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&req).ok_or_else(|| rejected(&state, "missing bearer token"))?;

    let subject = state
        .authority()
        .validate_token(token)
        .map_err(|_| rejected(&state, "token validation failed"))?;

    let identity = state
        .credentials()
        .find_by_email(&subject)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| rejected(&state, "unknown subject"))?;

    if !identity.is_active {
        return Err(rejected(&state, "inactive identity"));
    }

    req.extensions_mut().insert(CurrentIdentity(identity));
    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

fn rejected(state: &AppState, reason: &str) -> ApiError {
    tracing::debug!(reason, "session boundary rejected request");
    state.audit().record(
        &AuditEvent::builder(AuditEventType::TokenRejected)
            .error(reason)
            .build(),
    );
    ApiError::Unauthenticated
}
