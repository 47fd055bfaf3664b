//! Session endpoints.

use axum::extract::State;
use axum::{Extension, Form, Json};
use rolodex_audit::{AuditEvent, AuditEventType};
use rolodex_auth::{AuthError, hash_credential};
use rolodex_core::Identity;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::middleware::CurrentIdentity;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// OAuth2-style form body. `username` carries the email.
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<Identity>, ApiError> {
    let identities = state.identities();
    if identities.email_exists(&request.email).await? {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let identity = identities
        .insert(
            &request.email,
            &request.name,
            &hash_credential(&request.password),
            true,
        )
        .await?;

    state.audit().record(
        &AuditEvent::builder(AuditEventType::Registered)
            .actor(&identity.email)
            .build(),
    );

    Ok(Json(identity))
}

pub async fn token(
    State(state): State<AppState>,
    Form(form): Form<TokenForm>,
) -> Result<Json<Value>, ApiError> {
    issue_session(&state, &form.username, &form.password).await
}

pub async fn signin(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<Value>, ApiError> {
    issue_session(&state, &request.email, &request.password).await
}

pub async fn me(Extension(CurrentIdentity(identity)): Extension<CurrentIdentity>) -> Json<Identity> {
    Json(identity)
}

/// Authenticate and answer with a fresh token plus the identity. The
/// active flag is not consulted here; the session boundary is where
/// dormant identities are stopped.
async fn issue_session(state: &AppState, email: &str, password: &str) -> Result<Json<Value>, ApiError> {
    let identity = match state
        .authority()
        .authenticate(state.credentials().as_ref(), email, password)
        .await
    {
        Ok(identity) => identity,
        Err(AuthError::InvalidCredentials) => {
            state.audit().record(
                &AuditEvent::builder(AuditEventType::SignInFailed)
                    .actor(email)
                    .build(),
            );
            return Err(ApiError::InvalidCredentials);
        }
        Err(other) => return Err(other.into()),
    };

    let access_token = state.authority().issue_token(&identity.email, None)?;

    state.audit().record(
        &AuditEvent::builder(AuditEventType::SignIn)
            .actor(&identity.email)
            .build(),
    );

    Ok(Json(json!({
        "access_token": access_token,
        "token_type": "bearer",
        "user": identity,
    })))
}
