//! Client management.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use rolodex_audit::{AuditEvent, AuditEventType};
use rolodex_core::Client;
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::CurrentIdentity;
use crate::state::AppState;

use super::PageParams;

#[derive(Debug, Deserialize)]
pub struct ClientCreate {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(CurrentIdentity(identity)): Extension<CurrentIdentity>,
    Json(request): Json<ClientCreate>,
) -> Result<(StatusCode, Json<Client>), ApiError> {
    let clients = state.clients();
    if clients.find_by_email(&request.email).await?.is_some() {
        return Err(ApiError::BadRequest(
            "Client with this email already exists".to_string(),
        ));
    }

    let client = clients
        .insert(&request.name, &request.email, request.phone.as_deref())
        .await?;

    state.audit().record(
        &AuditEvent::builder(AuditEventType::RecordCreated)
            .actor(&identity.email)
            .table("clients")
            .build(),
    );

    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<Client>>, ApiError> {
    Ok(Json(state.clients().page(page.skip, page.limit).await?))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
) -> Result<Json<Client>, ApiError> {
    let client = state
        .clients()
        .find_by_id(client_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Client not found".to_string()))?;
    Ok(Json(client))
}
