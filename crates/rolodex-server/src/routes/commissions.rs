//! Commission management.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use rolodex_audit::{AuditEvent, AuditEventType};
use rolodex_core::Commission;
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::CurrentIdentity;
use crate::state::AppState;

use super::PageParams;

#[derive(Debug, Deserialize)]
pub struct CommissionCreate {
    pub client_id: i64,
    pub amount: f64,
    #[serde(default)]
    pub source: Option<String>,
}

/// The client must exist at creation time; nothing prevents it from
/// being deleted afterwards.
pub async fn create(
    State(state): State<AppState>,
    Extension(CurrentIdentity(identity)): Extension<CurrentIdentity>,
    Json(request): Json<CommissionCreate>,
) -> Result<(StatusCode, Json<Commission>), ApiError> {
    if state.clients().find_by_id(request.client_id).await?.is_none() {
        return Err(ApiError::NotFound("Client not found".to_string()));
    }

    let commission = state
        .commissions()
        .insert(request.client_id, request.amount, request.source.as_deref())
        .await?;

    state.audit().record(
        &AuditEvent::builder(AuditEventType::RecordCreated)
            .actor(&identity.email)
            .table("commissions")
            .build(),
    );

    Ok((StatusCode::CREATED, Json(commission)))
}

pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<Commission>>, ApiError> {
    Ok(Json(state.commissions().page(page.skip, page.limit).await?))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(commission_id): Path<i64>,
) -> Result<Json<Commission>, ApiError> {
    let commission = state
        .commissions()
        .find_by_id(commission_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Commission not found".to_string()))?;
    Ok(Json(commission))
}

/// All commissions for one client. 404s when the client itself is
/// missing rather than answering with an empty list.
pub async fn for_client(
    State(state): State<AppState>,
    Path(client_id): Path<i64>,
) -> Result<Json<Vec<Commission>>, ApiError> {
    if state.clients().find_by_id(client_id).await?.is_none() {
        return Err(ApiError::NotFound("Client not found".to_string()));
    }
    Ok(Json(state.commissions().for_client(client_id).await?))
}
