//! Admin inspection endpoints: stats, schema reflection, table
//! browsing, the gated SQL console, and the dashboard page.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum::{Extension, Json};
use rolodex_audit::{AuditEvent, AuditEventType};
use rolodex_core::QueryResult;
use rolodex_query::QueryError;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::assets;
use crate::error::ApiError;
use crate::middleware::CurrentIdentity;
use crate::state::AppState;

use super::PageParams;

pub async fn dashboard_page() -> Result<Html<String>, ApiError> {
    Ok(Html(assets::dashboard_html()?))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let identities = state.identities();
    let clients = state.clients();
    let commissions = state.commissions();

    let total_users = identities.count().await?;
    let active_users = identities.count_active().await?;
    let total_clients = clients.count().await?;
    let total_commissions = commissions.count().await?;
    let total_commission_amount = commissions.total_amount().await?;

    let recent_users: Vec<Value> = identities
        .recent(5)
        .await?
        .into_iter()
        .map(|u| {
            json!({
                "id": u.id,
                "name": u.name,
                "email": u.email,
                "created_at": u.created_at,
            })
        })
        .collect();
    let recent_clients: Vec<Value> = clients
        .recent(5)
        .await?
        .into_iter()
        .map(|c| {
            json!({
                "id": c.id,
                "name": c.name,
                "email": c.email,
                "created_at": c.created_at,
            })
        })
        .collect();
    let recent_commissions: Vec<Value> = commissions
        .recent(5)
        .await?
        .into_iter()
        .map(|c| {
            json!({
                "id": c.id,
                "client_id": c.client_id,
                "amount": c.amount,
                "created_at": c.created_at,
            })
        })
        .collect();

    Ok(Json(json!({
        "stats": {
            "total_users": total_users,
            "active_users": active_users,
            "total_clients": total_clients,
            "total_commissions": total_commissions,
            "total_commission_amount": total_commission_amount,
        },
        "recent_activity": {
            "recent_users": recent_users,
            "recent_clients": recent_clients,
            "recent_commissions": recent_commissions,
        },
    })))
}

pub async fn database_structure(
    State(state): State<AppState>,
    Extension(CurrentIdentity(identity)): Extension<CurrentIdentity>,
) -> Result<Json<Value>, ApiError> {
    let tables = state.reflector().describe_all().await?;

    state.audit().record(
        &AuditEvent::builder(AuditEventType::SchemaRead)
            .actor(&identity.email)
            .build(),
    );

    Ok(Json(json!({ "tables": tables })))
}

pub async fn browse_table(
    State(state): State<AppState>,
    Extension(CurrentIdentity(identity)): Extension<CurrentIdentity>,
    Path(table_name): Path<String>,
    Query(page): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let browsed = state
        .gateway()
        .browse(&table_name, page.skip, page.limit)
        .await?;

    state.audit().record(
        &AuditEvent::builder(AuditEventType::TableBrowsed)
            .actor(&identity.email)
            .table(&table_name)
            .row_count(browsed.result.row_count as u64)
            .build(),
    );

    Ok(Json(json!({
        "table_name": table_name,
        "columns": browsed.result.columns,
        "data": browsed.result.rows,
        "total_count": browsed.total_count,
        "showing": browsed.result.row_count,
    })))
}

#[derive(Debug, Deserialize)]
pub struct SqlRequest {
    pub query: String,
}

pub async fn execute_sql(
    State(state): State<AppState>,
    Extension(CurrentIdentity(identity)): Extension<CurrentIdentity>,
    Json(request): Json<SqlRequest>,
) -> Result<Json<Value>, ApiError> {
    match state.gateway().execute_readonly(&request.query).await {
        Ok(result) => {
            state.audit().record(
                &AuditEvent::builder(AuditEventType::QueryExecuted)
                    .actor(&identity.email)
                    .sql(request.query.trim())
                    .row_count(result.row_count as u64)
                    .build(),
            );
            Ok(Json(json!({
                "success": true,
                "columns": result.columns,
                "data": result.rows,
                "row_count": result.row_count,
            })))
        }
        Err(error) => {
            let event_type = match &error {
                QueryError::Execution(_) => AuditEventType::QueryFailed,
                _ => AuditEventType::QueryRejected,
            };
            state.audit().record(
                &AuditEvent::builder(event_type)
                    .actor(&identity.email)
                    .sql(request.query.trim())
                    .error(error.to_string())
                    .build(),
            );
            Err(error.into())
        }
    }
}

/// Dump every table in one response. A table that fails to read gets
/// an error marker instead of poisoning the others.
pub async fn all_data(
    State(state): State<AppState>,
    Extension(CurrentIdentity(identity)): Extension<CurrentIdentity>,
) -> Result<Json<Value>, ApiError> {
    let mut payload = BTreeMap::new();

    for table in state.reflector().list_tables().await? {
        let entry = dump_entry(&table, state.gateway().dump_table(&table).await);
        payload.insert(table, entry);
    }

    state.audit().record(
        &AuditEvent::builder(AuditEventType::SchemaRead)
            .actor(&identity.email)
            .build(),
    );

    Ok(Json(json!(payload)))
}

/// Payload entry for one table of the full dump: its rows on success,
/// an error marker with empty rows when the read failed.
fn dump_entry(table: &str, dumped: Result<QueryResult, QueryError>) -> Value {
    match dumped {
        Ok(result) => json!({
            "columns": result.columns,
            "data": result.rows,
            "count": result.row_count,
        }),
        Err(error) => {
            tracing::warn!(table = %table, error = %error, "table dump failed");
            json!({
                "error": error.to_string(),
                "columns": [],
                "data": [],
                "count": 0,
            })
        }
    }
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let identities = state.identities();
    let users: Vec<Value> = identities
        .page(page.skip, page.limit)
        .await?
        .into_iter()
        .map(|u| {
            json!({
                "id": u.id,
                "name": u.name,
                "email": u.email,
                "is_active": u.is_active,
                "created_at": u.created_at,
            })
        })
        .collect();
    let total_count = identities.count().await?;

    Ok(Json(json!({ "users": users, "total_count": total_count })))
}

pub async fn list_commissions(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let commissions = state.commissions();
    let listed: Vec<Value> = commissions
        .page_with_client(page.skip, page.limit)
        .await?
        .into_iter()
        .map(|entry| {
            json!({
                "id": entry.commission.id,
                "client_id": entry.commission.client_id,
                "client_name": entry.client_name,
                "amount": entry.commission.amount,
                "source": entry.commission.source,
                "created_at": entry.commission.created_at,
            })
        })
        .collect();
    let total_count = commissions.count().await?;

    Ok(Json(json!({ "commissions": listed, "total_count": total_count })))
}
