//! Route table.
//!
//! Registration and sign-in are public, as is the dashboard page
//! itself. Everything that reads or writes application data sits
//! behind the session boundary.

use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::require_identity;
use crate::state::AppState;

mod admin;
mod auth;
mod clients;
mod commissions;

/// skip/limit pair shared by the listing endpoints.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    100
}

/// Assemble the application router.
pub fn create_router(state: AppState) -> Router {
    let guarded = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/admin/", get(admin::dashboard_page))
        .route("/admin/api/stats", get(admin::stats))
        .route("/admin/api/database/structure", get(admin::database_structure))
        .route("/admin/api/tables/{table_name}", get(admin::browse_table))
        .route("/admin/api/sql/execute", post(admin::execute_sql))
        .route("/admin/api/all-data", get(admin::all_data))
        .route("/admin/api/users", get(admin::list_users))
        .route("/admin/api/commissions", get(admin::list_commissions))
        .route("/clients/", get(clients::list).post(clients::create))
        .route("/clients/{client_id}", get(clients::get_one))
        .route("/commissions/", get(commissions::list).post(commissions::create))
        .route("/commissions/{commission_id}", get(commissions::get_one))
        .route("/commissions/client/{client_id}", get(commissions::for_client))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_identity,
        ));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/auth/register", post(auth::register))
        .route("/auth/token", post(auth::token))
        .route("/auth/signin", post(auth::signin))
        .route("/admin/dashboard", get(admin::dashboard_page))
        .merge(guarded)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
