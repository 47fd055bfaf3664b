//! End-to-end tests over the assembled router.

use std::str::FromStr;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header, response::Parts};
use pretty_assertions::assert_eq;
use rolodex_core::RolodexConfig;
use rolodex_server::{AppState, create_router, db, seed};
use serde_json::{Value, json};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;

async fn test_app() -> (Router, AppState) {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(false);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    db::ensure_schema(&pool).await.unwrap();

    let config = RolodexConfig::from_yaml("auth:\n  secret: integration-test-secret\n").unwrap();
    let state = AppState::new(&config, pool);
    (create_router(state.clone()), state)
}

async fn send(app: &Router, request: Request<Body>) -> (Parts, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (parts, value)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json_auth(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn register(app: &Router, email: &str, name: &str, password: &str) -> (Parts, Value) {
    send(
        app,
        post_json(
            "/auth/register",
            json!({ "email": email, "name": name, "password": password }),
        ),
    )
    .await
}

async fn signin(app: &Router, email: &str, password: &str) -> String {
    let (parts, body) = send(
        app,
        post_json(
            "/auth/signin",
            json!({ "email": email, "password": password }),
        ),
    )
    .await;
    assert_eq!(parts.status, StatusCode::OK, "{body}");
    body["access_token"].as_str().unwrap().to_string()
}

async fn admin_token(app: &Router) -> String {
    let (parts, _) = register(app, "ops@crm.com", "Ops", "hunter2").await;
    assert_eq!(parts.status, StatusCode::OK);
    signin(app, "ops@crm.com", "hunter2").await
}

#[tokio::test]
async fn test_healthz_is_public() {
    let (app, _state) = test_app().await;
    let (parts, body) = send(&app, get("/healthz")).await;

    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_register_signin_me_roundtrip() {
    let (app, _state) = test_app().await;

    let (parts, body) = register(&app, "ada@crm.com", "Ada", "pw123").await;
    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(body["email"], "ada@crm.com");
    assert_eq!(body["name"], "Ada");
    assert_eq!(body["is_active"], true);
    assert!(body.get("hashed_password").is_none());

    let (parts, body) = send(
        &app,
        post_json(
            "/auth/signin",
            json!({ "email": "ada@crm.com", "password": "pw123" }),
        ),
    )
    .await;
    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["user"]["email"], "ada@crm.com");
    assert!(body["user"].get("hashed_password").is_none());
    let token = body["access_token"].as_str().unwrap().to_string();

    let (parts, body) = send(&app, get_auth("/auth/me", &token)).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(body["email"], "ada@crm.com");
}

#[tokio::test]
async fn test_register_duplicate_email_rejected() {
    let (app, _state) = test_app().await;
    register(&app, "dup@crm.com", "First", "pw").await;

    let (parts, body) = register(&app, "dup@crm.com", "Second", "pw").await;
    assert_eq!(parts.status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "detail": "Email already registered" }));
}

#[tokio::test]
async fn test_signin_failures_are_uniform() {
    let (app, _state) = test_app().await;
    register(&app, "real@crm.com", "Real", "right-password").await;

    let (unknown_parts, unknown_body) = send(
        &app,
        post_json(
            "/auth/signin",
            json!({ "email": "ghost@crm.com", "password": "whatever" }),
        ),
    )
    .await;
    let (wrong_parts, wrong_body) = send(
        &app,
        post_json(
            "/auth/signin",
            json!({ "email": "real@crm.com", "password": "wrong-password" }),
        ),
    )
    .await;

    assert_eq!(unknown_parts.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_parts.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_body, json!({ "detail": "Incorrect email or password" }));
    assert_eq!(unknown_body, wrong_body);
    assert!(unknown_parts.headers.get(header::WWW_AUTHENTICATE).is_none());

    // The form endpoint maps credential failures identically, with no
    // challenge header on either.
    let token_request = Request::builder()
        .method(Method::POST)
        .uri("/auth/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=real%40crm.com&password=wrong-password"))
        .unwrap();
    let (token_parts, token_body) = send(&app, token_request).await;

    assert_eq!(token_parts.status, StatusCode::UNAUTHORIZED);
    assert_eq!(token_body, wrong_body);
    assert!(token_parts.headers.get(header::WWW_AUTHENTICATE).is_none());
}

#[tokio::test]
async fn test_token_endpoint_accepts_form_body() {
    let (app, _state) = test_app().await;
    register(&app, "form@crm.com", "Form", "pw123").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("username=form%40crm.com&password=pw123"))
        .unwrap();
    let (parts, body) = send(&app, request).await;

    assert_eq!(parts.status, StatusCode::OK, "{body}");
    assert_eq!(body["token_type"], "bearer");
    assert!(body["access_token"].as_str().is_some());
}

#[tokio::test]
async fn test_guarded_routes_reject_missing_token() {
    let (app, _state) = test_app().await;

    for uri in [
        "/auth/me",
        "/admin/",
        "/admin/api/stats",
        "/admin/api/database/structure",
        "/admin/api/tables/users",
        "/admin/api/all-data",
        "/admin/api/users",
        "/admin/api/commissions",
        "/clients/",
        "/commissions/",
    ] {
        let (parts, body) = send(&app, get(uri)).await;
        assert_eq!(parts.status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(
            body,
            json!({ "detail": "Could not validate credentials" }),
            "{uri}"
        );
        assert_eq!(
            parts
                .headers
                .get(header::WWW_AUTHENTICATE)
                .and_then(|v| v.to_str().ok()),
            Some("Bearer"),
            "{uri}"
        );
    }
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let (app, state) = test_app().await;
    register(&app, "late@crm.com", "Late", "pw").await;

    let token = state
        .authority()
        .issue_token("late@crm.com", Some(chrono::Duration::seconds(-100)))
        .unwrap();
    let (parts, body) = send(&app, get_auth("/auth/me", &token)).await;

    assert_eq!(parts.status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "detail": "Could not validate credentials" }));
}

#[tokio::test]
async fn test_inactive_identity_signs_in_but_cannot_pass_boundary() {
    let (app, state) = test_app().await;
    register(&app, "dormant@crm.com", "Dormant", "pw").await;

    sqlx::query("UPDATE users SET is_active = 0 WHERE email = ?")
        .bind("dormant@crm.com")
        .execute(state.pool())
        .await
        .unwrap();

    // Sign-in only checks the credential, so a token is still issued.
    let token = signin(&app, "dormant@crm.com", "pw").await;

    let (parts, body) = send(&app, get_auth("/auth/me", &token)).await;
    assert_eq!(parts.status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "detail": "Could not validate credentials" }));
}

#[tokio::test]
async fn test_dashboard_page_is_public_but_admin_page_is_guarded() {
    let (app, _state) = test_app().await;

    let (parts, body) = send(&app, get("/admin/dashboard")).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("Rolodex"));

    let (parts, _body) = send(&app, get("/admin/")).await;
    assert_eq!(parts.status, StatusCode::UNAUTHORIZED);

    let token = admin_token(&app).await;
    let (parts, body) = send(&app, get_auth("/admin/", &token)).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("Rolodex"));
}

#[tokio::test]
async fn test_browse_users_pages_and_reports_totals() {
    let (app, state) = test_app().await;
    seed::populate(state.pool()).await.unwrap();
    let token = signin(&app, "admin@crm.com", "admin123").await;

    let (parts, body) = send(&app, get_auth("/admin/api/tables/users?skip=0&limit=1", &token)).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(body["table_name"], "users");
    assert_eq!(body["total_count"], 4);
    assert_eq!(body["showing"], 1);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert!(
        body["columns"]
            .as_array()
            .unwrap()
            .contains(&json!("email"))
    );

    // Past the end: no rows, but column names still present.
    let (parts, body) = send(
        &app,
        get_auth("/admin/api/tables/users?skip=100&limit=10", &token),
    )
    .await;
    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(body["showing"], 0);
    assert_eq!(body["data"], json!([]));
    assert!(!body["columns"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_browse_unknown_table_is_404() {
    let (app, _state) = test_app().await;
    let token = admin_token(&app).await;

    let (parts, body) = send(&app, get_auth("/admin/api/tables/missing", &token)).await;
    assert_eq!(parts.status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Table not found" }));
}

#[tokio::test]
async fn test_browse_rejects_negative_skip() {
    let (app, _state) = test_app().await;
    let token = admin_token(&app).await;

    let (parts, _body) = send(&app, get_auth("/admin/api/tables/users?skip=-1", &token)).await;
    assert_eq!(parts.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sql_execute_select_one() {
    let (app, _state) = test_app().await;
    let token = admin_token(&app).await;

    let (parts, body) = send(
        &app,
        post_json_auth("/admin/api/sql/execute", &token, json!({ "query": "SELECT 1" })),
    )
    .await;

    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "columns": ["1"],
            "data": [{ "1": "1" }],
            "row_count": 1,
        })
    );
}

#[tokio::test]
async fn test_sql_execute_rejects_writes() {
    let (app, _state) = test_app().await;
    let token = admin_token(&app).await;

    let (parts, body) = send(
        &app,
        post_json_auth(
            "/admin/api/sql/execute",
            &token,
            json!({ "query": "DROP TABLE users" }),
        ),
    )
    .await;
    assert_eq!(parts.status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "detail": "Only SELECT queries are allowed" }));

    // The users table survived; the session is still usable.
    let (parts, _body) = send(&app, get_auth("/admin/api/tables/users", &token)).await;
    assert_eq!(parts.status, StatusCode::OK);
}

#[tokio::test]
async fn test_sql_execute_rejects_empty_query() {
    let (app, _state) = test_app().await;
    let token = admin_token(&app).await;

    let (parts, body) = send(
        &app,
        post_json_auth("/admin/api/sql/execute", &token, json!({ "query": "   " })),
    )
    .await;
    assert_eq!(parts.status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "detail": "Query cannot be empty" }));
}

#[tokio::test]
async fn test_sql_execute_surfaces_engine_errors() {
    let (app, _state) = test_app().await;
    let token = admin_token(&app).await;

    let (parts, body) = send(
        &app,
        post_json_auth(
            "/admin/api/sql/execute",
            &token,
            json!({ "query": "SELECT * FROM missing" }),
        ),
    )
    .await;
    assert_eq!(parts.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "detail": "Query execution error: no such table: missing" })
    );
}

#[tokio::test]
async fn test_sql_results_are_stringified_with_nulls() {
    let (app, _state) = test_app().await;
    let token = admin_token(&app).await;

    send(
        &app,
        post_json_auth(
            "/clients/",
            &token,
            json!({ "name": "NoPhone Inc", "email": "np@x.com" }),
        ),
    )
    .await;

    let (parts, body) = send(
        &app,
        post_json_auth(
            "/admin/api/sql/execute",
            &token,
            json!({ "query": "SELECT id, name, phone FROM clients" }),
        ),
    )
    .await;

    assert_eq!(parts.status, StatusCode::OK);
    let row = &body["data"][0];
    assert_eq!(row["id"], "1");
    assert_eq!(row["name"], "NoPhone Inc");
    assert_eq!(row["phone"], Value::Null);
}

#[tokio::test]
async fn test_database_structure_reflects_schema() {
    let (app, _state) = test_app().await;
    let token = admin_token(&app).await;

    let (parts, body) = send(&app, get_auth("/admin/api/database/structure", &token)).await;
    assert_eq!(parts.status, StatusCode::OK);

    let users = &body["tables"]["users"];
    let columns = users["columns"].as_array().unwrap();
    let id = columns.iter().find(|c| c["name"] == "id").unwrap();
    assert_eq!(id["type"], "INTEGER");
    assert_eq!(id["primary_key"], true);
    assert_eq!(id["autoincrement"], true);
    let email = columns.iter().find(|c| c["name"] == "email").unwrap();
    assert_eq!(email["nullable"], false);
    let is_active = columns.iter().find(|c| c["name"] == "is_active").unwrap();
    assert_eq!(is_active["nullable"], true);

    let indexes = users["indexes"].as_array().unwrap();
    let by_email = indexes.iter().find(|i| i["name"] == "ix_users_email").unwrap();
    assert_eq!(by_email["unique"], true);
    assert_eq!(by_email["columns"], json!(["email"]));

    let fks = body["tables"]["commissions"]["foreign_keys"].as_array().unwrap();
    assert_eq!(fks.len(), 1);
    assert_eq!(fks[0]["constrained_columns"], json!(["client_id"]));
    assert_eq!(fks[0]["referred_table"], "clients");
    assert_eq!(fks[0]["referred_columns"], json!(["id"]));

    // Reflection twice over an unchanged schema answers identically.
    let (_parts, again) = send(&app, get_auth("/admin/api/database/structure", &token)).await;
    assert_eq!(body, again);
}

#[tokio::test]
async fn test_all_data_covers_every_table() {
    let (app, _state) = test_app().await;
    let token = admin_token(&app).await;

    send(
        &app,
        post_json_auth(
            "/clients/",
            &token,
            json!({ "name": "Tech Corp", "email": "c@t.com" }),
        ),
    )
    .await;

    let (parts, body) = send(&app, get_auth("/admin/api/all-data", &token)).await;
    assert_eq!(parts.status, StatusCode::OK);

    let tables = body.as_object().unwrap();
    for name in ["users", "clients", "commissions"] {
        assert!(tables.contains_key(name), "{name}");
    }

    let clients = &body["clients"];
    assert_eq!(clients["count"], 1);
    assert_eq!(clients["data"].as_array().unwrap().len(), 1);
    assert_eq!(clients["data"][0]["name"], "Tech Corp");
    assert!(
        clients["columns"]
            .as_array()
            .unwrap()
            .contains(&json!("email"))
    );
    assert_eq!(body["commissions"]["count"], 0);
}

#[tokio::test]
async fn test_clients_crud_flow() {
    let (app, _state) = test_app().await;
    let token = admin_token(&app).await;

    let (parts, created) = send(
        &app,
        post_json_auth(
            "/clients/",
            &token,
            json!({
                "name": "Tech Corp",
                "email": "contact@techcorp.com",
                "phone": "+1-555-0101",
            }),
        ),
    )
    .await;
    assert_eq!(parts.status, StatusCode::CREATED);
    assert_eq!(created["name"], "Tech Corp");
    assert_eq!(created["phone"], "+1-555-0101");
    assert!(created["id"].as_i64().is_some());
    assert!(created["created_at"].as_str().is_some());

    let (parts, body) = send(
        &app,
        post_json_auth(
            "/clients/",
            &token,
            json!({ "name": "Copycat", "email": "contact@techcorp.com" }),
        ),
    )
    .await;
    assert_eq!(parts.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "detail": "Client with this email already exists" })
    );

    let (parts, body) = send(&app, get_auth("/clients/", &token)).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let id = created["id"].as_i64().unwrap();
    let (parts, body) = send(&app, get_auth(&format!("/clients/{id}"), &token)).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(body["email"], "contact@techcorp.com");

    let (parts, body) = send(&app, get_auth("/clients/99999", &token)).await;
    assert_eq!(parts.status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Client not found" }));
}

#[tokio::test]
async fn test_commissions_crud_flow() {
    let (app, _state) = test_app().await;
    let token = admin_token(&app).await;

    let (_parts, client) = send(
        &app,
        post_json_auth(
            "/clients/",
            &token,
            json!({ "name": "Tech Corp", "email": "c@t.com" }),
        ),
    )
    .await;
    let client_id = client["id"].as_i64().unwrap();

    let (parts, created) = send(
        &app,
        post_json_auth(
            "/commissions/",
            &token,
            json!({ "client_id": client_id, "amount": 150.75, "source": "Referral" }),
        ),
    )
    .await;
    assert_eq!(parts.status, StatusCode::CREATED);
    assert_eq!(created["amount"], 150.75);
    assert_eq!(created["source"], "Referral");

    let (parts, body) = send(
        &app,
        post_json_auth(
            "/commissions/",
            &token,
            json!({ "client_id": 9999, "amount": 1.0 }),
        ),
    )
    .await;
    assert_eq!(parts.status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Client not found" }));

    let (parts, body) = send(&app, get_auth("/commissions/", &token)).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let id = created["id"].as_i64().unwrap();
    let (parts, _body) = send(&app, get_auth(&format!("/commissions/{id}"), &token)).await;
    assert_eq!(parts.status, StatusCode::OK);

    let (parts, body) = send(&app, get_auth("/commissions/55555", &token)).await;
    assert_eq!(parts.status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Commission not found" }));

    let (parts, body) = send(
        &app,
        get_auth(&format!("/commissions/client/{client_id}"), &token),
    )
    .await;
    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (parts, body) = send(&app, get_auth("/commissions/client/9999", &token)).await;
    assert_eq!(parts.status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Client not found" }));
}

#[tokio::test]
async fn test_admin_commission_listing_names_clients() {
    let (app, state) = test_app().await;
    let token = admin_token(&app).await;

    let (_parts, client) = send(
        &app,
        post_json_auth(
            "/clients/",
            &token,
            json!({ "name": "Tech Corp", "email": "c@t.com" }),
        ),
    )
    .await;
    let client_id = client["id"].as_i64().unwrap();
    send(
        &app,
        post_json_auth(
            "/commissions/",
            &token,
            json!({ "client_id": client_id, "amount": 42.0 }),
        ),
    )
    .await;

    let (parts, body) = send(&app, get_auth("/admin/api/commissions", &token)).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["commissions"][0]["client_name"], "Tech Corp");
    assert_eq!(body["commissions"][0]["amount"], 42.0);

    // Deleting the client leaves the commission orphaned, not broken.
    sqlx::query("DELETE FROM clients WHERE id = ?")
        .bind(client_id)
        .execute(state.pool())
        .await
        .unwrap();

    let (parts, body) = send(&app, get_auth("/admin/api/commissions", &token)).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(body["commissions"][0]["client_name"], "Unknown");
}

#[tokio::test]
async fn test_stats_shape_over_seeded_data() {
    let (app, state) = test_app().await;
    seed::populate(state.pool()).await.unwrap();
    let token = signin(&app, "admin@crm.com", "admin123").await;

    let (parts, body) = send(&app, get_auth("/admin/api/stats", &token)).await;
    assert_eq!(parts.status, StatusCode::OK);

    let stats = &body["stats"];
    assert_eq!(stats["total_users"], 4);
    assert_eq!(stats["active_users"], 3);
    assert_eq!(stats["total_clients"], 8);
    assert_eq!(stats["total_commissions"], 25);
    assert!(stats["total_commission_amount"].as_f64().unwrap() >= 25.0 * 100.0);

    let recent = &body["recent_activity"];
    assert_eq!(recent["recent_users"].as_array().unwrap().len(), 4);
    assert_eq!(recent["recent_clients"].as_array().unwrap().len(), 5);
    assert_eq!(recent["recent_commissions"].as_array().unwrap().len(), 5);
    assert!(recent["recent_users"][0].get("hashed_password").is_none());
}

#[tokio::test]
async fn test_admin_users_listing() {
    let (app, state) = test_app().await;
    seed::populate(state.pool()).await.unwrap();
    let token = signin(&app, "admin@crm.com", "admin123").await;

    let (parts, body) = send(&app, get_auth("/admin/api/users?limit=2", &token)).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(body["total_count"], 4);

    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["email"], "admin@crm.com");
    assert_eq!(users[0]["is_active"], true);
    assert!(users[0].get("hashed_password").is_none());
}
