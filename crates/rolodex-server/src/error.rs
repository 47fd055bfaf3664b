//! HTTP error mapping.
//!
//! Every error leaving a handler serializes as `{"detail": message}`
//! with a status drawn from the variant. Internal failures are logged
//! in full and answered with a generic body.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use rolodex_auth::AuthError;
use rolodex_query::QueryError;
use rolodex_schema::SchemaError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Sign-in failed. Deliberately the same message for unknown
    /// emails and wrong passwords.
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Bearer token missing, invalid, expired, or tied to an identity
    /// that no longer passes the boundary.
    #[error("Could not validate credentials")]
    Unauthenticated,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidCredentials | ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if let ApiError::Internal(source) = &self {
            tracing::error!(error = ?source, "request failed");
        }

        let body = Json(json!({ "detail": self.to_string() }));

        // Token failures advertise the bearer scheme.
        if matches!(self, ApiError::Unauthenticated) {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::Unauthenticated => ApiError::Unauthenticated,
            AuthError::TokenCreation(message) => ApiError::Internal(anyhow::anyhow!(message)),
            AuthError::Internal(e) => ApiError::Internal(e),
        }
    }
}

impl From<SchemaError> for ApiError {
    fn from(e: SchemaError) -> Self {
        match e {
            SchemaError::UnknownTable => ApiError::NotFound(e.to_string()),
            SchemaError::Storage(e) => ApiError::Internal(e.into()),
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::EmptyQuery | QueryError::NotReadOnly | QueryError::Execution(_) => {
                ApiError::BadRequest(e.to_string())
            }
            QueryError::UnknownTable => ApiError::NotFound(e.to_string()),
            QueryError::Storage(e) => ApiError::Internal(e.into()),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.into())
    }
}
