//! Error types for authentication and token handling.

use thiserror::Error;

/// Errors that can occur during sign-in and token validation.
///
/// `InvalidCredentials` and `Unauthenticated` carry deliberately uniform
/// messages; the detailed cause is logged, never returned to callers.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Sign-in failed. Covers unknown email and wrong password alike.
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Token validation failed. Covers bad signature, expiry, and a
    /// missing subject alike.
    #[error("Could not validate credentials")]
    Unauthenticated,

    /// Failed to sign a token.
    #[error("failed to sign token: {0}")]
    TokenCreation(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
