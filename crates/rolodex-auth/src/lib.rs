//! # rolodex-auth
//!
//! Credential digests and session tokens for the Rolodex admin backend.
//!
//! This crate provides:
//! - The deterministic SHA-256 credential transform used at registration
//!   and sign-in
//! - A token authority that issues and validates HMAC-signed session
//!   tokens (JWT, HS256)
//! - The `CredentialStore` seam the authority looks identities up through
//!
//! Failures are uniform on purpose: callers learn that a credential or
//! token was rejected, never why.

pub mod credential;
pub mod error;
pub mod store;
pub mod token;

pub use credential::{hash_credential, verify_credential};
pub use error::AuthError;
pub use store::CredentialStore;
pub use token::TokenAuthority;
