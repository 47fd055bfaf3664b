//! Request middleware.

pub mod auth;

pub use auth::{CurrentIdentity, require_identity};
