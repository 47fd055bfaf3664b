//! The identity lookup seam.

use async_trait::async_trait;
use rolodex_core::Identity;

/// Where the token authority looks identities up.
///
/// The server backs this with the users table; tests back it with
/// in-memory stubs.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find an identity by email. `Ok(None)` means no such identity.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Identity>>;
}
