//! Session token issue and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::credential::verify_credential;
use crate::error::AuthError;
use crate::store::CredentialStore;
use rolodex_core::Identity;

/// JWT claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject email.
    sub: String,
    /// Issue instant, seconds since the epoch.
    iat: u64,
    /// Expiry instant, seconds since the epoch.
    exp: u64,
}

/// Issues and validates HMAC-signed session tokens.
///
/// The signing secret and default lifetime are explicit constructor
/// arguments, so tests can isolate with distinct secrets.
#[derive(Clone)]
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl TokenAuthority {
    pub fn new(secret: &str, default_ttl_minutes: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            default_ttl: Duration::minutes(default_ttl_minutes as i64),
        }
    }

    /// Issue a token for `subject_email`, expiring after `ttl` (or the
    /// configured default when `None`).
    pub fn issue_token(
        &self,
        subject_email: &str,
        ttl: Option<Duration>,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let expires_at = now + ttl.unwrap_or(self.default_ttl);
        let claims = Claims {
            sub: subject_email.to_string(),
            iat: now.timestamp().max(0) as u64,
            exp: expires_at.timestamp().max(0) as u64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Validate a token and return its subject email.
    ///
    /// Every failure collapses to `Unauthenticated`; the cause is only
    /// logged at debug level.
    pub fn validate_token(&self, token: &str) -> Result<String, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "session token rejected");
            AuthError::Unauthenticated
        })?;

        if data.claims.sub.is_empty() {
            tracing::debug!("session token rejected: empty subject");
            return Err(AuthError::Unauthenticated);
        }

        Ok(data.claims.sub)
    }

    /// Look up an identity and check its credential.
    ///
    /// Unknown email and wrong password fail identically. The active flag
    /// is not consulted here; the session boundary enforces it.
    pub async fn authenticate(
        &self,
        store: &dyn CredentialStore,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        let identity = store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_credential(password, &identity.hashed_password) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(identity)
    }
}
