//! Shared application state.

use std::sync::Arc;

use rolodex_audit::AuditLogger;
use rolodex_auth::{CredentialStore, TokenAuthority};
use rolodex_core::RolodexConfig;
use rolodex_query::{QueryGateway, gate_for};
use rolodex_schema::SchemaReflector;
use sqlx::SqlitePool;

use crate::store::{ClientStore, CommissionStore, IdentityStore};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: SqlitePool,
    authority: TokenAuthority,
    credentials: Arc<dyn CredentialStore>,
    reflector: SchemaReflector,
    gateway: QueryGateway,
    audit: AuditLogger,
}

impl AppStateInner {
    fn clone_inner(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            authority: self.authority.clone(),
            credentials: self.credentials.clone(),
            reflector: self.reflector.clone(),
            gateway: self.gateway.clone(),
            audit: self.audit,
        }
    }
}

impl AppState {
    pub fn new(config: &RolodexConfig, pool: SqlitePool) -> Self {
        let authority = TokenAuthority::new(&config.auth.secret, config.auth.token_ttl_minutes);
        let gateway = QueryGateway::new(pool.clone(), gate_for(config.query_gate));
        let reflector = SchemaReflector::new(pool.clone());
        let credentials: Arc<dyn CredentialStore> = Arc::new(IdentityStore::new(pool.clone()));

        Self {
            inner: Arc::new(AppStateInner {
                pool,
                authority,
                credentials,
                reflector,
                gateway,
                audit: AuditLogger::new(),
            }),
        }
    }

    /// Replace the credential store behind the session boundary.
    pub fn with_credential_store(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        let inner = Arc::try_unwrap(self.inner).unwrap_or_else(|arc| arc.clone_inner());
        self.inner = Arc::new(AppStateInner {
            credentials,
            ..inner
        });
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    pub fn authority(&self) -> &TokenAuthority {
        &self.inner.authority
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.credentials
    }

    pub fn reflector(&self) -> &SchemaReflector {
        &self.inner.reflector
    }

    pub fn gateway(&self) -> &QueryGateway {
        &self.inner.gateway
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.inner.audit
    }

    pub fn identities(&self) -> IdentityStore {
        IdentityStore::new(self.inner.pool.clone())
    }

    pub fn clients(&self) -> ClientStore {
        ClientStore::new(self.inner.pool.clone())
    }

    pub fn commissions(&self) -> CommissionStore {
        CommissionStore::new(self.inner.pool.clone())
    }
}
