//! Identity adapters for the CredGuard gate.
//!
//! `HttpIdentityProvider` resolves a bearer/cookie credential against the
//! hosted auth service's user-introspection endpoint.
//! `StaticIdentityProvider` is an in-process token map for tests and local
//! development. Neither adapter ever sees a password: credentials here are
//! opaque session tokens issued elsewhere.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use credguard_core::error::GuardError;
use credguard_core::ports::{IdentityProvider, Result};
use credguard_core::principal::Identity;

/// Wire shape of the auth service's user endpoint.
#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    email: Option<String>,
}

/// Resolves credentials via `GET {base_url}/auth/v1/user`.
///
/// A 401/403 from the endpoint means the credential is invalid or expired
/// (`Ok(None)`); transport failures and unexpected statuses surface as
/// `StoreUnavailable` so the gate can fail closed.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl HttpIdentityProvider {
    pub fn new(
        base_url: impl Into<String>,
        service_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GuardError::Internal(anyhow!(e)))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            service_key: service_key.into(),
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn resolve_credential(&self, credential: &str) -> Result<Option<Identity>> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(credential)
            .header("apikey", &self.service_key)
            .send()
            .await
            .map_err(|e| GuardError::StoreUnavailable(format!("auth endpoint unreachable: {e}")))?;

        match response.status() {
            reqwest::StatusCode::OK => {
                let user: AuthUser = response.json().await.map_err(|e| {
                    GuardError::Internal(anyhow!("auth endpoint returned malformed user: {e}"))
                })?;
                Ok(Some(Identity {
                    user_id: user.id,
                    email: user.email,
                }))
            }
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                debug!("credential rejected by auth endpoint");
                Ok(None)
            }
            status => Err(GuardError::StoreUnavailable(format!(
                "auth endpoint returned {status}"
            ))),
        }
    }
}

/// In-process token → identity map.
#[derive(Debug, Default)]
pub struct StaticIdentityProvider {
    tokens: HashMap<String, Identity>,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.insert(token.into(), identity);
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn resolve_credential(&self, credential: &str) -> Result<Option<Identity>> {
        Ok(self.tokens.get(credential).cloned())
    }
}
