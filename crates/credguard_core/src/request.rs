use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::principal::Profile;

/// Per-request descriptor the gate validates.
///
/// Holds the raw credential only for the duration of one validation call; it
/// is never persisted and never copied into log entries. Header names are
/// stored lower-cased so lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct SessionRequest {
    bearer: Option<String>,
    cookie: Option<String>,
    headers: HashMap<String, String>,
    pub received_at: DateTime<Utc>,
}

impl SessionRequest {
    pub fn new(received_at: DateTime<Utc>) -> Self {
        Self {
            bearer: None,
            cookie: None,
            headers: HashMap::new(),
            received_at,
        }
    }

    /// Set the authorization-header credential (builder pattern).
    pub fn with_bearer(mut self, value: impl Into<String>) -> Self {
        self.bearer = Some(value.into());
        self
    }

    /// Set the session-cookie credential.
    pub fn with_cookie(mut self, value: impl Into<String>) -> Self {
        self.cookie = Some(value.into());
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Effective credential: the bearer value (any `Bearer ` scheme prefix
    /// stripped) takes priority over the cookie. `None` when neither carries
    /// a non-empty token.
    pub fn credential(&self) -> Option<&str> {
        if let Some(bearer) = self.bearer.as_deref() {
            let token = bearer.strip_prefix("Bearer ").unwrap_or(bearer).trim();
            if !token.is_empty() {
                return Some(token);
            }
        }
        self.cookie.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Effective remote address. Header priority: the CDN connecting-IP
    /// header, then the generic real-IP header, then the first
    /// comma-separated entry of the standard forwarded-for header, trimmed.
    /// Falls back to the literal `"unknown"`.
    pub fn client_ip(&self) -> String {
        if let Some(ip) = self.header("cf-connecting-ip") {
            return ip.to_string();
        }
        if let Some(ip) = self.header("x-real-ip") {
            return ip.to_string();
        }
        if let Some(forwarded) = self.header("x-forwarded-for") {
            if let Some(first) = forwarded.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return first.to_string();
                }
            }
        }
        "unknown".to_string()
    }

    /// Declared client agent string; empty when the header is absent.
    pub fn user_agent(&self) -> &str {
        self.header("user-agent").unwrap_or("")
    }
}

/// Correlation metadata attached to a successful validation.
///
/// The session id is freshly generated per call for downstream correlation
/// only — it carries no persistence or expiry semantics.
#[derive(Debug, Clone, Serialize)]
pub struct SessionMeta {
    pub session_id: Uuid,
    pub ip_address: String,
    pub user_agent: String,
    pub validated_at: DateTime<Utc>,
}

/// A fully valid session. Invalid outcomes are `GuardError` variants; there
/// is no partially-valid shape.
#[derive(Debug, Clone)]
pub struct ValidSession {
    pub profile: Profile,
    pub meta: SessionMeta,
}
