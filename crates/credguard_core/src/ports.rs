//! Port traits the gate depends on. Implemented by `credguard_postgres` and
//! `credguard_identity` in production, and by recording fakes in tests —
//! the gate logic itself never touches a driver.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::GuardError;
use crate::principal::{Identity, Profile, ResourceType};
use crate::types::{AuditEntry, RequestLogEntry, SecurityEvent};

pub type Result<T> = std::result::Result<T, GuardError>;

/// Resolves an opaque bearer/cookie credential to an identity.
///
/// `Ok(None)` means the credential is well-formed but invalid or expired;
/// `Err` means the provider itself could not answer. The gate treats both as
/// authentication failure (fail-closed).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve_credential(&self, credential: &str) -> Result<Option<Identity>>;
}

/// Persistence operations the gate reads and appends through.
///
/// The store owns every mutated table (users, rate-limit log, security and
/// audit logs, resource ownership facts); the gate holds no state between
/// calls.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Load the role/permission profile for an identity.
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>>;

    /// Count request-log rows for `user_id` with `created_at >= window_start`.
    async fn count_recent_requests(
        &self,
        user_id: &str,
        window_start: DateTime<Utc>,
    ) -> Result<i64>;

    /// Append one admitted request to the rate-limit log.
    async fn insert_request_log(&self, entry: &RequestLogEntry) -> Result<()>;

    /// Append a security event (anomalies and denials).
    async fn insert_security_event(&self, event: &SecurityEvent) -> Result<()>;

    /// Append an audit-log entry (completed actions).
    async fn insert_audit_log(&self, entry: &AuditEntry) -> Result<()>;

    /// Owning identity for a resource, or `None` if no resource of the given
    /// type has that id.
    async fn get_resource_owner(
        &self,
        resource_type: ResourceType,
        resource_id: &str,
    ) -> Result<Option<String>>;
}
