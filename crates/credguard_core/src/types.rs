//! Log-entry shapes written through the `RecordStore` port.
//!
//! All three are append-only: written once by the gate, never mutated or
//! deleted, owned thereafter by the store. Only derived facts land here —
//! raw credentials and request bodies never do.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

use crate::principal::ResourceType;

/// One admitted request, counted by the sliding-window limiter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestLogEntry {
    pub user_id: String,
    pub ip_address: String,
    pub endpoint: String,
    pub created_at: DateTime<Utc>,
}

/// Anomaly/denial record, distinct from the audit log (which records
/// completed actions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub kind: SecurityEventKind,
    pub user_id: String,
    pub metadata: Value,
    pub occurred_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, AsRefStr, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SecurityEventKind {
    SuspiciousIp,
    SuspiciousUserAgent,
    RateLimitExceeded,
}

/// Completed-action record for compliance and traceability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub user_id: String,
    pub action: String,
    pub resource_type: ResourceType,
    pub resource_id: String,
    pub metadata: Option<Value>,
    pub recorded_at: DateTime<Utc>,
}
