//! Postgres implementation of the core `RecordStore` port.

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use credguard_core::error::GuardError;
use credguard_core::ports::{RecordStore, Result};
use credguard_core::principal::{Profile, ResourceType};
use credguard_core::types::{AuditEntry, RequestLogEntry, SecurityEvent};

use crate::rows::PgProfileRow;

/// Postgres-backed record store over the hosted backend's tables
/// (`users`, `rate_limits`, `security_logs`, `audit_logs`, and the
/// ownership-checked resource tables).
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database-level failures are transient from the gate's point of view; the
/// gate applies its per-check fail-open/fail-closed policy on top.
fn store_err(err: sqlx::Error) -> GuardError {
    GuardError::StoreUnavailable(err.to_string())
}

/// Table behind each ownership-checked resource type.
fn resource_table(resource_type: ResourceType) -> &'static str {
    match resource_type {
        ResourceType::CreditReport => "credit_reports",
        ResourceType::Dispute => "dispute_letters",
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let row = sqlx::query_as::<_, PgProfileRow>(
            r#"
            SELECT id::text AS id, email, role::text AS role, permissions
            FROM users
            WHERE id::text = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err)?;
        row.map(|r| {
            r.try_into()
                .map_err(|e: String| GuardError::Internal(anyhow!(e)))
        })
        .transpose()
    }

    async fn count_recent_requests(
        &self,
        user_id: &str,
        window_start: DateTime<Utc>,
    ) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM rate_limits
            WHERE user_id::text = $1
              AND created_at >= $2
            "#,
        )
        .bind(user_id)
        .bind(window_start)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err)
    }

    async fn insert_request_log(&self, entry: &RequestLogEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO rate_limits (user_id, ip_address, endpoint, created_at)
            VALUES ($1::uuid, $2, $3, $4)
            "#,
        )
        .bind(&entry.user_id)
        .bind(&entry.ip_address)
        .bind(&entry.endpoint)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(())
    }

    async fn insert_security_event(&self, event: &SecurityEvent) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO security_logs (event_type, user_id, metadata, timestamp)
            VALUES ($1, $2::uuid, $3, $4)
            "#,
        )
        .bind(event.kind.as_ref())
        .bind(&event.user_id)
        .bind(&event.metadata)
        .bind(event.occurred_at)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(())
    }

    async fn insert_audit_log(&self, entry: &AuditEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (user_id, action, resource_type, resource_id, metadata, timestamp)
            VALUES ($1::uuid, $2, $3, $4::uuid, $5, $6)
            "#,
        )
        .bind(&entry.user_id)
        .bind(&entry.action)
        .bind(entry.resource_type.as_ref())
        .bind(&entry.resource_id)
        .bind(&entry.metadata)
        .bind(entry.recorded_at)
        .execute(&self.pool)
        .await
        .map_err(store_err)?;
        Ok(())
    }

    async fn get_resource_owner(
        &self,
        resource_type: ResourceType,
        resource_id: &str,
    ) -> Result<Option<String>> {
        let query = format!(
            r#"
            SELECT user_id::text
            FROM {table}
            WHERE id::text = $1
            "#,
            table = resource_table(resource_type)
        );
        sqlx::query_scalar::<_, String>(&query)
            .bind(resource_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)
    }
}
