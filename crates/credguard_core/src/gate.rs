//! AccessGate — validates an inbound request's credentials, applies
//! heuristic security checks, enforces the sliding-window rate limit,
//! resolves role/permissions and resource ownership, and appends
//! audit/security log entries as side effects.
//!
//! The validation flow is a straight-line pipeline with four exit gates:
//! Unauthenticated → Forbidden → RateLimited → ProfileNotFound → valid.
//! No gate is revisited within one call, and heuristic rejections happen
//! before any rate-limit budget is charged.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::time::timeout;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::GateConfig;
use crate::error::GuardError;
use crate::heuristics::{self, AllowAllReputation, IpReputation};
use crate::ports::{IdentityProvider, RecordStore};
use crate::principal::{Identity, Operation, Profile, ResourceType, Role};
use crate::rate_limit::RateLimitDecision;
use crate::request::{SessionMeta, SessionRequest, ValidSession};
use crate::types::{AuditEntry, RequestLogEntry, SecurityEvent, SecurityEventKind};

/// Endpoint label recorded for request-log rows written during validation.
const DEFAULT_ENDPOINT: &str = "api_request";

pub struct AccessGate {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn RecordStore>,
    reputation: Arc<dyn IpReputation>,
    config: GateConfig,
}

impl AccessGate {
    /// Gate with the permissive placeholder reputation predicate.
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn RecordStore>,
        config: GateConfig,
    ) -> Self {
        Self {
            identity,
            store,
            reputation: Arc::new(AllowAllReputation),
            config,
        }
    }

    /// Inject a reputation predicate (builder pattern).
    pub fn with_reputation(mut self, reputation: Arc<dyn IpReputation>) -> Self {
        self.reputation = reputation;
        self
    }

    // ── session validation ────────────────────────────────────

    /// Validate an inbound request end to end.
    ///
    /// Returns either a fully valid session with a complete profile, or an
    /// error carrying exactly one documented reason. A request with no
    /// credential is rejected without any external call.
    pub async fn validate_session(
        &self,
        request: &SessionRequest,
    ) -> Result<ValidSession, GuardError> {
        let Some(credential) = request.credential() else {
            return Err(GuardError::Unauthenticated(
                "no authentication credentials provided".into(),
            ));
        };

        let identity = self.resolve_identity(credential).await?;
        self.run_security_checks(request, &identity).await?;
        let profile = self.load_profile(&identity).await?;

        Ok(ValidSession {
            profile,
            meta: SessionMeta {
                session_id: Uuid::new_v4(),
                ip_address: request.client_ip(),
                user_agent: request.user_agent().to_string(),
                validated_at: request.received_at,
            },
        })
    }

    /// Identity resolution fails closed: a provider error or timeout is an
    /// authentication failure, not an open door.
    async fn resolve_identity(&self, credential: &str) -> Result<Identity, GuardError> {
        let resolved = timeout(
            self.config.store_timeout,
            self.identity.resolve_credential(credential),
        )
        .await;
        match resolved {
            Ok(Ok(Some(identity))) => Ok(identity),
            Ok(Ok(None)) => Err(GuardError::Unauthenticated(
                "invalid or expired session".into(),
            )),
            Ok(Err(err)) => {
                warn!(error = %err, "identity resolution failed");
                Err(GuardError::Unauthenticated(
                    "invalid or expired session".into(),
                ))
            }
            Err(_) => {
                warn!("identity resolution timed out");
                Err(GuardError::Unauthenticated(
                    "invalid or expired session".into(),
                ))
            }
        }
    }

    /// Profile lookup fails closed.
    async fn load_profile(&self, identity: &Identity) -> Result<Profile, GuardError> {
        let looked_up = timeout(
            self.config.store_timeout,
            self.store.get_profile(&identity.user_id),
        )
        .await;
        match looked_up {
            Ok(Ok(Some(profile))) => Ok(profile),
            Ok(Ok(None)) => Err(GuardError::ProfileNotFound(identity.user_id.clone())),
            Ok(Err(err)) => {
                warn!(user_id = %identity.user_id, error = %err, "profile lookup failed");
                Err(GuardError::ProfileNotFound(identity.user_id.clone()))
            }
            Err(_) => {
                warn!(user_id = %identity.user_id, "profile lookup timed out");
                Err(GuardError::ProfileNotFound(identity.user_id.clone()))
            }
        }
    }

    // ── security checks ───────────────────────────────────────

    /// Heuristic checks first, then the rate limiter. Each heuristic failure
    /// writes a security event describing which check flagged the request.
    async fn run_security_checks(
        &self,
        request: &SessionRequest,
        identity: &Identity,
    ) -> Result<(), GuardError> {
        let client_ip = request.client_ip();

        if self.reputation.is_suspicious(&client_ip) {
            self.log_security_event(
                SecurityEventKind::SuspiciousIp,
                &identity.user_id,
                json!({ "ip": client_ip }),
                request.received_at,
            )
            .await;
            return Err(GuardError::Forbidden("request origin flagged".into()));
        }

        let user_agent = request.user_agent();
        if heuristics::is_suspicious_user_agent(user_agent, &self.config.suspicious_agent_patterns)
        {
            self.log_security_event(
                SecurityEventKind::SuspiciousUserAgent,
                &identity.user_id,
                json!({ "user_agent": user_agent }),
                request.received_at,
            )
            .await;
            return Err(GuardError::Forbidden("client agent flagged".into()));
        }

        let decision = self
            .check_rate_limit(
                &identity.user_id,
                &client_ip,
                DEFAULT_ENDPOINT,
                request.received_at,
            )
            .await;
        if !decision.allowed {
            self.log_security_event(
                SecurityEventKind::RateLimitExceeded,
                &identity.user_id,
                json!({ "ip": client_ip }),
                request.received_at,
            )
            .await;
            return Err(GuardError::RateLimited {
                reset_at: decision.reset_at,
            });
        }

        Ok(())
    }

    // ── rate limiting ─────────────────────────────────────────

    /// One sliding-window check for `user_id`.
    ///
    /// Counts persisted request-log rows inside the trailing window, then
    /// appends a row for the admitted request. A rejected attempt is not
    /// appended. If the store cannot answer, the check fails open so an
    /// infrastructure outage does not block legitimate traffic.
    pub async fn check_rate_limit(
        &self,
        user_id: &str,
        ip: &str,
        endpoint: &str,
        now: DateTime<Utc>,
    ) -> RateLimitDecision {
        let window = self.config.window();
        let window_start = now - window;

        let counted = timeout(
            self.config.store_timeout,
            self.store.count_recent_requests(user_id, window_start),
        )
        .await;
        let count = match counted {
            Ok(Ok(count)) => count,
            Ok(Err(err)) => {
                warn!(user_id, error = %err, "rate limit count failed, allowing request");
                return RateLimitDecision::fail_open(now, window);
            }
            Err(_) => {
                warn!(user_id, "rate limit count timed out, allowing request");
                return RateLimitDecision::fail_open(now, window);
            }
        };

        if count >= self.config.rate_limit_max_requests {
            return RateLimitDecision::rejected(now, window);
        }

        let entry = RequestLogEntry {
            user_id: user_id.to_string(),
            ip_address: ip.to_string(),
            endpoint: endpoint.to_string(),
            created_at: now,
        };
        match timeout(
            self.config.store_timeout,
            self.store.insert_request_log(&entry),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(user_id, error = %err, "request log insert failed"),
            Err(_) => warn!(user_id, "request log insert timed out"),
        }

        RateLimitDecision::admitted(count, self.config.rate_limit_max_requests, now, window)
    }

    // ── authorization ─────────────────────────────────────────

    /// Authorize `operation` for the profile, with ownership validation for
    /// resource-scoped calls.
    ///
    /// Returns a plain boolean; a normal deny never surfaces as an error. An
    /// unexpected store failure during the ownership lookup denies
    /// (fail-closed, logged).
    pub async fn authorize(
        &self,
        profile: &Profile,
        operation: Operation,
        resource_id: Option<&str>,
    ) -> bool {
        if !profile.role.allows(operation) {
            return false;
        }
        if profile.role == Role::Admin {
            return true;
        }
        match resource_id {
            // The operation is not resource-scoped.
            None => true,
            Some(id) => self.owns_resource(&profile.user_id, id).await,
        }
    }

    /// Checks each known resource type in order — credit report, then
    /// dispute. The first type whose owner matches wins.
    async fn owns_resource(&self, user_id: &str, resource_id: &str) -> bool {
        for resource_type in [ResourceType::CreditReport, ResourceType::Dispute] {
            let lookup = timeout(
                self.config.store_timeout,
                self.store.get_resource_owner(resource_type, resource_id),
            )
            .await;
            match lookup {
                Ok(Ok(Some(owner))) if owner == user_id => return true,
                Ok(Ok(_)) => {}
                Ok(Err(err)) => {
                    warn!(user_id, resource_id, error = %err, "ownership lookup failed, denying");
                    return false;
                }
                Err(_) => {
                    warn!(user_id, resource_id, "ownership lookup timed out, denying");
                    return false;
                }
            }
        }
        false
    }

    // ── audit logging ─────────────────────────────────────────

    /// Fire-and-forget audit append. Never fails the caller: shape errors
    /// and store failures are logged and swallowed.
    pub async fn record_audit(&self, entry: AuditEntry) {
        if let Err(err) = entry.validate() {
            warn!(user_id = %entry.user_id, error = %err, "audit entry rejected");
            return;
        }
        match timeout(
            self.config.store_timeout,
            self.store.insert_audit_log(&entry),
        )
        .await
        {
            Ok(Ok(())) => {
                debug!(user_id = %entry.user_id, action = %entry.action, "audit entry recorded");
            }
            Ok(Err(err)) => warn!(user_id = %entry.user_id, error = %err, "audit log insert failed"),
            Err(_) => warn!(user_id = %entry.user_id, "audit log insert timed out"),
        }
    }

    async fn log_security_event(
        &self,
        kind: SecurityEventKind,
        user_id: &str,
        metadata: serde_json::Value,
        occurred_at: DateTime<Utc>,
    ) {
        let event = SecurityEvent {
            kind,
            user_id: user_id.to_string(),
            metadata,
            occurred_at,
        };
        match timeout(
            self.config.store_timeout,
            self.store.insert_security_event(&event),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(user_id, kind = %kind, error = %err, "security event insert failed"),
            Err(_) => warn!(user_id, kind = %kind, "security event insert timed out"),
        }
    }
}
