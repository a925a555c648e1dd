use thiserror::Error;

/// One field-level validation failure. Surfaced as a list so callers can
/// render per-field feedback instead of a single opaque message.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("rate limited: window resets at {reset_at}")]
    RateLimited {
        reset_at: chrono::DateTime<chrono::Utc>,
    },

    #[error("profile not found for user {0}")]
    ProfileNotFound(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("validation failed: {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}

impl GuardError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Unauthenticated(_) => 401,
            Self::Forbidden(_) => 403,
            Self::RateLimited { .. } => 429,
            // Indistinguishable from Forbidden at the wire.
            Self::ProfileNotFound(_) => 403,
            Self::StoreUnavailable(_) => 503,
            Self::Validation(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Operator-safe message for response bodies. Authentication denials all
    /// collapse to the same string; the specific reason stays in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) | Self::Forbidden(_) | Self::ProfileNotFound(_) => {
                "access denied"
            }
            Self::RateLimited { .. } => "rate limit exceeded",
            Self::StoreUnavailable(_) => "service temporarily unavailable",
            Self::Validation(_) => "request validation failed",
            Self::Internal(_) => "internal error",
        }
    }

    pub fn retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::StoreUnavailable(_))
    }
}
