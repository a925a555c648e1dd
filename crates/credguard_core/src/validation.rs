//! Input-shape validation with field-level error accumulation.
//!
//! Failures surface as the full `{field, message}` list so callers can
//! render per-field feedback, not first-error-wins.

use std::net::IpAddr;

use uuid::Uuid;

use crate::error::{FieldError, GuardError};
use crate::types::AuditEntry;

/// Error-accumulating validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_non_empty(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors
                .push(FieldError::new(field, format!("{field} is required")));
        }
        self
    }

    pub fn require_max_len(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.chars().count() > max {
            self.errors.push(FieldError::new(
                field,
                format!("{field} cannot exceed {max} characters"),
            ));
        }
        self
    }

    pub fn require_uuid(&mut self, field: &str, value: &str) -> &mut Self {
        if Uuid::parse_str(value).is_err() {
            self.errors
                .push(FieldError::new(field, format!("invalid {field} format")));
        }
        self
    }

    pub fn require_ip(&mut self, field: &str, value: &str) -> &mut Self {
        if value.parse::<IpAddr>().is_err() {
            self.errors
                .push(FieldError::new(field, format!("invalid {field}")));
        }
        self
    }

    pub fn finish(self) -> Result<(), GuardError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(GuardError::Validation(self.errors))
        }
    }
}

impl AuditEntry {
    /// Shape check applied before the fire-and-forget insert.
    pub fn validate(&self) -> Result<(), GuardError> {
        let mut v = Validator::new();
        v.require_non_empty("user_id", &self.user_id);
        v.require_non_empty("action", &self.action);
        v.require_max_len("action", &self.action, 100);
        v.require_uuid("resource_id", &self.resource_id);
        v.finish()
    }
}
