//! Row types decoded from the hosted backend's schema.
//!
//! Conversion into core types is explicit: an unknown role string in
//! `users.role` is a decode error, not a silent default.

use credguard_core::principal::{Profile, Role};

#[derive(Debug, sqlx::FromRow)]
pub struct PgProfileRow {
    pub id: String,
    pub email: Option<String>,
    pub role: String,
    pub permissions: Option<serde_json::Value>,
}

impl TryFrom<PgProfileRow> for Profile {
    type Error = String;

    fn try_from(row: PgProfileRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|_| format!("unknown role '{}' for user {}", row.role, row.id))?;
        // permissions is a JSON array of strings; anything else decodes to
        // the empty set.
        let permissions = match row.permissions {
            Some(serde_json::Value::Array(values)) => values
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };
        Ok(Profile {
            user_id: row.id,
            email: row.email,
            role,
            permissions,
        })
    }
}
