use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// The authenticated principal as resolved by the identity provider.
/// Maps 1:1 to an external auth-service user record; read-only to this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
}

/// Closed role set. A new role is a compile-time-checked addition to the
/// permission table in [`Role::allows`], not a runtime string lookup.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, AsRefStr, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Admin,
    Client,
    TeamMember,
}

/// Operations the gate can authorize.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, AsRefStr, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    ReadCreditReport,
    CreateDispute,
    ReadDispute,
    ReadProfile,
    AdminAccess,
    ReadAllUsers,
    ModifyUser,
}

/// Resource kinds that carry an ownership fact in the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, AsRefStr, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResourceType {
    CreditReport,
    Dispute,
}

impl Role {
    /// Exhaustive permission table. Ownership of resource-scoped operations
    /// is validated separately by the gate.
    pub fn allows(self, operation: Operation) -> bool {
        match self {
            Role::Admin => true,
            Role::Client => matches!(
                operation,
                Operation::ReadCreditReport
                    | Operation::CreateDispute
                    | Operation::ReadDispute
                    | Operation::ReadProfile
            ),
            // The platform has never granted team members anything of their
            // own; kept as an explicit deny-all row.
            Role::TeamMember => false,
        }
    }
}

/// The store's user record: role plus an optional free-form permission set
/// carried for callers. The permission set is not consulted by the role
/// table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub email: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub permissions: Vec<String>,
}
