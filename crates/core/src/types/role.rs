//! Account and message-sender role vocabularies.

use serde::{Deserialize, Serialize};

/// Error returned when a role string is not part of the vocabulary.
#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid role: {0}")]
pub struct RoleError(pub String);

/// Account role with different permission levels.
///
/// Every account has exactly one role. `Owner` and `Manager` are staff
/// roles; `User` is a buyer account materialized from external
/// marketplace traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "role", rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Buyer account created from marketplace traffic. No back-office access.
    #[default]
    User,
    /// Store staff hired through an invite. Scoped to one store.
    Manager,
    /// Store proprietor. Owns at most one store and administers its staff.
    Owner,
}

impl Role {
    /// Whether this role may mutate store resources.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Manager | Self::Owner)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Manager => write!(f, "manager"),
            Self::Owner => write!(f, "owner"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "manager" => Ok(Self::Manager),
            "owner" => Ok(Self::Owner),
            _ => Err(RoleError(s.to_owned())),
        }
    }
}

/// Role attached to a conversation message or answer.
///
/// Extends [`Role`] with `Ai` for replies produced by automation rather
/// than a signed-in account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "sender_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum SenderRole {
    User,
    Manager,
    Owner,
    /// Automated reply submitted with the service secret, no account.
    Ai,
}

impl From<Role> for SenderRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => Self::User,
            Role::Manager => Self::Manager,
            Role::Owner => Self::Owner,
        }
    }
}

impl std::fmt::Display for SenderRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Manager => write!(f, "manager"),
            Self::Owner => write!(f, "owner"),
            Self::Ai => write!(f, "ai"),
        }
    }
}

impl std::str::FromStr for SenderRole {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "manager" => Ok(Self::Manager),
            "owner" => Ok(Self::Owner),
            "ai" => Ok(Self::Ai),
            _ => Err(RoleError(s.to_owned())),
        }
    }
}
