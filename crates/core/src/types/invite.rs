//! Invite token state vocabulary.

use serde::{Deserialize, Serialize};

/// Error returned when an invite status string is not part of the vocabulary.
#[derive(thiserror::Error, Debug, Clone)]
#[error("invalid invite status: {0}")]
pub struct InviteStatusError(pub String);

/// Persisted state of a manager invite token.
///
/// The machine is one-way: `Issued` tokens become `Consumed` exactly once
/// and never go back. Expiry is not a state; it is derived from the token
/// age at read time, so an expired token still carries its persisted
/// status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "invite_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum InviteStatus {
    /// Live or expired, but never yet redeemed.
    #[default]
    Issued,
    /// Redeemed into a manager account. Terminal.
    Consumed,
}

impl std::fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Issued => write!(f, "issued"),
            Self::Consumed => write!(f, "consumed"),
        }
    }
}

impl std::str::FromStr for InviteStatus {
    type Err = InviteStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issued" => Ok(Self::Issued),
            "consumed" => Ok(Self::Consumed),
            _ => Err(InviteStatusError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_from_str_roundtrip() {
        for status in [InviteStatus::Issued, InviteStatus::Consumed] {
            let parsed: InviteStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_rejects_unknown() {
        assert!("used".parse::<InviteStatus>().is_err());
        assert!("".parse::<InviteStatus>().is_err());
    }

    #[test]
    fn test_default_is_issued() {
        assert_eq!(InviteStatus::default(), InviteStatus::Issued);
    }
}
