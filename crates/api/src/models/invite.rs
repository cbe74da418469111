//! Invite token domain type.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use uuid::Uuid;

use sellerdesk_core::{InviteId, InviteStatus, StoreId};

/// How long an issued invite stays redeemable, in days.
pub const INVITE_TTL_DAYS: i64 = 7;

/// A single-use manager invite bound to one store.
///
/// Consumption is the only persisted transition; expiry is derived from
/// `created_at` so clocks are compared at read time, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct InviteToken {
    /// Unique row ID.
    pub id: InviteId,
    /// The opaque token carried in invite links.
    pub token: Uuid,
    /// Store the redeemed manager will be attached to.
    pub store_id: StoreId,
    /// When the invite was issued.
    pub created_at: DateTime<Utc>,
    /// Persisted lifecycle state.
    pub status: InviteStatus,
}

impl InviteToken {
    /// Invite lifetime as a duration.
    #[must_use]
    pub fn ttl() -> TimeDelta {
        TimeDelta::days(INVITE_TTL_DAYS)
    }

    /// The instant from which this invite counts as expired.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Self::ttl()
    }

    /// Returns true if this invite has already been redeemed.
    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.status == InviteStatus::Consumed
    }

    /// Returns true if the invite is past its lifetime at `now`.
    ///
    /// The boundary instant counts as expired: a token issued at `t` is
    /// dead from `t + 7 days` onward.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at >= Self::ttl()
    }

    /// Returns true if the invite can still be redeemed at `now`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_consumed() && !self.is_expired_at(now)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn issued_at(created_at: DateTime<Utc>) -> InviteToken {
        InviteToken {
            id: InviteId::new(1),
            token: Uuid::new_v4(),
            store_id: StoreId::new(1),
            created_at,
            status: InviteStatus::Issued,
        }
    }

    #[test]
    fn test_fresh_invite_is_valid() {
        let now = Utc::now();
        let invite = issued_at(now);
        assert!(!invite.is_expired_at(now));
        assert!(invite.is_valid_at(now));
    }

    #[test]
    fn test_expiry_is_monotonic_over_the_boundary() {
        let issued = Utc::now();
        let invite = issued_at(issued);

        // Any instant before the boundary is live
        assert!(!invite.is_expired_at(issued + TimeDelta::days(6)));
        assert!(!invite.is_expired_at(issued + InviteToken::ttl() - TimeDelta::seconds(1)));

        // The boundary itself and everything after is dead
        assert!(invite.is_expired_at(issued + InviteToken::ttl()));
        assert!(invite.is_expired_at(issued + InviteToken::ttl() + TimeDelta::seconds(1)));
        assert!(invite.is_expired_at(issued + TimeDelta::days(365)));
    }

    #[test]
    fn test_expires_at_matches_predicate() {
        let issued = Utc::now();
        let invite = issued_at(issued);
        assert!(invite.is_expired_at(invite.expires_at()));
        assert!(!invite.is_expired_at(invite.expires_at() - TimeDelta::seconds(1)));
    }

    #[test]
    fn test_consumed_invite_is_never_valid() {
        let now = Utc::now();
        let mut invite = issued_at(now);
        invite.status = InviteStatus::Consumed;
        assert!(invite.is_consumed());
        assert!(!invite.is_valid_at(now));
        // Consumption does not affect the expiry clock
        assert!(!invite.is_expired_at(now));
    }

    #[test]
    fn test_expired_invite_is_invalid_but_not_consumed() {
        let issued = Utc::now() - TimeDelta::days(8);
        let invite = issued_at(issued);
        let now = Utc::now();
        assert!(invite.is_expired_at(now));
        assert!(!invite.is_consumed());
        assert!(!invite.is_valid_at(now));
    }
}
