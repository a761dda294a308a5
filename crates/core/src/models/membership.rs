//! Membership model and status state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Membership lifecycle states
///
/// `pending -> active` on owner approval; `active <-> disabled` on owner
/// enable/disable. Leaving deletes the row rather than transitioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    /// Join request awaiting owner approval (private clubs)
    Pending,
    /// Full member; the only status eligible for event registration
    Active,
    /// Suspended by the owner
    Disabled,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Pending => "pending",
            MembershipStatus::Active => "active",
            MembershipStatus::Disabled => "disabled",
        }
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Membership roles; single-valued today, modeled as an enum for future
/// extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    Member,
}

impl MembershipRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipRole::Member => "member",
        }
    }
}

/// A user's membership in a club
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub club_id: Uuid,
    pub status: MembershipStatus,
    pub role: MembershipRole,
    pub created_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(user_id: Uuid, club_id: Uuid, status: MembershipStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            club_id,
            status,
            role: MembershipRole::Member,
            created_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == MembershipStatus::Active
    }
}

/// A member with user identity for the owner's management view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberEntry {
    pub membership_id: Uuid,
    pub user_id: Uuid,
    pub display_name: String,
    pub email: String,
    pub status: MembershipStatus,
    pub role: MembershipRole,
}
