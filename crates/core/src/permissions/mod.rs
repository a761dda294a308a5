//! Authorization gating for club operations

use uuid::Uuid;

use crate::models::{Club, MembershipStatus};

/// The caller's relationship to a club
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// The club owner
    Owner,
    /// A user holding a membership row, carrying its status
    Member(MembershipStatus),
    /// An authenticated user with no membership row
    Visitor,
    /// An unauthenticated caller
    Anonymous,
}

/// Actions that can be performed against a club
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClubAction {
    // Read surface
    ViewClub,
    ViewEventDetail,

    // Owner management
    ManageClub,
    ManageMembers,
    ManageEvents,

    // Member actions
    RegisterForEvent,
    RequestJoin,
}

impl Actor {
    /// Classify a caller against a club
    pub fn classify(
        club: &Club,
        user_id: Option<Uuid>,
        membership: Option<MembershipStatus>,
    ) -> Actor {
        match user_id {
            None => Actor::Anonymous,
            Some(id) if club.is_owner(Some(id)) => Actor::Owner,
            Some(_) => match membership {
                Some(status) => Actor::Member(status),
                None => Actor::Visitor,
            },
        }
    }

    /// Check if this actor may perform an action
    pub fn can_perform(&self, action: ClubAction) -> bool {
        match action {
            // Anyone may look at the public club surface; whether a given
            // club shows up there is a visibility question, not an
            // authorization one
            ClubAction::ViewClub => true,

            // Event detail (participant lists included) is for active
            // members and the owner
            ClubAction::ViewEventDetail => {
                matches!(self, Actor::Owner | Actor::Member(MembershipStatus::Active))
            }

            // Owner-only management
            ClubAction::ManageClub | ClubAction::ManageMembers | ClubAction::ManageEvents => {
                *self == Actor::Owner
            }

            // Only active members register; the owner is explicitly barred
            ClubAction::RegisterForEvent => {
                matches!(self, Actor::Member(MembershipStatus::Active))
            }

            // Joining requires no prior row of any status; owners never
            // join their own club. A disabled member stays locked out
            // until the owner re-enables them.
            ClubAction::RequestJoin => *self == Actor::Visitor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_permissions() {
        assert!(Actor::Owner.can_perform(ClubAction::ManageClub));
        assert!(Actor::Owner.can_perform(ClubAction::ManageMembers));
        assert!(Actor::Owner.can_perform(ClubAction::ManageEvents));
        assert!(Actor::Owner.can_perform(ClubAction::ViewEventDetail));

        // The owner never registers for their own events, never joins
        assert!(!Actor::Owner.can_perform(ClubAction::RegisterForEvent));
        assert!(!Actor::Owner.can_perform(ClubAction::RequestJoin));
    }

    #[test]
    fn test_member_permissions_by_status() {
        let active = Actor::Member(MembershipStatus::Active);
        assert!(active.can_perform(ClubAction::RegisterForEvent));
        assert!(active.can_perform(ClubAction::ViewEventDetail));
        assert!(!active.can_perform(ClubAction::ManageMembers));
        assert!(!active.can_perform(ClubAction::RequestJoin));

        for status in [MembershipStatus::Pending, MembershipStatus::Disabled] {
            let actor = Actor::Member(status);
            assert!(!actor.can_perform(ClubAction::RegisterForEvent));
            assert!(!actor.can_perform(ClubAction::ViewEventDetail));
            // Any existing row blocks a fresh join request
            assert!(!actor.can_perform(ClubAction::RequestJoin));
        }
    }

    #[test]
    fn test_visitor_and_anonymous() {
        assert!(Actor::Visitor.can_perform(ClubAction::RequestJoin));
        assert!(!Actor::Visitor.can_perform(ClubAction::RegisterForEvent));
        assert!(!Actor::Anonymous.can_perform(ClubAction::RequestJoin));
        assert!(Actor::Anonymous.can_perform(ClubAction::ViewClub));
    }
}
