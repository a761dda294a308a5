//! Membership ledger operations
//!
//! The (user, club) state machine: pending -> active on approval,
//! active <-> disabled on owner action. Leaving or removal deletes the
//! row; a later rejoin starts a fresh one.

use tracing::{info, warn};
use uuid::Uuid;

use super::Engine;
use crate::error::{Error, Result};
use crate::invariants;
use crate::models::{Club, MemberEntry, Membership, MembershipStatus};
use crate::notify::MembershipApproved;
use crate::permissions::ClubAction;

impl Engine {
    /// Request to join a club
    ///
    /// Public clubs auto-approve; private clubs queue the request as
    /// pending. Owners and anyone holding a membership row (whatever its
    /// status) are turned away.
    pub fn request_join(&self, user_id: Uuid, club_id: Uuid) -> Result<Membership> {
        let club = self.club_or_not_found(club_id)?;

        if club.is_owner(Some(user_id)) {
            return Err(Error::Ineligible(
                "club owner cannot be a member of their own club".into(),
            ));
        }

        let membership = self.db.immediate(|db| {
            if db.memberships().find(user_id, club.id)?.is_some() {
                return Err(Error::Ineligible("is already a member of this club".into()));
            }

            let status = if club.public {
                MembershipStatus::Active
            } else {
                MembershipStatus::Pending
            };
            let membership = Membership::new(user_id, club.id, status);
            invariants::assert_membership_invariants(&membership, &club);
            db.memberships().create(&membership)?;
            Ok(membership)
        })?;

        info!(
            user_id = %user_id,
            club_id = %club.id,
            status = %membership.status,
            "membership requested"
        );
        Ok(membership)
    }

    /// Approve a membership; owner only. Sets the status to active and
    /// hands a notice to the notifier. A failing dispatch never undoes
    /// the approval.
    pub fn approve_membership(
        &self,
        actor_id: Uuid,
        club_id: Uuid,
        membership_id: Uuid,
    ) -> Result<Membership> {
        let club = self.club_or_not_found(club_id)?;
        self.require_owner(&club, actor_id, ClubAction::ManageMembers)?;

        let mut membership = self.membership_in_club(&club, membership_id)?;
        self.db
            .memberships()
            .update_status(membership.id, MembershipStatus::Active)?;
        membership.status = MembershipStatus::Active;

        self.dispatch_approved(&membership, &club);
        info!(membership_id = %membership.id, club_id = %club.id, "membership approved");
        Ok(membership)
    }

    /// Re-enable a disabled membership; owner only. Enabling an already
    /// active membership is a no-op success.
    pub fn enable_membership(
        &self,
        actor_id: Uuid,
        club_id: Uuid,
        membership_id: Uuid,
    ) -> Result<Membership> {
        self.set_membership_status(actor_id, club_id, membership_id, MembershipStatus::Active)
    }

    /// Disable a membership; owner only. Disabling an already disabled
    /// membership is a no-op success.
    pub fn disable_membership(
        &self,
        actor_id: Uuid,
        club_id: Uuid,
        membership_id: Uuid,
    ) -> Result<Membership> {
        self.set_membership_status(actor_id, club_id, membership_id, MembershipStatus::Disabled)
    }

    fn set_membership_status(
        &self,
        actor_id: Uuid,
        club_id: Uuid,
        membership_id: Uuid,
        status: MembershipStatus,
    ) -> Result<Membership> {
        let club = self.club_or_not_found(club_id)?;
        self.require_owner(&club, actor_id, ClubAction::ManageMembers)?;

        let mut membership = self.membership_in_club(&club, membership_id)?;
        if membership.status != status {
            self.db.memberships().update_status(membership.id, status)?;
            membership.status = status;
            info!(membership_id = %membership.id, status = %status, "membership status changed");
        }
        Ok(membership)
    }

    /// Leave a club, deleting the membership row
    pub fn leave_club(&self, user_id: Uuid, club_id: Uuid) -> Result<()> {
        let club = self.club_or_not_found(club_id)?;

        let membership = self
            .db
            .memberships()
            .find(user_id, club.id)?
            .ok_or_else(|| Error::Ineligible("you are not a member of this club".into()))?;

        self.db.memberships().remove(membership.id)?;
        info!(user_id = %user_id, club_id = %club.id, "membership left");
        Ok(())
    }

    /// Remove a member; owner only. Deletes the row unconditionally.
    pub fn remove_member(
        &self,
        actor_id: Uuid,
        club_id: Uuid,
        membership_id: Uuid,
    ) -> Result<()> {
        let club = self.club_or_not_found(club_id)?;
        self.require_owner(&club, actor_id, ClubAction::ManageMembers)?;

        let membership = self.membership_in_club(&club, membership_id)?;
        self.db.memberships().remove(membership.id)?;
        info!(membership_id = %membership.id, club_id = %club.id, "membership removed");
        Ok(())
    }

    /// List members with identity; owner-only management view
    pub fn members(&self, actor_id: Uuid, club_id: Uuid) -> Result<Vec<MemberEntry>> {
        let club = self.club_or_not_found(club_id)?;
        self.require_owner(&club, actor_id, ClubAction::ManageMembers)?;
        self.db.memberships().list_for_club(club.id)
    }

    /// Whether the user holds an active membership
    pub fn is_active_member(&self, user_id: Option<Uuid>, club_id: Uuid) -> Result<bool> {
        let Some(user_id) = user_id else {
            return Ok(false);
        };
        Ok(self.db.memberships().status_of(user_id, club_id)?
            == Some(MembershipStatus::Active))
    }

    /// Whether the user may request to join: not the owner, and no
    /// membership row of any status
    pub fn can_join(&self, user_id: Uuid, club_id: Uuid) -> Result<bool> {
        let club = self.club_or_not_found(club_id)?;
        let actor = self.actor_for(&club, Some(user_id))?;
        Ok(actor.can_perform(ClubAction::RequestJoin))
    }

    fn membership_in_club(&self, club: &Club, membership_id: Uuid) -> Result<Membership> {
        self.db
            .memberships()
            .find_by_id(membership_id)?
            .filter(|m| m.club_id == club.id)
            .ok_or_else(|| Error::NotFound("membership not found".into()))
    }

    fn dispatch_approved(&self, membership: &Membership, club: &Club) {
        let user = match self.db.users().find_by_id(membership.user_id) {
            Ok(Some(user)) => user,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, membership_id = %membership.id, "could not load member for notice");
                return;
            }
        };

        let notice = MembershipApproved {
            membership_id: membership.id,
            user_id: user.id,
            email: user.email,
            display_name: user.display_name,
            club_id: club.id,
            club_name: club.name.clone(),
        };

        if let Err(e) = self.notifier.membership_approved(&notice) {
            warn!(error = %e, membership_id = %membership.id, "membership notice failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{ClubAttrs, User};
    use crate::notify::{NotifyError, Notifier, RecordingNotifier};
    use crate::storage::Database;

    fn engine() -> Engine {
        Engine::open_in_memory().unwrap()
    }

    fn seed_user(engine: &Engine, email: &str, name: &str) -> User {
        let user = User::new(email.into(), name.into());
        engine.database().users().create(&user).unwrap();
        user
    }

    fn seed_club(engine: &Engine, owner: &User, public: bool) -> crate::models::Club {
        engine
            .create_club(
                owner.id,
                ClubAttrs {
                    name: "Harbor Swimmers".into(),
                    description: "Open water swims".into(),
                    rules: "Bring a buoy".into(),
                    category: "Swimming".into(),
                    level: "Intermediate".into(),
                    public,
                },
            )
            .unwrap()
    }

    #[test]
    fn test_join_public_club_is_active() {
        let engine = engine();
        let owner = seed_user(&engine, "owner@example.com", "Owner");
        let user = seed_user(&engine, "user@example.com", "User");
        let club = seed_club(&engine, &owner, true);

        let membership = engine.request_join(user.id, club.id).unwrap();
        assert_eq!(membership.status, MembershipStatus::Active);
        assert!(engine.is_active_member(Some(user.id), club.id).unwrap());
    }

    #[test]
    fn test_join_private_club_is_pending() {
        let engine = engine();
        let owner = seed_user(&engine, "owner@example.com", "Owner");
        let user = seed_user(&engine, "user@example.com", "User");
        let club = seed_club(&engine, &owner, false);

        let membership = engine.request_join(user.id, club.id).unwrap();
        assert_eq!(membership.status, MembershipStatus::Pending);
        assert!(!engine.is_active_member(Some(user.id), club.id).unwrap());
    }

    #[test]
    fn test_owner_cannot_join_own_club() {
        let engine = engine();
        let owner = seed_user(&engine, "owner@example.com", "Owner");
        let club = seed_club(&engine, &owner, true);

        assert!(!engine.can_join(owner.id, club.id).unwrap());
        assert!(matches!(
            engine.request_join(owner.id, club.id),
            Err(Error::Ineligible(_))
        ));
    }

    #[test]
    fn test_existing_row_blocks_rejoin_regardless_of_status() {
        let engine = engine();
        let owner = seed_user(&engine, "owner@example.com", "Owner");
        let user = seed_user(&engine, "user@example.com", "User");
        let club = seed_club(&engine, &owner, true);

        let membership = engine.request_join(user.id, club.id).unwrap();
        assert!(matches!(
            engine.request_join(user.id, club.id),
            Err(Error::Ineligible(_))
        ));

        // Even disabled members stay locked out until re-enabled
        engine
            .disable_membership(owner.id, club.id, membership.id)
            .unwrap();
        assert!(!engine.can_join(user.id, club.id).unwrap());
        assert!(matches!(
            engine.request_join(user.id, club.id),
            Err(Error::Ineligible(_))
        ));
    }

    #[test]
    fn test_approve_transitions_and_notifies() {
        let notifier = Arc::new(RecordingNotifier::new());

        struct Shared(Arc<RecordingNotifier>);
        impl Notifier for Shared {
            fn membership_approved(
                &self,
                notice: &MembershipApproved,
            ) -> std::result::Result<(), NotifyError> {
                self.0.membership_approved(notice)
            }
        }

        let engine = Engine::new(
            Database::open_in_memory().unwrap(),
            Box::new(Shared(notifier.clone())),
        );
        let owner = seed_user(&engine, "owner@example.com", "Owner");
        let user = seed_user(&engine, "user@example.com", "User");
        let club = seed_club(&engine, &owner, false);

        let membership = engine.request_join(user.id, club.id).unwrap();
        let approved = engine
            .approve_membership(owner.id, club.id, membership.id)
            .unwrap();

        assert_eq!(approved.status, MembershipStatus::Active);
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user_id, user.id);
        assert_eq!(sent[0].club_name, club.name);
    }

    #[test]
    fn test_failing_notifier_does_not_fail_approval() {
        struct Exploding;
        impl Notifier for Exploding {
            fn membership_approved(
                &self,
                _notice: &MembershipApproved,
            ) -> std::result::Result<(), NotifyError> {
                Err(NotifyError("smtp is down".into()))
            }
        }

        let engine = Engine::new(Database::open_in_memory().unwrap(), Box::new(Exploding));
        let owner = seed_user(&engine, "owner@example.com", "Owner");
        let user = seed_user(&engine, "user@example.com", "User");
        let club = seed_club(&engine, &owner, false);

        let membership = engine.request_join(user.id, club.id).unwrap();
        let approved = engine
            .approve_membership(owner.id, club.id, membership.id)
            .unwrap();
        assert_eq!(approved.status, MembershipStatus::Active);
    }

    #[test]
    fn test_approval_is_owner_only() {
        let engine = engine();
        let owner = seed_user(&engine, "owner@example.com", "Owner");
        let user = seed_user(&engine, "user@example.com", "User");
        let outsider = seed_user(&engine, "x@example.com", "X");
        let club = seed_club(&engine, &owner, false);

        let membership = engine.request_join(user.id, club.id).unwrap();
        assert!(matches!(
            engine.approve_membership(outsider.id, club.id, membership.id),
            Err(Error::PermissionDenied(_))
        ));
        assert!(matches!(
            engine.approve_membership(user.id, club.id, membership.id),
            Err(Error::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_enable_disable_idempotent() {
        let engine = engine();
        let owner = seed_user(&engine, "owner@example.com", "Owner");
        let user = seed_user(&engine, "user@example.com", "User");
        let club = seed_club(&engine, &owner, true);

        let membership = engine.request_join(user.id, club.id).unwrap();

        // Enabling an already active membership succeeds without change
        let m = engine
            .enable_membership(owner.id, club.id, membership.id)
            .unwrap();
        assert_eq!(m.status, MembershipStatus::Active);
        let m = engine
            .enable_membership(owner.id, club.id, membership.id)
            .unwrap();
        assert_eq!(m.status, MembershipStatus::Active);

        // Same for double-disable
        let m = engine
            .disable_membership(owner.id, club.id, membership.id)
            .unwrap();
        assert_eq!(m.status, MembershipStatus::Disabled);
        let m = engine
            .disable_membership(owner.id, club.id, membership.id)
            .unwrap();
        assert_eq!(m.status, MembershipStatus::Disabled);
    }

    #[test]
    fn test_leave_deletes_row_and_rejoin_starts_fresh() {
        let engine = engine();
        let owner = seed_user(&engine, "owner@example.com", "Owner");
        let user = seed_user(&engine, "user@example.com", "User");
        let club = seed_club(&engine, &owner, false);

        let first = engine.request_join(user.id, club.id).unwrap();
        engine
            .approve_membership(owner.id, club.id, first.id)
            .unwrap();

        engine.leave_club(user.id, club.id).unwrap();
        assert!(matches!(
            engine.leave_club(user.id, club.id),
            Err(Error::Ineligible(_))
        ));

        // Rejoining creates a new row, back at pending for a private club
        let second = engine.request_join(user.id, club.id).unwrap();
        assert_ne!(second.id, first.id);
        assert_eq!(second.status, MembershipStatus::Pending);
    }

    #[test]
    fn test_remove_member_is_owner_only_and_unconditional() {
        let engine = engine();
        let owner = seed_user(&engine, "owner@example.com", "Owner");
        let user = seed_user(&engine, "user@example.com", "User");
        let club = seed_club(&engine, &owner, true);

        let membership = engine.request_join(user.id, club.id).unwrap();

        assert!(matches!(
            engine.remove_member(user.id, club.id, membership.id),
            Err(Error::PermissionDenied(_))
        ));

        engine
            .remove_member(owner.id, club.id, membership.id)
            .unwrap();
        assert!(engine
            .database()
            .memberships()
            .find(user.id, club.id)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_members_listing_is_owner_only() {
        let engine = engine();
        let owner = seed_user(&engine, "owner@example.com", "Owner");
        let ada = seed_user(&engine, "ada@example.com", "Ada");
        let bob = seed_user(&engine, "bob@example.com", "Bob");
        let club = seed_club(&engine, &owner, true);

        engine.request_join(ada.id, club.id).unwrap();
        engine.request_join(bob.id, club.id).unwrap();

        assert!(matches!(
            engine.members(ada.id, club.id),
            Err(Error::PermissionDenied(_))
        ));

        let members = engine.members(owner.id, club.id).unwrap();
        assert_eq!(members.len(), 2);
        assert!(members.iter().all(|m| m.status == MembershipStatus::Active));
    }
}
