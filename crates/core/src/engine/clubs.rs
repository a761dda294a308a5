//! Club registry operations

use tracing::info;
use uuid::Uuid;

use super::Engine;
use crate::error::{Error, Result};
use crate::invariants;
use crate::models::{Club, ClubAttrs, ClubFilter};
use crate::permissions::ClubAction;

impl Engine {
    /// Create a club owned by `owner_id`
    pub fn create_club(&self, owner_id: Uuid, attrs: ClubAttrs) -> Result<Club> {
        self.db
            .users()
            .find_by_id(owner_id)?
            .ok_or_else(|| Error::NotFound("user not found".into()))?;

        let club = Club::new(owner_id, attrs);
        club.validate()?;
        invariants::assert_club_invariants(&club);

        self.db.clubs().create(&club)?;
        info!(club_id = %club.id, owner_id = %owner_id, "club created");
        Ok(club)
    }

    /// Fetch a club on the public show path; invisible clubs are
    /// indistinguishable from missing ones
    pub fn club(&self, club_id: Uuid, viewer: Option<Uuid>) -> Result<Club> {
        self.visible_club(club_id, viewer)
    }

    /// Browse the public catalog with optional filters
    pub fn browse_clubs(&self, filter: &ClubFilter) -> Result<Vec<Club>> {
        self.db.clubs().search(filter)
    }

    /// The caller's own clubs, disabled and private ones included
    pub fn my_clubs(&self, owner_id: Uuid) -> Result<Vec<Club>> {
        self.db.clubs().list_owned(owner_id)
    }

    /// Update club attributes; owner only
    pub fn update_club(&self, actor_id: Uuid, club_id: Uuid, attrs: ClubAttrs) -> Result<Club> {
        let mut club = self.club_or_not_found(club_id)?;
        self.require_owner(&club, actor_id, ClubAction::ManageClub)?;

        club.name = attrs.name;
        club.description = attrs.description;
        club.rules = attrs.rules;
        club.category = attrs.category;
        club.level = attrs.level;
        club.public = attrs.public;
        club.validate()?;

        self.db.clubs().update(&club)?;
        Ok(club)
    }

    /// Re-enable a disabled club; owner only
    pub fn enable_club(&self, actor_id: Uuid, club_id: Uuid) -> Result<Club> {
        self.set_club_active(actor_id, club_id, true)
    }

    /// Disable a club; owner only. Memberships, events, and existing
    /// registrations are left untouched.
    pub fn disable_club(&self, actor_id: Uuid, club_id: Uuid) -> Result<Club> {
        self.set_club_active(actor_id, club_id, false)
    }

    fn set_club_active(&self, actor_id: Uuid, club_id: Uuid, active: bool) -> Result<Club> {
        let mut club = self.club_or_not_found(club_id)?;
        self.require_owner(&club, actor_id, ClubAction::ManageClub)?;

        self.db.clubs().set_active(club.id, active)?;
        club.active = active;
        info!(club_id = %club.id, active, "club active flag changed");
        Ok(club)
    }

    /// Delete a club; owner only. Memberships, events, and registrations
    /// go with it.
    pub fn delete_club(&self, actor_id: Uuid, club_id: Uuid) -> Result<()> {
        let club = self.club_or_not_found(club_id)?;
        self.require_owner(&club, actor_id, ClubAction::ManageClub)?;

        self.db.clubs().delete(club.id)?;
        info!(club_id = %club.id, "club deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn engine() -> Engine {
        Engine::open_in_memory().unwrap()
    }

    fn seed_user(engine: &Engine, email: &str, name: &str) -> User {
        let user = User::new(email.into(), name.into());
        engine.database().users().create(&user).unwrap();
        user
    }

    fn attrs(name: &str, public: bool) -> ClubAttrs {
        ClubAttrs {
            name: name.into(),
            description: "A friendly club".into(),
            rules: "Be on time".into(),
            category: "Running".into(),
            level: "Beginner".into(),
            public,
        }
    }

    #[test]
    fn test_create_club_sets_owner_and_active() {
        let engine = engine();
        let owner = seed_user(&engine, "owner@example.com", "Owner");

        let club = engine
            .create_club(owner.id, attrs("Urban Striders", true))
            .unwrap();
        assert_eq!(club.owner_id, owner.id);
        assert!(club.active);
    }

    #[test]
    fn test_create_club_requires_fields() {
        let engine = engine();
        let owner = seed_user(&engine, "owner@example.com", "Owner");

        let mut bad = attrs("", true);
        bad.category = "".into();
        assert!(matches!(
            engine.create_club(owner.id, bad),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_private_club_hidden_from_strangers() {
        let engine = engine();
        let owner = seed_user(&engine, "owner@example.com", "Owner");
        let stranger = seed_user(&engine, "s@example.com", "Stranger");
        let club = engine
            .create_club(owner.id, attrs("Hidden Gems", false))
            .unwrap();

        // Not found rather than forbidden: existence is not leaked
        assert!(matches!(
            engine.club(club.id, Some(stranger.id)),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(engine.club(club.id, None), Err(Error::NotFound(_))));

        // The owner still sees it
        assert!(engine.club(club.id, Some(owner.id)).is_ok());
    }

    #[test]
    fn test_disabled_club_hidden_even_from_owner() {
        let engine = engine();
        let owner = seed_user(&engine, "owner@example.com", "Owner");
        let club = engine
            .create_club(owner.id, attrs("Night Owls", true))
            .unwrap();

        engine.disable_club(owner.id, club.id).unwrap();

        // The public show path hides it from everyone, owner included;
        // the management listing still returns it
        assert!(matches!(
            engine.club(club.id, Some(owner.id)),
            Err(Error::NotFound(_))
        ));
        let mine = engine.my_clubs(owner.id).unwrap();
        assert_eq!(mine.len(), 1);
        assert!(mine[0].is_disabled());
    }

    #[test]
    fn test_enable_disable_is_owner_only() {
        let engine = engine();
        let owner = seed_user(&engine, "owner@example.com", "Owner");
        let other = seed_user(&engine, "other@example.com", "Other");
        let club = engine
            .create_club(owner.id, attrs("Gatekeepers", true))
            .unwrap();

        assert!(matches!(
            engine.disable_club(other.id, club.id),
            Err(Error::PermissionDenied(_))
        ));

        let club = engine.disable_club(owner.id, club.id).unwrap();
        assert!(club.is_disabled());
        let club = engine.enable_club(owner.id, club.id).unwrap();
        assert!(!club.is_disabled());
    }

    #[test]
    fn test_update_club_revalidates() {
        let engine = engine();
        let owner = seed_user(&engine, "owner@example.com", "Owner");
        let club = engine
            .create_club(owner.id, attrs("Renamers", true))
            .unwrap();

        let mut blank = attrs("Renamed", true);
        blank.rules = "   ".into();
        assert!(matches!(
            engine.update_club(owner.id, club.id, blank),
            Err(Error::Validation(_))
        ));

        let updated = engine
            .update_club(owner.id, club.id, attrs("Renamed", false))
            .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert!(!updated.public);
    }

    #[test]
    fn test_browse_clubs_filters() {
        let engine = engine();
        let owner = seed_user(&engine, "owner@example.com", "Owner");

        let mut running = attrs("Urban Striders", true);
        running.category = "Running".into();
        running.level = "Advanced".into();
        engine.create_club(owner.id, running).unwrap();

        let mut cycling = attrs("Valley Cyclists", true);
        cycling.category = "Cycling".into();
        engine.create_club(owner.id, cycling).unwrap();

        // Private and disabled clubs never show up in the catalog
        engine.create_club(owner.id, attrs("Secret Society", false)).unwrap();
        let disabled = engine.create_club(owner.id, attrs("Sleepers", true)).unwrap();
        engine.disable_club(owner.id, disabled.id).unwrap();

        let all = engine.browse_clubs(&ClubFilter::default()).unwrap();
        assert_eq!(all.len(), 2);

        let by_name = engine
            .browse_clubs(&ClubFilter {
                query: Some("STRIDERS".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Urban Striders");

        let by_category = engine
            .browse_clubs(&ClubFilter {
                category: Some("Cycling".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_category.len(), 1);

        let by_level = engine
            .browse_clubs(&ClubFilter {
                level: Some("Advanced".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_level.len(), 1);

        let no_match = engine
            .browse_clubs(&ClubFilter {
                query: Some("striders".into()),
                category: Some("Cycling".into()),
                ..Default::default()
            })
            .unwrap();
        assert!(no_match.is_empty());
    }

    #[test]
    fn test_delete_club_is_owner_only() {
        let engine = engine();
        let owner = seed_user(&engine, "owner@example.com", "Owner");
        let other = seed_user(&engine, "other@example.com", "Other");
        let club = engine
            .create_club(owner.id, attrs("Doomed", true))
            .unwrap();

        assert!(matches!(
            engine.delete_club(other.id, club.id),
            Err(Error::PermissionDenied(_))
        ));
        engine.delete_club(owner.id, club.id).unwrap();
        assert!(matches!(
            engine.club(club.id, Some(owner.id)),
            Err(Error::NotFound(_))
        ));
    }
}
