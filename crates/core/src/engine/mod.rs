//! Operation facade over the storage layer
//!
//! One handle owns the database connection and the notification sink, and
//! exposes the club, membership, event, and registration operations that
//! the surrounding application calls.

mod clubs;
mod events;
mod memberships;
mod registrations;

use std::path::Path;

use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::models::{Club, Event};
use crate::notify::{LogNotifier, Notifier, NullNotifier};
use crate::permissions::{Actor, ClubAction};
use crate::storage::Database;

/// The club membership and event capacity engine
pub struct Engine {
    db: Database,
    notifier: Box<dyn Notifier>,
}

impl Engine {
    /// Build an engine over an open database with a custom notifier
    pub fn new(db: Database, notifier: Box<dyn Notifier>) -> Self {
        Self { db, notifier }
    }

    /// Open (or create) the database described by `config`
    pub fn open(config: &EngineConfig) -> Result<Self> {
        let path = config.database_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::open(&path)?;
        let notifier: Box<dyn Notifier> = if config.notifications.enabled {
            Box::new(LogNotifier)
        } else {
            Box::new(NullNotifier)
        };
        Ok(Self::new(db, notifier))
    }

    /// Open using a config file on disk
    pub fn open_config_file(path: &Path) -> Result<Self> {
        let config = EngineConfig::load(path)?;
        Self::open(&config)
    }

    /// In-memory engine with the default notifier (tests, tooling)
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(
            Database::open_in_memory()?,
            Box::new(LogNotifier),
        ))
    }

    /// Direct access to the underlying database
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Club lookup for management paths
    fn club_or_not_found(&self, club_id: Uuid) -> Result<Club> {
        self.db
            .clubs()
            .find_by_id(club_id)?
            .ok_or_else(|| Error::NotFound("club not found".into()))
    }

    /// Club lookup for the public read surface. Clubs invisible to the
    /// viewer (private, or disabled) collapse to not-found so their
    /// existence is not leaked.
    fn visible_club(&self, club_id: Uuid, viewer: Option<Uuid>) -> Result<Club> {
        let club = self.club_or_not_found(club_id)?;
        if !club.visible_to(viewer) {
            return Err(Error::NotFound("club not found".into()));
        }
        Ok(club)
    }

    /// Owner gate for management operations
    fn require_owner(&self, club: &Club, actor_id: Uuid, action: ClubAction) -> Result<()> {
        let actor = self.actor_for(club, Some(actor_id))?;
        if !actor.can_perform(action) {
            return Err(Error::PermissionDenied(
                "only the club owner can perform this action".into(),
            ));
        }
        Ok(())
    }

    /// Classify a caller against a club
    fn actor_for(&self, club: &Club, user_id: Option<Uuid>) -> Result<Actor> {
        let membership = match user_id {
            Some(id) => self.db.memberships().status_of(id, club.id)?,
            None => None,
        };
        Ok(Actor::classify(club, user_id, membership))
    }

    /// Event lookup scoped to a club
    fn event_in_club(&self, club: &Club, event_id: Uuid) -> Result<Event> {
        self.db
            .events()
            .find_by_id(event_id)?
            .filter(|e| e.club_id == club.id)
            .ok_or_else(|| Error::NotFound("event not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_from_config_creates_database() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("data").join("rally.db");
        let config = EngineConfig::from_toml(&format!(
            "[database]\npath = \"{}\"\n\n[notifications]\nenabled = false\n",
            db_path.display()
        ))
        .unwrap();

        let engine = Engine::open(&config).unwrap();
        assert!(engine.database().schema_version() >= 2);
        assert!(db_path.exists());
    }

    #[test]
    fn test_open_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("rally.toml");
        assert!(matches!(
            Engine::open_config_file(&missing),
            Err(Error::Config(_))
        ));
    }
}
