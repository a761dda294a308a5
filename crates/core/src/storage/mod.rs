//! SQLite storage layer for Rally

mod clubs;
mod events;
mod memberships;
mod migrations;
mod parse;
mod registrations;
mod traits;
mod users;

use std::path::Path;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::instrument;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Club, ClubFilter, Event, EventRegistration, MemberEntry, Membership, MembershipStatus,
    ParticipantEntry, RegistrationStatus, User,
};

pub use clubs::ClubStore;
pub use events::EventStore;
pub use memberships::MembershipStore;
pub use registrations::RegistrationStore;
pub use traits::{
    ClubRepository, EventRepository, MembershipRepository, RegistrationRepository, Storage,
    UserRepository,
};
pub use users::UserStore;

/// True when a statement failed on a UNIQUE index covering `constraint`
/// (matched against the `table.column` list in the SQLite message)
pub(crate) fn is_unique_violation(err: &rusqlite::Error, constraint: &str) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, Some(msg)) => {
            e.code == rusqlite::ErrorCode::ConstraintViolation
                && msg.contains("UNIQUE")
                && msg.contains(constraint)
        }
        _ => false,
    }
}

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    /// Run a closure inside an immediate-mode transaction
    ///
    /// The write lock is taken up front, so reads and writes inside the
    /// closure form one atomic unit per database. Errors roll back.
    pub fn immediate<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let out = f(self)?;
        tx.commit()?;
        Ok(out)
    }

    /// Get user store
    pub fn users(&self) -> UserStore<'_> {
        UserStore::new(&self.conn)
    }

    /// Get club store
    pub fn clubs(&self) -> ClubStore<'_> {
        ClubStore::new(&self.conn)
    }

    /// Get membership store
    pub fn memberships(&self) -> MembershipStore<'_> {
        MembershipStore::new(&self.conn)
    }

    /// Get event store
    pub fn events(&self) -> EventStore<'_> {
        EventStore::new(&self.conn)
    }

    /// Get registration store
    pub fn registrations(&self) -> RegistrationStore<'_> {
        RegistrationStore::new(&self.conn)
    }
}

// Implement repository traits for Database
// This enables using Database through the trait interface

impl UserRepository for Database {
    fn create_user(&self, user: &User) -> Result<()> {
        self.users().create(user)
    }

    fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.users().find_by_id(id)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.users().find_by_email(email)
    }

    fn delete_user(&self, user_id: Uuid) -> Result<()> {
        self.users().delete(user_id)
    }
}

impl ClubRepository for Database {
    fn create_club(&self, club: &Club) -> Result<()> {
        self.clubs().create(club)
    }

    fn find_club_by_id(&self, id: Uuid) -> Result<Option<Club>> {
        self.clubs().find_by_id(id)
    }

    fn update_club(&self, club: &Club) -> Result<()> {
        self.clubs().update(club)
    }

    fn set_club_active(&self, club_id: Uuid, active: bool) -> Result<()> {
        self.clubs().set_active(club_id, active)
    }

    fn delete_club(&self, club_id: Uuid) -> Result<()> {
        self.clubs().delete(club_id)
    }

    fn list_owned_clubs(&self, owner_id: Uuid) -> Result<Vec<Club>> {
        self.clubs().list_owned(owner_id)
    }

    fn search_clubs(&self, filter: &ClubFilter) -> Result<Vec<Club>> {
        self.clubs().search(filter)
    }
}

impl MembershipRepository for Database {
    fn create_membership(&self, membership: &Membership) -> Result<()> {
        self.memberships().create(membership)
    }

    fn find_membership_by_id(&self, id: Uuid) -> Result<Option<Membership>> {
        self.memberships().find_by_id(id)
    }

    fn find_membership(&self, user_id: Uuid, club_id: Uuid) -> Result<Option<Membership>> {
        self.memberships().find(user_id, club_id)
    }

    fn membership_status(
        &self,
        user_id: Uuid,
        club_id: Uuid,
    ) -> Result<Option<MembershipStatus>> {
        self.memberships().status_of(user_id, club_id)
    }

    fn update_membership_status(
        &self,
        membership_id: Uuid,
        status: MembershipStatus,
    ) -> Result<()> {
        self.memberships().update_status(membership_id, status)
    }

    fn remove_membership(&self, membership_id: Uuid) -> Result<()> {
        self.memberships().remove(membership_id)
    }

    fn list_members(&self, club_id: Uuid) -> Result<Vec<MemberEntry>> {
        self.memberships().list_for_club(club_id)
    }
}

impl EventRepository for Database {
    fn create_event(&self, event: &Event) -> Result<()> {
        self.events().create(event)
    }

    fn find_event_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        self.events().find_by_id(id)
    }

    fn update_event(&self, event: &Event) -> Result<()> {
        self.events().update(event)
    }

    fn delete_event(&self, event_id: Uuid) -> Result<()> {
        self.events().delete(event_id)
    }

    fn upcoming_events(&self, club_id: Uuid) -> Result<Vec<Event>> {
        self.events().upcoming(club_id)
    }

    fn past_events(&self, club_id: Uuid) -> Result<Vec<Event>> {
        self.events().past(club_id)
    }
}

impl RegistrationRepository for Database {
    fn create_registration(&self, registration: &EventRegistration) -> Result<()> {
        self.registrations().create(registration)
    }

    fn find_registration_by_id(&self, id: Uuid) -> Result<Option<EventRegistration>> {
        self.registrations().find_by_id(id)
    }

    fn find_registration(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<EventRegistration>> {
        self.registrations().find(event_id, user_id)
    }

    fn update_registration_status(
        &self,
        registration_id: Uuid,
        status: RegistrationStatus,
    ) -> Result<()> {
        self.registrations().update_status(registration_id, status)
    }

    fn remove_registration(&self, registration_id: Uuid) -> Result<()> {
        self.registrations().remove(registration_id)
    }

    fn count_registrations(&self, event_id: Uuid, status: RegistrationStatus) -> Result<u32> {
        self.registrations().count_with_status(event_id, status)
    }

    fn list_participants(
        &self,
        event_id: Uuid,
        status: RegistrationStatus,
    ) -> Result<Vec<ParticipantEntry>> {
        self.registrations().participants(event_id, status)
    }
}
