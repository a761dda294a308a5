//! Storage repository traits
//!
//! These traits define the storage interface, allowing for different
//! implementations (SQLite, mock, future network backend).

use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Club, ClubFilter, Event, EventRegistration, MemberEntry, Membership, MembershipStatus,
    ParticipantEntry, RegistrationStatus, User,
};

/// User repository operations
pub trait UserRepository {
    /// Create a new user
    fn create_user(&self, user: &User) -> Result<()>;

    /// Find user by ID
    fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Find user by email
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Delete a user; owned clubs and memberships cascade
    fn delete_user(&self, user_id: Uuid) -> Result<()>;
}

/// Club repository operations
pub trait ClubRepository {
    /// Create a new club
    fn create_club(&self, club: &Club) -> Result<()>;

    /// Find club by ID
    fn find_club_by_id(&self, id: Uuid) -> Result<Option<Club>>;

    /// Update a club
    fn update_club(&self, club: &Club) -> Result<()>;

    /// Flip the enabled/disabled flag
    fn set_club_active(&self, club_id: Uuid, active: bool) -> Result<()>;

    /// Delete a club and everything it owns
    fn delete_club(&self, club_id: Uuid) -> Result<()>;

    /// List clubs owned by a user
    fn list_owned_clubs(&self, owner_id: Uuid) -> Result<Vec<Club>>;

    /// Search the public catalog
    fn search_clubs(&self, filter: &ClubFilter) -> Result<Vec<Club>>;
}

/// Membership repository operations
pub trait MembershipRepository {
    /// Create a membership row
    fn create_membership(&self, membership: &Membership) -> Result<()>;

    /// Find membership by ID
    fn find_membership_by_id(&self, id: Uuid) -> Result<Option<Membership>>;

    /// Find the membership for a (user, club) pair
    fn find_membership(&self, user_id: Uuid, club_id: Uuid) -> Result<Option<Membership>>;

    /// Get a user's membership status in a club
    fn membership_status(&self, user_id: Uuid, club_id: Uuid)
        -> Result<Option<MembershipStatus>>;

    /// Update membership status
    fn update_membership_status(
        &self,
        membership_id: Uuid,
        status: MembershipStatus,
    ) -> Result<()>;

    /// Remove a membership row
    fn remove_membership(&self, membership_id: Uuid) -> Result<()>;

    /// List members of a club with user identity
    fn list_members(&self, club_id: Uuid) -> Result<Vec<MemberEntry>>;
}

/// Event repository operations
pub trait EventRepository {
    /// Create a new event
    fn create_event(&self, event: &Event) -> Result<()>;

    /// Find event by ID
    fn find_event_by_id(&self, id: Uuid) -> Result<Option<Event>>;

    /// Update an event
    fn update_event(&self, event: &Event) -> Result<()>;

    /// Delete an event; registrations cascade
    fn delete_event(&self, event_id: Uuid) -> Result<()>;

    /// Upcoming events for a club, soonest first
    fn upcoming_events(&self, club_id: Uuid) -> Result<Vec<Event>>;

    /// Past events for a club, most recent first
    fn past_events(&self, club_id: Uuid) -> Result<Vec<Event>>;
}

/// Registration repository operations
pub trait RegistrationRepository {
    /// Create a registration row
    fn create_registration(&self, registration: &EventRegistration) -> Result<()>;

    /// Find registration by ID
    fn find_registration_by_id(&self, id: Uuid) -> Result<Option<EventRegistration>>;

    /// Find the registration for a (user, event) pair
    fn find_registration(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<EventRegistration>>;

    /// Update registration status
    fn update_registration_status(
        &self,
        registration_id: Uuid,
        status: RegistrationStatus,
    ) -> Result<()>;

    /// Remove a registration row
    fn remove_registration(&self, registration_id: Uuid) -> Result<()>;

    /// Count registrations of one status for an event
    fn count_registrations(&self, event_id: Uuid, status: RegistrationStatus) -> Result<u32>;

    /// List registrants of one status with user identity
    fn list_participants(
        &self,
        event_id: Uuid,
        status: RegistrationStatus,
    ) -> Result<Vec<ParticipantEntry>>;
}

/// Combined storage interface
///
/// Provides access to all repository operations.
/// Implementations may be backed by SQLite, mocks, or network.
pub trait Storage:
    UserRepository + ClubRepository + MembershipRepository + EventRepository + RegistrationRepository
{
}

// Blanket implementation: any type implementing all traits implements Storage
impl<T> Storage for T where
    T: UserRepository
        + ClubRepository
        + MembershipRepository
        + EventRepository
        + RegistrationRepository
{
}
