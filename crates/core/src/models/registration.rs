//! Event registration model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registration states
///
/// There is no rejected or cancelled state: a rejected request never
/// creates a row, and cancellation deletes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    /// Counted against event capacity
    Confirmed,
    /// Queued behind capacity, pending owner promotion
    Waitlist,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Confirmed => "confirmed",
            RegistrationStatus::Waitlist => "waitlist",
        }
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user's registration for an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRegistration {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: RegistrationStatus,
    pub created_at: DateTime<Utc>,
}

impl EventRegistration {
    pub fn new(event_id: Uuid, user_id: Uuid, status: RegistrationStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            status,
            created_at: Utc::now(),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == RegistrationStatus::Confirmed
    }
}

/// A registrant with user identity for participant lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantEntry {
    pub registration_id: Uuid,
    pub user_id: Uuid,
    pub display_name: String,
    pub status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
}

/// Confirmed and waitlisted registrants for one event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRoster {
    pub confirmed: Vec<ParticipantEntry>,
    pub waitlisted: Vec<ParticipantEntry>,
}
