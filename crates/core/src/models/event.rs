//! Event model and capacity arithmetic

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// A scheduled club event with bounded capacity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub club_id: Uuid,
    pub name: String,
    /// Free-form address or map URL
    pub location: String,
    pub location_name: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub max_participants: u32,
    /// When full, new registrations queue instead of being rejected
    pub has_waitlist: bool,
    pub created_at: DateTime<Utc>,
}

/// Attributes supplied when creating or updating an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventAttrs {
    pub name: String,
    pub location: String,
    pub location_name: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub max_participants: u32,
    pub has_waitlist: bool,
}

impl Event {
    pub fn new(club_id: Uuid, attrs: EventAttrs) -> Self {
        Self {
            id: Uuid::new_v4(),
            club_id,
            name: attrs.name,
            location: attrs.location,
            location_name: attrs.location_name,
            starts_at: attrs.starts_at,
            ends_at: attrs.ends_at,
            max_participants: attrs.max_participants,
            has_waitlist: attrs.has_waitlist,
            created_at: Utc::now(),
        }
    }

    /// Validation applied on every write. The future-start check is
    /// create-only; see [`Event::validate_for_create`].
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("name", &self.name),
            ("location", &self.location),
            ("location_name", &self.location_name),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Validation(format!("{field} can't be blank")));
            }
        }
        if self.ends_at <= self.starts_at {
            return Err(Error::Validation("ends_at must be after start date".into()));
        }
        if self.max_participants < 2 {
            return Err(Error::Validation(
                "max_participants must be greater than or equal to 2".into(),
            ));
        }
        Ok(())
    }

    /// Create-time validation: everything in [`Event::validate`] plus the
    /// future-start requirement. Updates may move `starts_at` into the past.
    pub fn validate_for_create(&self) -> Result<()> {
        self.validate()?;
        if self.starts_at <= Utc::now() {
            return Err(Error::Validation("starts_at must be in the future".into()));
        }
        Ok(())
    }

    pub fn is_upcoming(&self) -> bool {
        self.starts_at > Utc::now()
    }
}

/// Derived capacity figures for one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    pub max_participants: u32,
    pub confirmed: u32,
    pub waitlisted: u32,
}

impl Capacity {
    pub fn is_full(&self) -> bool {
        self.confirmed >= self.max_participants
    }

    pub fn available_spots(&self) -> u32 {
        self.max_participants.saturating_sub(self.confirmed)
    }
}
