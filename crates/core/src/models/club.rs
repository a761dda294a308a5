//! Club model - the unit of membership and event scheduling

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// A sports club with a single owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Club {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub rules: String,
    pub category: String,
    pub level: String,
    pub owner_id: Uuid,
    /// Public clubs auto-approve join requests; private clubs queue them
    pub public: bool,
    /// Disabled clubs (`active = false`) are hidden from the public surface
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Attributes supplied when creating or updating a club
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClubAttrs {
    pub name: String,
    pub description: String,
    pub rules: String,
    pub category: String,
    pub level: String,
    pub public: bool,
}

impl Club {
    pub fn new(owner_id: Uuid, attrs: ClubAttrs) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: attrs.name,
            description: attrs.description,
            rules: attrs.rules,
            category: attrs.category,
            level: attrs.level,
            owner_id,
            public: attrs.public,
            active: true,
            created_at: Utc::now(),
        }
    }

    /// Required-field validation, applied on create and update
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("name", &self.name),
            ("description", &self.description),
            ("rules", &self.rules),
            ("category", &self.category),
            ("level", &self.level),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Validation(format!("{field} can't be blank")));
            }
        }
        Ok(())
    }

    /// Identity comparison by id; `None` (anonymous) is never the owner
    pub fn is_owner(&self, user_id: Option<Uuid>) -> bool {
        user_id == Some(self.owner_id)
    }

    pub fn is_disabled(&self) -> bool {
        !self.active
    }

    /// Public show-path visibility: never disabled, and either public or
    /// viewed by the owner. Disabled clubs are hidden even from the owner
    /// here; owner management goes through a separate path.
    pub fn visible_to(&self, user_id: Option<Uuid>) -> bool {
        self.active && (self.public || self.is_owner(user_id))
    }
}

/// Catalog search filter (name substring, exact category, exact level)
#[derive(Debug, Clone, Default)]
pub struct ClubFilter {
    pub query: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
}
