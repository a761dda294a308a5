//! Membership storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::is_unique_violation;
use super::parse::{
    membership_role_from_str, membership_status_from_str, parse_datetime, parse_uuid, OptionalExt,
};
use crate::error::{Error, Result};
use crate::models::{MemberEntry, Membership, MembershipStatus};

pub struct MembershipStore<'a> {
    conn: &'a Connection,
}

fn membership_from_row(row: &Row<'_>) -> std::result::Result<Membership, rusqlite::Error> {
    Ok(Membership {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        user_id: parse_uuid(&row.get::<_, String>(1)?)?,
        club_id: parse_uuid(&row.get::<_, String>(2)?)?,
        status: membership_status_from_str(&row.get::<_, String>(3)?)?,
        role: membership_role_from_str(&row.get::<_, String>(4)?)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?)?,
    })
}

impl<'a> MembershipStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a membership row
    ///
    /// The UNIQUE(user_id, club_id) index is the authority on duplicates;
    /// a violation surfaces as an eligibility error.
    #[instrument(skip(self, membership), fields(user_id = %membership.user_id, club_id = %membership.club_id, status = %membership.status))]
    pub fn create(&self, membership: &Membership) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO memberships (id, user_id, club_id, status, role, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    membership.id.to_string(),
                    membership.user_id.to_string(),
                    membership.club_id.to_string(),
                    membership.status.as_str(),
                    membership.role.as_str(),
                    membership.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e, "memberships.user_id") {
                    Error::Ineligible("is already a member of this club".into())
                } else {
                    e.into()
                }
            })?;
        Ok(())
    }

    /// Find membership by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Membership>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, club_id, status, role, created_at FROM memberships WHERE id = ?1",
        )?;

        let membership = stmt
            .query_row(params![id.to_string()], membership_from_row)
            .optional()?;

        Ok(membership)
    }

    /// Find the membership for a (user, club) pair
    #[instrument(skip(self))]
    pub fn find(&self, user_id: Uuid, club_id: Uuid) -> Result<Option<Membership>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, club_id, status, role, created_at FROM memberships
             WHERE user_id = ?1 AND club_id = ?2",
        )?;

        let membership = stmt
            .query_row(
                params![user_id.to_string(), club_id.to_string()],
                membership_from_row,
            )
            .optional()?;

        Ok(membership)
    }

    /// Get a user's membership status in a club
    #[instrument(skip(self))]
    pub fn status_of(&self, user_id: Uuid, club_id: Uuid) -> Result<Option<MembershipStatus>> {
        let membership = self.find(user_id, club_id)?;
        Ok(membership.map(|m| m.status))
    }

    /// Update membership status
    #[instrument(skip(self))]
    pub fn update_status(&self, membership_id: Uuid, status: MembershipStatus) -> Result<()> {
        self.conn.execute(
            "UPDATE memberships SET status = ?1 WHERE id = ?2",
            params![status.as_str(), membership_id.to_string()],
        )?;
        Ok(())
    }

    /// Remove a membership row
    #[instrument(skip(self))]
    pub fn remove(&self, membership_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM memberships WHERE id = ?1",
            params![membership_id.to_string()],
        )?;
        Ok(())
    }

    /// List members of a club with user identity, for the owner's
    /// management view
    #[instrument(skip(self))]
    pub fn list_for_club(&self, club_id: Uuid) -> Result<Vec<MemberEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT m.id, m.user_id, u.display_name, u.email, m.status, m.role
             FROM memberships m
             INNER JOIN users u ON u.id = m.user_id
             WHERE m.club_id = ?1
             ORDER BY m.status, u.display_name",
        )?;

        let members = stmt
            .query_map(params![club_id.to_string()], |row| {
                Ok(MemberEntry {
                    membership_id: parse_uuid(&row.get::<_, String>(0)?)?,
                    user_id: parse_uuid(&row.get::<_, String>(1)?)?,
                    display_name: row.get(2)?,
                    email: row.get(3)?,
                    status: membership_status_from_str(&row.get::<_, String>(4)?)?,
                    role: membership_role_from_str(&row.get::<_, String>(5)?)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(members)
    }
}
