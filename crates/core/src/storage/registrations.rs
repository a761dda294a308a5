//! Event registration storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::is_unique_violation;
use super::parse::{parse_datetime, parse_uuid, registration_status_from_str, OptionalExt};
use crate::error::{Error, Result};
use crate::models::{EventRegistration, ParticipantEntry, RegistrationStatus};

pub struct RegistrationStore<'a> {
    conn: &'a Connection,
}

fn registration_from_row(
    row: &Row<'_>,
) -> std::result::Result<EventRegistration, rusqlite::Error> {
    Ok(EventRegistration {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        event_id: parse_uuid(&row.get::<_, String>(1)?)?,
        user_id: parse_uuid(&row.get::<_, String>(2)?)?,
        status: registration_status_from_str(&row.get::<_, String>(3)?)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?)?,
    })
}

impl<'a> RegistrationStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a registration row
    ///
    /// The UNIQUE(user_id, event_id) index closes the duplicate
    /// check-then-insert race at the storage layer.
    #[instrument(skip(self, registration), fields(user_id = %registration.user_id, event_id = %registration.event_id, status = %registration.status))]
    pub fn create(&self, registration: &EventRegistration) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO event_registrations (id, event_id, user_id, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    registration.id.to_string(),
                    registration.event_id.to_string(),
                    registration.user_id.to_string(),
                    registration.status.as_str(),
                    registration.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e, "event_registrations.user_id") {
                    Error::DuplicateRegistration
                } else {
                    e.into()
                }
            })?;
        Ok(())
    }

    /// Find registration by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<EventRegistration>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event_id, user_id, status, created_at FROM event_registrations
             WHERE id = ?1",
        )?;

        let registration = stmt
            .query_row(params![id.to_string()], registration_from_row)
            .optional()?;

        Ok(registration)
    }

    /// Find the registration for a (user, event) pair
    #[instrument(skip(self))]
    pub fn find(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<EventRegistration>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event_id, user_id, status, created_at FROM event_registrations
             WHERE event_id = ?1 AND user_id = ?2",
        )?;

        let registration = stmt
            .query_row(
                params![event_id.to_string(), user_id.to_string()],
                registration_from_row,
            )
            .optional()?;

        Ok(registration)
    }

    /// Get a user's registration status for an event
    #[instrument(skip(self))]
    pub fn status_of(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<RegistrationStatus>> {
        let registration = self.find(event_id, user_id)?;
        Ok(registration.map(|r| r.status))
    }

    /// Update registration status
    #[instrument(skip(self))]
    pub fn update_status(&self, registration_id: Uuid, status: RegistrationStatus) -> Result<()> {
        self.conn.execute(
            "UPDATE event_registrations SET status = ?1 WHERE id = ?2",
            params![status.as_str(), registration_id.to_string()],
        )?;
        Ok(())
    }

    /// Remove a registration row
    #[instrument(skip(self))]
    pub fn remove(&self, registration_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM event_registrations WHERE id = ?1",
            params![registration_id.to_string()],
        )?;
        Ok(())
    }

    /// Count registrations of one status for an event
    #[instrument(skip(self))]
    pub fn count_with_status(&self, event_id: Uuid, status: RegistrationStatus) -> Result<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM event_registrations WHERE event_id = ?1 AND status = ?2",
            params![event_id.to_string(), status.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// List registrants of one status with user identity, earliest first
    #[instrument(skip(self))]
    pub fn participants(
        &self,
        event_id: Uuid,
        status: RegistrationStatus,
    ) -> Result<Vec<ParticipantEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT r.id, r.user_id, u.display_name, r.status, r.created_at
             FROM event_registrations r
             INNER JOIN users u ON u.id = r.user_id
             WHERE r.event_id = ?1 AND r.status = ?2
             ORDER BY r.created_at ASC",
        )?;

        let entries = stmt
            .query_map(params![event_id.to_string(), status.as_str()], |row| {
                Ok(ParticipantEntry {
                    registration_id: parse_uuid(&row.get::<_, String>(0)?)?,
                    user_id: parse_uuid(&row.get::<_, String>(1)?)?,
                    display_name: row.get(2)?,
                    status: registration_status_from_str(&row.get::<_, String>(3)?)?,
                    registered_at: parse_datetime(&row.get::<_, String>(4)?)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}
