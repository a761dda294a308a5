//! Event storage operations

use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::Event;

pub struct EventStore<'a> {
    conn: &'a Connection,
}

const EVENT_COLUMNS: &str = "id, club_id, name, location, location_name, starts_at, ends_at, \
                             max_participants, has_waitlist, created_at";

fn event_from_row(row: &Row<'_>) -> std::result::Result<Event, rusqlite::Error> {
    Ok(Event {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        club_id: parse_uuid(&row.get::<_, String>(1)?)?,
        name: row.get(2)?,
        location: row.get(3)?,
        location_name: row.get(4)?,
        starts_at: parse_datetime(&row.get::<_, String>(5)?)?,
        ends_at: parse_datetime(&row.get::<_, String>(6)?)?,
        max_participants: row.get(7)?,
        has_waitlist: row.get::<_, i32>(8)? != 0,
        created_at: parse_datetime(&row.get::<_, String>(9)?)?,
    })
}

impl<'a> EventStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new event
    #[instrument(skip(self, event), fields(event_name = %event.name, club_id = %event.club_id))]
    pub fn create(&self, event: &Event) -> Result<()> {
        self.conn.execute(
            "INSERT INTO events (id, club_id, name, location, location_name, starts_at, ends_at, max_participants, has_waitlist, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                event.id.to_string(),
                event.club_id.to_string(),
                event.name,
                event.location,
                event.location_name,
                event.starts_at.to_rfc3339(),
                event.ends_at.to_rfc3339(),
                event.max_participants,
                event.has_waitlist as i32,
                event.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find event by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"))?;

        let event = stmt
            .query_row(params![id.to_string()], event_from_row)
            .optional()?;

        Ok(event)
    }

    /// Update event attributes
    #[instrument(skip(self, event), fields(event_id = %event.id))]
    pub fn update(&self, event: &Event) -> Result<()> {
        self.conn.execute(
            "UPDATE events SET name = ?1, location = ?2, location_name = ?3, starts_at = ?4, ends_at = ?5, max_participants = ?6, has_waitlist = ?7
             WHERE id = ?8",
            params![
                event.name,
                event.location,
                event.location_name,
                event.starts_at.to_rfc3339(),
                event.ends_at.to_rfc3339(),
                event.max_participants,
                event.has_waitlist as i32,
                event.id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Delete an event; registrations cascade
    #[instrument(skip(self))]
    pub fn delete(&self, event_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM events WHERE id = ?1",
            params![event_id.to_string()],
        )?;
        Ok(())
    }

    /// Upcoming events for a club, soonest first
    #[instrument(skip(self))]
    pub fn upcoming(&self, club_id: Uuid) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM events
             WHERE club_id = ?1 AND starts_at > ?2
             ORDER BY starts_at ASC"
        ))?;

        let events = stmt
            .query_map(
                params![club_id.to_string(), Utc::now().to_rfc3339()],
                event_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(events)
    }

    /// Past events for a club, most recent first
    #[instrument(skip(self))]
    pub fn past(&self, club_id: Uuid) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM events
             WHERE club_id = ?1 AND starts_at <= ?2
             ORDER BY starts_at DESC"
        ))?;

        let events = stmt
            .query_map(
                params![club_id.to_string(), Utc::now().to_rfc3339()],
                event_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(events)
    }
}
