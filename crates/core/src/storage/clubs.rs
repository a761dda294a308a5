//! Club storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::{Club, ClubFilter};

pub struct ClubStore<'a> {
    conn: &'a Connection,
}

const CLUB_COLUMNS: &str =
    "id, name, description, rules, category, level, owner_id, public, active, created_at";

fn club_from_row(row: &Row<'_>) -> std::result::Result<Club, rusqlite::Error> {
    Ok(Club {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        name: row.get(1)?,
        description: row.get(2)?,
        rules: row.get(3)?,
        category: row.get(4)?,
        level: row.get(5)?,
        owner_id: parse_uuid(&row.get::<_, String>(6)?)?,
        public: row.get::<_, i32>(7)? != 0,
        active: row.get::<_, i32>(8)? != 0,
        created_at: parse_datetime(&row.get::<_, String>(9)?)?,
    })
}

impl<'a> ClubStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new club
    #[instrument(skip(self, club), fields(club_name = %club.name))]
    pub fn create(&self, club: &Club) -> Result<()> {
        self.conn.execute(
            "INSERT INTO clubs (id, name, description, rules, category, level, owner_id, public, active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                club.id.to_string(),
                club.name,
                club.description,
                club.rules,
                club.category,
                club.level,
                club.owner_id.to_string(),
                club.public as i32,
                club.active as i32,
                club.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find club by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Club>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {CLUB_COLUMNS} FROM clubs WHERE id = ?1"))?;

        let club = stmt
            .query_row(params![id.to_string()], club_from_row)
            .optional()?;

        Ok(club)
    }

    /// Update club attributes
    #[instrument(skip(self, club), fields(club_id = %club.id))]
    pub fn update(&self, club: &Club) -> Result<()> {
        self.conn.execute(
            "UPDATE clubs SET name = ?1, description = ?2, rules = ?3, category = ?4, level = ?5, public = ?6
             WHERE id = ?7",
            params![
                club.name,
                club.description,
                club.rules,
                club.category,
                club.level,
                club.public as i32,
                club.id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Flip the enabled/disabled flag
    #[instrument(skip(self))]
    pub fn set_active(&self, club_id: Uuid, active: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE clubs SET active = ?1 WHERE id = ?2",
            params![active as i32, club_id.to_string()],
        )?;
        Ok(())
    }

    /// Delete a club; memberships, events, and registrations cascade
    #[instrument(skip(self))]
    pub fn delete(&self, club_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM clubs WHERE id = ?1",
            params![club_id.to_string()],
        )?;
        Ok(())
    }

    /// List the clubs a user owns, hidden and disabled ones included
    #[instrument(skip(self))]
    pub fn list_owned(&self, owner_id: Uuid) -> Result<Vec<Club>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CLUB_COLUMNS} FROM clubs WHERE owner_id = ?1 ORDER BY name"
        ))?;

        let clubs = stmt
            .query_map(params![owner_id.to_string()], club_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(clubs)
    }

    /// Search the public catalog: enabled public clubs, filtered by
    /// case-insensitive name substring and exact category/level
    #[instrument(skip(self, filter))]
    pub fn search(&self, filter: &ClubFilter) -> Result<Vec<Club>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CLUB_COLUMNS} FROM clubs
             WHERE public = 1 AND active = 1
               AND (?1 IS NULL OR LOWER(name) LIKE '%' || ?1 || '%')
               AND (?2 IS NULL OR category = ?2)
               AND (?3 IS NULL OR level = ?3)
             ORDER BY name"
        ))?;

        let query = filter.query.as_ref().map(|q| q.to_lowercase());
        let clubs = stmt
            .query_map(
                params![query, filter.category, filter.level],
                club_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(clubs)
    }
}
