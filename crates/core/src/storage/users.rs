//! User storage operations

use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::is_unique_violation;
use super::parse::{parse_datetime, parse_uuid, OptionalExt};
use crate::error::{Error, Result};
use crate::models::User;

pub struct UserStore<'a> {
    conn: &'a Connection,
}

impl<'a> UserStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new user
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub fn create(&self, user: &User) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO users (id, email, display_name, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    user.id.to_string(),
                    user.email,
                    user.display_name,
                    user.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e, "users.email") {
                    Error::Validation("email has already been taken".into())
                } else {
                    e.into()
                }
            })?;
        Ok(())
    }

    /// Find user by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, display_name, created_at FROM users WHERE id = ?1",
        )?;

        let user = stmt
            .query_row(params![id.to_string()], |row| {
                Ok(User {
                    id: parse_uuid(&row.get::<_, String>(0)?)?,
                    email: row.get(1)?,
                    display_name: row.get(2)?,
                    created_at: parse_datetime(&row.get::<_, String>(3)?)?,
                })
            })
            .optional()?;

        Ok(user)
    }

    /// Find user by email
    #[instrument(skip(self))]
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, display_name, created_at FROM users WHERE email = ?1",
        )?;

        let user = stmt
            .query_row(params![email], |row| {
                Ok(User {
                    id: parse_uuid(&row.get::<_, String>(0)?)?,
                    email: row.get(1)?,
                    display_name: row.get(2)?,
                    created_at: parse_datetime(&row.get::<_, String>(3)?)?,
                })
            })
            .optional()?;

        Ok(user)
    }

    /// Delete a user; owned clubs and memberships cascade
    #[instrument(skip(self))]
    pub fn delete(&self, user_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM users WHERE id = ?1",
            params![user_id.to_string()],
        )?;
        Ok(())
    }
}
