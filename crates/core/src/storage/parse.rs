//! Database value parsing utilities
//!
//! Provides error-safe parsing of stored values.

use chrono::{DateTime, Utc};
use rusqlite::Error as SqlError;
use uuid::Uuid;

use crate::models::{MembershipRole, MembershipStatus, RegistrationStatus};

fn conversion_error(message: String) -> SqlError {
    SqlError::FromSqlConversionFailure(0, rusqlite::types::Type::Text, message.into())
}

/// Parse a UUID from a database string column
pub fn parse_uuid(s: &str) -> Result<Uuid, SqlError> {
    Uuid::parse_str(s).map_err(|e| {
        SqlError::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a DateTime from an RFC3339 string
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, SqlError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            SqlError::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Parse a membership status from its stored text form
pub fn membership_status_from_str(s: &str) -> Result<MembershipStatus, SqlError> {
    match s {
        "pending" => Ok(MembershipStatus::Pending),
        "active" => Ok(MembershipStatus::Active),
        "disabled" => Ok(MembershipStatus::Disabled),
        other => Err(conversion_error(format!(
            "unknown membership status: {other}"
        ))),
    }
}

/// Parse a membership role from its stored text form
pub fn membership_role_from_str(s: &str) -> Result<MembershipRole, SqlError> {
    match s {
        "member" => Ok(MembershipRole::Member),
        other => Err(conversion_error(format!("unknown membership role: {other}"))),
    }
}

/// Parse a registration status from its stored text form
pub fn registration_status_from_str(s: &str) -> Result<RegistrationStatus, SqlError> {
    match s {
        "confirmed" => Ok(RegistrationStatus::Confirmed),
        "waitlist" => Ok(RegistrationStatus::Waitlist),
        other => Err(conversion_error(format!(
            "unknown registration status: {other}"
        ))),
    }
}

/// Extension trait for converting rusqlite Results to Option
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, SqlError>;
}

impl<T> OptionalExt<T> for Result<T, SqlError> {
    fn optional(self) -> Result<Option<T>, SqlError> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(SqlError::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            membership_status_from_str("pending").unwrap(),
            MembershipStatus::Pending
        );
        assert_eq!(
            registration_status_from_str("waitlist").unwrap(),
            RegistrationStatus::Waitlist
        );
        assert!(membership_status_from_str("banned").is_err());
        assert!(registration_status_from_str("rejected").is_err());
    }
}
