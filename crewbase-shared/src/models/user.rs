/// User model and role enumeration
///
/// Users are created by administrators only; the paired profile is created
/// in the same operation. A user's role is fixed at creation time; there
/// is no role-change operation anywhere in the system.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('employee', 'administrator');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY,
///     username VARCHAR(255) NOT NULL UNIQUE,
///     email VARCHAR(255) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when parsing an unknown role string
///
/// Raised at the user-creation boundary; the rest of the system only ever
/// sees the closed [`Role`] enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct RoleParseError(pub String);

/// Account role, fixed at user creation
///
/// Exactly two roles exist; no other value is representable. Administrators
/// pass every authorization check, employees are gated by ownership and
/// project membership (see [`auth::policy`](crate::auth::policy)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular employee: sees own profile, member projects, assigned tasks
    Employee,

    /// Administrator: unrestricted access to every operation
    Administrator,
}

impl Role {
    /// Converts role to string for display and API responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Administrator => "administrator",
        }
    }

    /// Whether this role short-circuits authorization to allow
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Administrator)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    /// Case-insensitive parse; anything but the two known roles is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "employee" => Ok(Role::Employee),
            "administrator" => Ok(Role::Administrator),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

/// User account
///
/// Passwords are stored as Argon2id hashes, never in plaintext. The hash
/// never leaves the service layer; API responses carry the scrubbed shape.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Login name; assumed unique (enforced by the Postgres schema)
    pub username: String,

    /// Contact email address
    pub email: String,

    /// Argon2id password hash (PHC string format)
    pub password_hash: String,

    /// Account role, immutable after creation
    pub role: Role,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
///
/// The password arrives in plaintext from the request and is hashed by the
/// identity service; an absent or empty password is a validation error.
/// The role arrives as a string and is parsed into [`Role`] at this
/// boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Login name
    pub username: String,

    /// Contact email address
    pub email: String,

    /// Plaintext password; required
    pub password: Option<String>,

    /// Role string ("employee" or "administrator", case-insensitive)
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::Employee.as_str(), "employee");
        assert_eq!(Role::Administrator.as_str(), "administrator");
    }

    #[test]
    fn test_role_parse_case_insensitive() {
        assert_eq!("employee".parse::<Role>().unwrap(), Role::Employee);
        assert_eq!("Employee".parse::<Role>().unwrap(), Role::Employee);
        assert_eq!(
            "ADMINISTRATOR".parse::<Role>().unwrap(),
            Role::Administrator
        );
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        let err = "manager".parse::<Role>().unwrap_err();
        assert_eq!(err, RoleParseError("manager".to_string()));
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_is_admin() {
        assert!(Role::Administrator.is_admin());
        assert!(!Role::Employee.is_admin());
    }

    #[test]
    fn test_role_serde_lowercase() {
        let json = serde_json::to_string(&Role::Administrator).unwrap();
        assert_eq!(json, "\"administrator\"");
        let role: Role = serde_json::from_str("\"employee\"").unwrap();
        assert_eq!(role, Role::Employee);
    }
}
