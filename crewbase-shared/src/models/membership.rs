/// Membership join row
///
/// A membership exists iff a user has been explicitly added to a project.
/// Pairs are unique; the composite primary key makes concurrent duplicate
/// adds collapse at the storage layer, and inserts go through
/// `ON CONFLICT DO NOTHING` so a duplicate add still reports success.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE project_members (
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (project_id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A (project, user) membership pair
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectMember {
    /// Project side of the pair
    pub project_id: Uuid,

    /// User side of the pair; not validated against the users table
    pub user_id: Uuid,

    /// When the user was added to the project
    pub created_at: DateTime<Utc>,
}
