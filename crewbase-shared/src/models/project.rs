/// Project model
///
/// A project owns zero or more tasks and carries a set of member users,
/// materialized as `(project_id, user_id)` rows (see
/// [`membership`](super::membership)). The membership set is the sole
/// source of truth for employee-level visibility of the project.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     start_date TIMESTAMPTZ NOT NULL,
///     end_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Project record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// When work on the project starts
    pub start_date: DateTime<Utc>,

    /// When the project ends, if scheduled
    pub end_date: Option<DateTime<Utc>>,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating or replacing a project
///
/// Updates are wholesale: name, description, dates, and the full member
/// set are taken from this spec. Members absent from `member_ids` are
/// dropped on update; duplicate ids collapse to a single membership row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSpec {
    /// Project name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Start of the project
    pub start_date: DateTime<Utc>,

    /// Optional scheduled end
    pub end_date: Option<DateTime<Utc>>,

    /// The complete member set for the project
    pub member_ids: Vec<Uuid>,
}
