/// Task model
///
/// Tasks cannot exist without their project and always carry an assignee.
/// The assignee is not required to be a member of the task's project; it
/// is the assignee relation, not membership, that grants an employee
/// update rights on the task.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY,
///     project_id UUID NOT NULL REFERENCES projects(id),
///     assigned_to_user_id UUID NOT NULL REFERENCES users(id),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Project the task belongs to (required)
    pub project_id: Uuid,

    /// User the task is delegated to (required)
    pub assigned_to_user_id: Uuid,

    /// Short title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Completion flag; open tasks block deletion of their project
    pub completed: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing a task
///
/// Updates are wholesale: every field, including project and assignee,
/// is taken from this spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Target project
    pub project_id: Uuid,

    /// Assignee; taken verbatim, not validated against project membership
    pub assigned_to_user_id: Uuid,

    /// Short title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Completion flag
    pub completed: bool,
}
