/// Persistence abstraction for Crewbase
///
/// The [`Store`] trait owns the durable records for users, profiles,
/// projects, tasks, and the project membership relation. Services hold an
/// `Arc<dyn Store>` and never touch a backend directly.
///
/// Two implementations exist:
///
/// - [`postgres::PgStore`]: production backend over sqlx/Postgres
/// - [`memory::MemStore`]: in-memory backend for tests and dev mode
///
/// # Contract notes
///
/// - `add_member` is idempotent: adding a pair that already exists is a
///   no-op that still reports success. Uniqueness of pairs is guaranteed
///   by the backend (composite key / set semantics), not by callers.
/// - `remove_member` reports whether a pair was actually removed, so an
///   absent pair is distinguishable from a successful removal.
/// - `remove_project` also removes the project's tasks and membership
///   rows; the deletion-integrity decision (open tasks block deletion)
///   is made by the service *before* calling it.
/// - `remove_user` also removes the user's profile and membership rows;
///   it does not touch tasks. Deleting a user who is still the assignee
///   of any task is refused by the service (and by the task FK in
///   Postgres).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{profile::Profile, project::Project, task::Task, user::User};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A storage-level constraint rejected the write
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// The backend failed (connection, IO, poisoned lock, ...)
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Durable record store
///
/// All operations are request-scoped and synchronous units of work; the
/// store is the only shared mutable state in the system and must be safe
/// to use from concurrent requests.
#[async_trait]
pub trait Store: Send + Sync {
    // Users

    async fn add_user(&self, user: &User) -> Result<(), StoreError>;
    async fn user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn users(&self) -> Result<Vec<User>, StoreError>;
    /// Removes the user together with their profile and membership rows.
    async fn remove_user(&self, id: Uuid) -> Result<bool, StoreError>;
    /// Whether any task still references the user as assignee.
    async fn user_has_assigned_tasks(&self, user_id: Uuid) -> Result<bool, StoreError>;

    // Profiles

    async fn add_profile(&self, profile: &Profile) -> Result<(), StoreError>;
    async fn profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError>;
    async fn update_profile(&self, profile: &Profile) -> Result<bool, StoreError>;

    // Projects

    async fn add_project(&self, project: &Project, member_ids: &[Uuid]) -> Result<(), StoreError>;
    async fn project(&self, id: Uuid) -> Result<Option<Project>, StoreError>;
    async fn projects(&self) -> Result<Vec<Project>, StoreError>;
    async fn projects_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, StoreError>;
    /// Wholesale replacement: row fields and the full member set.
    async fn update_project(
        &self,
        project: &Project,
        member_ids: &[Uuid],
    ) -> Result<bool, StoreError>;
    /// Removes the project with its tasks and membership rows.
    async fn remove_project(&self, id: Uuid) -> Result<bool, StoreError>;

    // Membership

    async fn add_member(&self, project_id: Uuid, user_id: Uuid) -> Result<(), StoreError>;
    async fn remove_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;
    async fn is_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;
    async fn member_ids(&self, project_id: Uuid) -> Result<Vec<Uuid>, StoreError>;

    // Tasks

    async fn add_task(&self, task: &Task) -> Result<(), StoreError>;
    async fn task(&self, id: Uuid) -> Result<Option<Task>, StoreError>;
    async fn tasks_by_project(&self, project_id: Uuid) -> Result<Vec<Task>, StoreError>;
    async fn update_task(&self, task: &Task) -> Result<bool, StoreError>;
    async fn remove_task(&self, id: Uuid) -> Result<bool, StoreError>;
}
