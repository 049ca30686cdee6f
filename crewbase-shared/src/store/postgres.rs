/// PostgreSQL store
///
/// Production implementation of [`Store`] over a sqlx connection pool.
/// Membership inserts rely on the composite primary key plus
/// `ON CONFLICT DO NOTHING`, so concurrent duplicate adds are resolved by
/// the database rather than application-level locking. Project update and
/// removal run in transactions because they touch multiple tables.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{
    membership::ProjectMember, profile::Profile, project::Project, task::Task, user::User,
};

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                // Constraint violations (foreign keys, unique indexes) are
                // integrity failures; everything else is a backend fault.
                if let Some(constraint) = db_err.constraint() {
                    StoreError::Integrity(format!("constraint violation: {}", constraint))
                } else {
                    StoreError::Backend(format!("database error: {}", db_err))
                }
            }
            _ => StoreError::Backend(format!("database error: {}", err)),
        }
    }
}

/// PostgreSQL implementation of [`Store`]
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn add_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn users(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, role, created_at, updated_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn remove_user(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Membership rows carry no FK to users, so they are cleaned
        // explicitly; the profile row cascades with the user.
        sqlx::query("DELETE FROM project_members WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn user_has_assigned_tasks(&self, user_id: Uuid) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM tasks WHERE assigned_to_user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn add_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, user_id, full_name, bio, picture_url, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(profile.id)
        .bind(profile.user_id)
        .bind(&profile.full_name)
        .bind(&profile.bio)
        .bind(&profile.picture_url)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, user_id, full_name, bio, picture_url, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn update_profile(&self, profile: &Profile) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET full_name = $2, bio = $3, picture_url = $4, updated_at = $5
            WHERE user_id = $1
            "#,
        )
        .bind(profile.user_id)
        .bind(&profile.full_name)
        .bind(&profile.bio)
        .bind(&profile.picture_url)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_project(&self, project: &Project, member_ids: &[Uuid]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO projects (id, name, description, start_date, end_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.created_at)
        .execute(&mut *tx)
        .await?;

        for user_id in member_ids {
            sqlx::query(
                r#"
                INSERT INTO project_members (project_id, user_id)
                VALUES ($1, $2)
                ON CONFLICT (project_id, user_id) DO NOTHING
                "#,
            )
            .bind(project.id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, start_date, end_date, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn projects(&self) -> Result<Vec<Project>, StoreError> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, start_date, end_date, created_at
            FROM projects
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn projects_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, StoreError> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT p.id, p.name, p.description, p.start_date, p.end_date, p.created_at
            FROM projects p
            INNER JOIN project_members m ON m.project_id = p.id
            WHERE m.user_id = $1
            ORDER BY p.created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn update_project(
        &self,
        project: &Project,
        member_ids: &[Uuid],
    ) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE projects
            SET name = $2, description = $3, start_date = $4, end_date = $5
            WHERE id = $1
            "#,
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.start_date)
        .bind(project.end_date)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        // Wholesale replacement of the member set.
        sqlx::query("DELETE FROM project_members WHERE project_id = $1")
            .bind(project.id)
            .execute(&mut *tx)
            .await?;

        for user_id in member_ids {
            sqlx::query(
                r#"
                INSERT INTO project_members (project_id, user_id)
                VALUES ($1, $2)
                ON CONFLICT (project_id, user_id) DO NOTHING
                "#,
            )
            .bind(project.id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn remove_project(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM project_members WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_member(&self, project_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO project_members (project_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (project_id, user_id) DO NOTHING
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let result =
            sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
                .bind(project_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn is_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM project_members
                WHERE project_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn member_ids(&self, project_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        let members = sqlx::query_as::<_, ProjectMember>(
            r#"
            SELECT project_id, user_id, created_at
            FROM project_members
            WHERE project_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members.into_iter().map(|m| m.user_id).collect())
    }

    async fn add_task(&self, task: &Task) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, project_id, assigned_to_user_id, title, description,
                               completed, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(task.id)
        .bind(task.project_id)
        .bind(task.assigned_to_user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, assigned_to_user_id, title, description,
                   completed, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn tasks_by_project(&self, project_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, assigned_to_user_id, title, description,
                   completed, created_at, updated_at
            FROM tasks
            WHERE project_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn update_task(&self, task: &Task) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET project_id = $2, assigned_to_user_id = $3, title = $4,
                description = $5, completed = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(task.id)
        .bind(task.project_id)
        .bind(task.assigned_to_user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_task(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
