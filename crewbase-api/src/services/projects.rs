/// Project service
///
/// Orchestrates project CRUD and the membership relation. Every returned
/// project carries its member-id set, fetched fresh from the store; the
/// set is both the response payload and the fact the policy decides on.
///
/// The deletion-integrity rule lives here: a project with any open task
/// cannot be deleted, and a rejected deletion mutates nothing.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crewbase_shared::auth::{
    middleware::AuthContext,
    policy::{authorize, Operation},
};
use crewbase_shared::models::project::{Project, ProjectSpec};
use crewbase_shared::store::Store;

use crate::error::{ApiError, ApiResult};

/// A project together with its current member set
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithMembers {
    #[serde(flatten)]
    pub project: Project,

    /// User ids of the project's members
    pub member_ids: Vec<Uuid>,
}

/// Project CRUD and membership mutation
pub struct ProjectService {
    store: Arc<dyn Store>,
}

impl ProjectService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn with_members(&self, project: Project) -> ApiResult<ProjectWithMembers> {
        let member_ids = self.store.member_ids(project.id).await?;
        Ok(ProjectWithMembers {
            project,
            member_ids,
        })
    }

    fn not_found(id: Uuid) -> ApiError {
        ApiError::NotFound(format!("Project {} not found", id))
    }

    /// Lists projects: all for administrators, member projects for employees
    pub async fn list(&self, caller: &AuthContext) -> ApiResult<Vec<ProjectWithMembers>> {
        authorize(caller, Operation::ListProjects)?;

        let projects = if caller.is_admin() {
            self.store.projects().await?
        } else {
            self.store.projects_for_user(caller.user_id).await?
        };

        let mut result = Vec::with_capacity(projects.len());
        for project in projects {
            result.push(self.with_members(project).await?);
        }
        Ok(result)
    }

    /// Fetches a single project
    ///
    /// Employee non-members get Forbidden, not NotFound: existence is not
    /// hidden in this model.
    pub async fn get(&self, id: Uuid, caller: &AuthContext) -> ApiResult<ProjectWithMembers> {
        let project = self.store.project(id).await?.ok_or_else(|| Self::not_found(id))?;
        let member_ids = self.store.member_ids(id).await?;

        authorize(
            caller,
            Operation::ReadProject {
                member_ids: &member_ids,
            },
        )?;

        Ok(ProjectWithMembers {
            project,
            member_ids,
        })
    }

    /// Creates a project with the given member set (administrator only)
    pub async fn create(
        &self,
        spec: ProjectSpec,
        caller: &AuthContext,
    ) -> ApiResult<ProjectWithMembers> {
        authorize(caller, Operation::CreateProject)?;

        let project = Project {
            id: Uuid::new_v4(),
            name: spec.name,
            description: spec.description,
            start_date: spec.start_date,
            end_date: spec.end_date,
            created_at: Utc::now(),
        };

        // Duplicate ids in the input collapse at the storage layer.
        self.store.add_project(&project, &spec.member_ids).await?;

        info!(project_id = %project.id, "project created");
        self.with_members(project).await
    }

    /// Replaces a project and its membership set (administrator only)
    ///
    /// Members absent from the spec are dropped; this is a wholesale
    /// replacement, not a merge.
    pub async fn update(
        &self,
        id: Uuid,
        spec: ProjectSpec,
        caller: &AuthContext,
    ) -> ApiResult<ProjectWithMembers> {
        authorize(caller, Operation::UpdateProject)?;

        let existing = self.store.project(id).await?.ok_or_else(|| Self::not_found(id))?;

        let project = Project {
            id,
            name: spec.name,
            description: spec.description,
            start_date: spec.start_date,
            end_date: spec.end_date,
            created_at: existing.created_at,
        };

        self.store.update_project(&project, &spec.member_ids).await?;
        self.with_members(project).await
    }

    /// Deletes a project (administrator only)
    ///
    /// Rejected with Conflict while any of the project's tasks is still
    /// open; a clean deletion removes the tasks and membership rows too.
    pub async fn delete(&self, id: Uuid, caller: &AuthContext) -> ApiResult<()> {
        authorize(caller, Operation::DeleteProject)?;

        if self.store.project(id).await?.is_none() {
            return Err(Self::not_found(id));
        }

        let tasks = self.store.tasks_by_project(id).await?;
        if tasks.iter().any(|t| !t.completed) {
            return Err(ApiError::Conflict(
                "Cannot delete project with unfinished tasks".to_string(),
            ));
        }

        self.store.remove_project(id).await?;
        info!(project_id = %id, "project deleted");
        Ok(())
    }

    /// Adds a user to a project (administrator only)
    ///
    /// Idempotent: adding a present pair reports success. The user id is
    /// not validated against the user table.
    pub async fn add_member(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        caller: &AuthContext,
    ) -> ApiResult<()> {
        authorize(caller, Operation::EditMembership)?;

        if self.store.project(project_id).await?.is_none() {
            return Err(Self::not_found(project_id));
        }

        self.store.add_member(project_id, user_id).await?;
        Ok(())
    }

    /// Removes a user from a project (administrator only)
    ///
    /// Fails with NotFound if the project does not exist or the pair is
    /// absent; an absent pair is not a silent success.
    pub async fn remove_member(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        caller: &AuthContext,
    ) -> ApiResult<()> {
        authorize(caller, Operation::EditMembership)?;

        if self.store.project(project_id).await?.is_none() {
            return Err(Self::not_found(project_id));
        }

        let removed = self.store.remove_member(project_id, user_id).await?;
        if !removed {
            return Err(ApiError::NotFound(format!(
                "User {} is not a member of project {}",
                user_id, project_id
            )));
        }
        Ok(())
    }

    /// Membership predicate exposed to administrators
    ///
    /// Returns false for an absent project rather than failing.
    pub async fn is_user_in_project(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        caller: &AuthContext,
    ) -> ApiResult<bool> {
        authorize(caller, Operation::QueryMembership)?;
        Ok(self.store.is_member(project_id, user_id).await?)
    }

    /// Lists the projects a user belongs to
    ///
    /// Employees may only query their own id; administrators any.
    pub async fn projects_for_user(
        &self,
        user_id: Uuid,
        caller: &AuthContext,
    ) -> ApiResult<Vec<ProjectWithMembers>> {
        authorize(caller, Operation::ReadUserProjects { owner_id: user_id })?;

        let projects = self.store.projects_for_user(user_id).await?;
        let mut result = Vec::with_capacity(projects.len());
        for project in projects {
            result.push(self.with_members(project).await?);
        }
        Ok(result)
    }
}
