/// Task service
///
/// Task visibility is membership-gated (via the owning project), task
/// mutation is assignee-gated, and deletion is administrator-only. The
/// membership facts come through the project service's store, fetched
/// fresh on every call.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crewbase_shared::auth::{
    middleware::AuthContext,
    policy::{authorize, Operation},
};
use crewbase_shared::models::task::{Task, TaskSpec};
use crewbase_shared::store::Store;

use crate::error::{ApiError, ApiResult};

/// Task CRUD scoped to projects and assignees
pub struct TaskService {
    store: Arc<dyn Store>,
}

impl TaskService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    fn not_found(id: Uuid) -> ApiError {
        ApiError::NotFound(format!("Task {} not found", id))
    }

    /// Fetches the member set of a project, or NotFound if it is absent
    async fn project_members(&self, project_id: Uuid) -> ApiResult<Vec<Uuid>> {
        if self.store.project(project_id).await?.is_none() {
            return Err(ApiError::NotFound(format!(
                "Project {} not found",
                project_id
            )));
        }
        Ok(self.store.member_ids(project_id).await?)
    }

    /// Lists the tasks of a project
    pub async fn list_by_project(
        &self,
        project_id: Uuid,
        caller: &AuthContext,
    ) -> ApiResult<Vec<Task>> {
        let member_ids = self.project_members(project_id).await?;
        authorize(
            caller,
            Operation::ListTasks {
                member_ids: &member_ids,
            },
        )?;

        Ok(self.store.tasks_by_project(project_id).await?)
    }

    /// Fetches a single task
    ///
    /// Employees see only tasks assigned to them.
    pub async fn get(&self, id: Uuid, caller: &AuthContext) -> ApiResult<Task> {
        let task = self.store.task(id).await?.ok_or_else(|| Self::not_found(id))?;

        authorize(
            caller,
            Operation::ReadTask {
                assignee_id: task.assigned_to_user_id,
            },
        )?;

        Ok(task)
    }

    /// Creates a task inside a project
    ///
    /// Employees must be members of the target project. The assignee id
    /// is taken verbatim from the spec and is not checked against the
    /// project's member set.
    pub async fn create(&self, spec: TaskSpec, caller: &AuthContext) -> ApiResult<Task> {
        let member_ids = self.project_members(spec.project_id).await?;
        authorize(
            caller,
            Operation::CreateTask {
                member_ids: &member_ids,
            },
        )?;

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            project_id: spec.project_id,
            assigned_to_user_id: spec.assigned_to_user_id,
            title: spec.title,
            description: spec.description,
            completed: spec.completed,
            created_at: now,
            updated_at: now,
        };

        self.store.add_task(&task).await?;
        info!(task_id = %task.id, project_id = %task.project_id, "task created");
        Ok(task)
    }

    /// Replaces a task wholesale
    ///
    /// Employees must be the *current* assignee; the rule is checked
    /// against the stored task, not the incoming spec, so an employee
    /// can hand a task over but not grab one.
    pub async fn update(&self, id: Uuid, spec: TaskSpec, caller: &AuthContext) -> ApiResult<Task> {
        let existing = self.store.task(id).await?.ok_or_else(|| Self::not_found(id))?;

        authorize(
            caller,
            Operation::UpdateTask {
                assignee_id: existing.assigned_to_user_id,
            },
        )?;

        let task = Task {
            id,
            project_id: spec.project_id,
            assigned_to_user_id: spec.assigned_to_user_id,
            title: spec.title,
            description: spec.description,
            completed: spec.completed,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        self.store.update_task(&task).await?;
        Ok(task)
    }

    /// Deletes a task (administrator only)
    pub async fn delete(&self, id: Uuid, caller: &AuthContext) -> ApiResult<()> {
        authorize(caller, Operation::DeleteTask)?;

        let removed = self.store.remove_task(id).await?;
        if !removed {
            return Err(Self::not_found(id));
        }

        info!(task_id = %id, "task deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewbase_shared::models::project::Project;
    use crewbase_shared::models::user::Role;
    use crewbase_shared::store::memory::MemStore;

    fn admin() -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            role: Role::Administrator,
        }
    }

    fn employee(user_id: Uuid) -> AuthContext {
        AuthContext {
            user_id,
            role: Role::Employee,
        }
    }

    async fn service_with_project(member_ids: &[Uuid]) -> (TaskService, Uuid) {
        let store = Arc::new(MemStore::new());
        let project = Project {
            id: Uuid::new_v4(),
            name: "p".to_string(),
            description: String::new(),
            start_date: Utc::now(),
            end_date: None,
            created_at: Utc::now(),
        };
        store.add_project(&project, member_ids).await.unwrap();
        (TaskService::new(store), project.id)
    }

    fn spec(project_id: Uuid, assignee: Uuid, title: &str) -> TaskSpec {
        TaskSpec {
            project_id,
            assigned_to_user_id: assignee,
            title: title.to_string(),
            description: String::new(),
            completed: false,
        }
    }

    #[tokio::test]
    async fn test_employee_needs_membership_to_list_and_create() {
        let member = Uuid::new_v4();
        let (svc, project_id) = service_with_project(&[member]).await;

        assert!(svc
            .list_by_project(project_id, &employee(member))
            .await
            .is_ok());
        assert!(svc
            .create(spec(project_id, member, "t"), &employee(member))
            .await
            .is_ok());

        let outsider = Uuid::new_v4();
        assert!(matches!(
            svc.list_by_project(project_id, &employee(outsider))
                .await
                .unwrap_err(),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            svc.create(spec(project_id, outsider, "t"), &employee(outsider))
                .await
                .unwrap_err(),
            ApiError::Forbidden(_)
        ));
    }

    #[tokio::test]
    async fn test_missing_project_is_not_found() {
        let (svc, _) = service_with_project(&[]).await;
        let ghost = Uuid::new_v4();

        assert!(matches!(
            svc.list_by_project(ghost, &admin()).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            svc.create(spec(ghost, Uuid::new_v4(), "t"), &admin())
                .await
                .unwrap_err(),
            ApiError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_assignee_may_be_a_non_member() {
        // The documented gap: the assignee is taken verbatim.
        let member = Uuid::new_v4();
        let outsider = Uuid::new_v4();
        let (svc, project_id) = service_with_project(&[member]).await;

        let task = svc
            .create(spec(project_id, outsider, "t"), &employee(member))
            .await
            .unwrap();
        assert_eq!(task.assigned_to_user_id, outsider);
    }

    #[tokio::test]
    async fn test_update_is_gated_on_current_assignee() {
        let (e1, e2) = (Uuid::new_v4(), Uuid::new_v4());
        let (svc, project_id) = service_with_project(&[e1, e2]).await;

        let task = svc
            .create(spec(project_id, e2, "t"), &admin())
            .await
            .unwrap();

        // e1 is a member of the task's project but not the assignee.
        let err = svc
            .update(task.id, spec(project_id, e1, "hijack"), &employee(e1))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        // The assignee can update, including handing the task over.
        let updated = svc
            .update(task.id, spec(project_id, e1, "done"), &employee(e2))
            .await
            .unwrap();
        assert_eq!(updated.assigned_to_user_id, e1);
        assert_eq!(updated.title, "done");

        // After the handover e2 no longer passes the assignee gate.
        let err = svc
            .update(task.id, spec(project_id, e2, "back"), &employee(e2))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_employee_reads_only_assigned_tasks() {
        let (e1, e2) = (Uuid::new_v4(), Uuid::new_v4());
        let (svc, project_id) = service_with_project(&[e1, e2]).await;
        let task = svc.create(spec(project_id, e2, "t"), &admin()).await.unwrap();

        assert!(svc.get(task.id, &employee(e2)).await.is_ok());
        assert!(matches!(
            svc.get(task.id, &employee(e1)).await.unwrap_err(),
            ApiError::Forbidden(_)
        ));
    }

    #[tokio::test]
    async fn test_delete_is_admin_only() {
        let assignee = Uuid::new_v4();
        let (svc, project_id) = service_with_project(&[assignee]).await;
        let task = svc
            .create(spec(project_id, assignee, "t"), &admin())
            .await
            .unwrap();

        let err = svc.delete(task.id, &employee(assignee)).await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        svc.delete(task.id, &admin()).await.unwrap();
        let err = svc.delete(task.id, &admin()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_missing_task_is_not_found() {
        let (svc, _) = service_with_project(&[]).await;
        let err = svc.get(Uuid::new_v4(), &admin()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
