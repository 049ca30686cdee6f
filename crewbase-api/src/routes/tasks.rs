/// Task endpoints
///
/// # Endpoints
///
/// - `GET /v1/projects/:id/tasks` - Tasks of a project (members, or admin)
/// - `GET /v1/tasks/:id` - Fetch a task (assignee, or admin)
/// - `POST /v1/tasks` - Create a task (project members, or admin)
/// - `PUT /v1/tasks/:id` - Replace a task (current assignee, or admin)
/// - `DELETE /v1/tasks/:id` - Delete a task (administrators)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crewbase_shared::auth::middleware::AuthContext;
use crewbase_shared::models::task::{Task, TaskSpec};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Create/update task request; updates replace every field
#[derive(Debug, Deserialize, Validate)]
pub struct TaskRequest {
    /// Target project
    pub project_id: Uuid,

    /// Assignee; taken verbatim
    pub assigned_to_user_id: Uuid,

    /// Short title
    #[validate(length(min = 1, message = "Task title is required"))]
    pub title: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Completion flag
    #[serde(default)]
    pub completed: bool,
}

impl TaskRequest {
    fn into_spec(self) -> TaskSpec {
        TaskSpec {
            project_id: self.project_id,
            assigned_to_user_id: self.assigned_to_user_id,
            title: self.title,
            description: self.description,
            completed: self.completed,
        }
    }
}

/// Task shape returned by the API
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Task ID
    pub id: Uuid,

    /// Owning project
    pub project_id: Uuid,

    /// Assignee
    pub assigned_to_user_id: Uuid,

    /// Short title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Completion flag
    pub completed: bool,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            project_id: task.project_id,
            assigned_to_user_id: task.assigned_to_user_id,
            title: task.title,
            description: task.description,
            completed: task.completed,
        }
    }
}

/// `GET /v1/projects/:id/tasks`
pub async fn list_project_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let tasks = state.tasks.list_by_project(project_id, &auth).await?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// `GET /v1/tasks/:id`
///
/// # Errors
///
/// - `403 Forbidden`: employee who is not the assignee
/// - `404 Not Found`: task does not exist
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state.tasks.get(id, &auth).await?;
    Ok(Json(task.into()))
}

/// `POST /v1/tasks`
///
/// # Errors
///
/// - `403 Forbidden`: employee who is not a member of the target project
/// - `404 Not Found`: target project does not exist
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<TaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let task = state.tasks.create(req.into_spec(), &auth).await?;
    Ok((StatusCode::CREATED, Json(task.into())))
}

/// `PUT /v1/tasks/:id`
///
/// # Errors
///
/// - `403 Forbidden`: employee who is not the current assignee
/// - `404 Not Found`: task does not exist
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<TaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    let task = state.tasks.update(id, req.into_spec(), &auth).await?;
    Ok(Json(task.into()))
}

/// `DELETE /v1/tasks/:id`
///
/// # Errors
///
/// - `403 Forbidden`: caller is not an administrator
/// - `404 Not Found`: task does not exist
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.tasks.delete(id, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}
