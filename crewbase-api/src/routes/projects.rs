/// Project and membership endpoints
///
/// # Endpoints
///
/// - `GET /v1/projects` - List projects (membership-filtered for employees)
/// - `GET /v1/projects/:id` - Fetch a project (members, or admin)
/// - `POST /v1/projects` - Create a project (administrators)
/// - `PUT /v1/projects/:id` - Replace a project (administrators)
/// - `DELETE /v1/projects/:id` - Delete a project (administrators)
/// - `PUT /v1/projects/:id/members/:user_id` - Add a member (administrators)
/// - `DELETE /v1/projects/:id/members/:user_id` - Remove a member (administrators)
/// - `GET /v1/projects/:id/members/:user_id` - Membership predicate (administrators)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crewbase_shared::auth::middleware::AuthContext;
use crewbase_shared::models::project::ProjectSpec;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    services::projects::ProjectWithMembers,
};

/// Create/update project request
///
/// `user_ids` is the complete member set; on update, members absent from
/// it are dropped.
#[derive(Debug, Deserialize, Validate)]
pub struct ProjectRequest {
    /// Project name
    #[validate(length(min = 1, message = "Project name is required"))]
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Start of the project
    pub start_date: DateTime<Utc>,

    /// Optional scheduled end
    pub end_date: Option<DateTime<Utc>>,

    /// The complete member set
    #[serde(default)]
    pub user_ids: Vec<Uuid>,
}

impl ProjectRequest {
    fn into_spec(self) -> ProjectSpec {
        ProjectSpec {
            name: self.name,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            member_ids: self.user_ids,
        }
    }
}

/// Membership predicate response
#[derive(Debug, Serialize, Deserialize)]
pub struct MembershipResponse {
    /// Project side of the pair
    pub project_id: Uuid,

    /// User side of the pair
    pub user_id: Uuid,

    /// Whether the pair exists
    pub is_member: bool,
}

/// `GET /v1/projects`
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<ProjectWithMembers>>> {
    let projects = state.projects.list(&auth).await?;
    Ok(Json(projects))
}

/// `GET /v1/projects/:id`
///
/// # Errors
///
/// - `403 Forbidden`: employee who is not a member
/// - `404 Not Found`: project does not exist
pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectWithMembers>> {
    let project = state.projects.get(id, &auth).await?;
    Ok(Json(project))
}

/// `POST /v1/projects`
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<ProjectRequest>,
) -> ApiResult<(StatusCode, Json<ProjectWithMembers>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let project = state.projects.create(req.into_spec(), &auth).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// `PUT /v1/projects/:id`
pub async fn update_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<ProjectRequest>,
) -> ApiResult<Json<ProjectWithMembers>> {
    req.validate().map_err(ApiError::from_validation)?;

    let project = state.projects.update(id, req.into_spec(), &auth).await?;
    Ok(Json(project))
}

/// `DELETE /v1/projects/:id`
///
/// # Errors
///
/// - `404 Not Found`: project does not exist
/// - `409 Conflict`: project still has unfinished tasks
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.projects.delete(id, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /v1/projects/:id/members/:user_id`
///
/// Idempotent: adding a member twice reports success both times.
pub async fn add_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((project_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state.projects.add_member(project_id, user_id, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /v1/projects/:id/members/:user_id`
///
/// # Errors
///
/// - `404 Not Found`: project missing, or the pair does not exist
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((project_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state
        .projects
        .remove_member(project_id, user_id, &auth)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /v1/projects/:id/members/:user_id`
pub async fn check_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((project_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<MembershipResponse>> {
    let is_member = state
        .projects
        .is_user_in_project(project_id, user_id, &auth)
        .await?;

    Ok(Json(MembershipResponse {
        project_id,
        user_id,
        is_member,
    }))
}
