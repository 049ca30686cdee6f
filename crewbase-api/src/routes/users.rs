/// User management endpoints
///
/// # Endpoints
///
/// - `GET /v1/users` - List users (any authenticated caller)
/// - `GET /v1/users/:id` - Fetch a user (any authenticated caller)
/// - `POST /v1/users` - Create a user (administrators)
/// - `DELETE /v1/users/:id` - Delete a user (administrators)
/// - `GET /v1/users/:id/projects` - Projects of a user (own, or admin)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crewbase_shared::auth::middleware::AuthContext;
use crewbase_shared::models::user::{CreateUser, User};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    services::projects::ProjectWithMembers,
};

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Login name
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Contact email
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Plaintext password; required (enforced by the identity service)
    pub password: Option<String>,

    /// Role string: "employee" or "administrator"
    pub role: String,
}

/// User shape returned by the API
///
/// The password hash never leaves the service layer.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID
    pub id: Uuid,

    /// Login name
    pub username: String,

    /// Contact email
    pub email: String,

    /// Account role
    pub role: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role.as_str().to_string(),
        }
    }
}

/// `GET /v1/users`
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.identity.list_users(&auth).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// `GET /v1/users/:id`
pub async fn get_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.identity.get_user(id, &auth).await?;
    Ok(Json(user.into()))
}

/// `POST /v1/users`
///
/// # Errors
///
/// - `403 Forbidden`: caller is not an administrator
/// - `422 Unprocessable Entity`: missing password or unknown role
pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let user = state
        .identity
        .create_user(
            CreateUser {
                username: req.username,
                email: req.email,
                password: req.password,
                role: req.role,
            },
            &auth,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// `DELETE /v1/users/:id`
///
/// # Errors
///
/// - `403 Forbidden`: caller is not an administrator
/// - `404 Not Found`: user does not exist
/// - `409 Conflict`: user is still the assignee of a task
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.identity.delete_user(id, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /v1/users/:id/projects`
///
/// Employees may only query their own projects; administrators any user's.
pub async fn user_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<ProjectWithMembers>>> {
    let projects = state.projects.projects_for_user(id, &auth).await?;
    Ok(Json(projects))
}
