/// Authentication endpoint
///
/// # Endpoints
///
/// - `POST /v1/auth/login` - Authenticate and receive a session token

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login name
    #[serde(default)]
    pub username: String,

    /// Password
    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed session token
    pub token: String,
}

/// `POST /v1/auth/login`
///
/// # Errors
///
/// - `400 Bad Request`: username or password missing
/// - `401 Unauthorized`: unknown username or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let token = state.identity.login(&req.username, &req.password).await?;

    Ok(Json(LoginResponse { token }))
}
