/// Profile endpoints
///
/// # Endpoints
///
/// - `GET /v1/profiles/:user_id` - Fetch a profile (own, or admin)
/// - `PUT /v1/profiles/:user_id` - Replace a profile (own, or admin)

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crewbase_shared::auth::middleware::AuthContext;
use crewbase_shared::models::profile::{Profile, UpdateProfile};

use crate::{app::AppState, error::ApiResult};

/// Profile shape returned by the API
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// Owning user
    pub user_id: Uuid,

    /// Display name
    pub full_name: String,

    /// Bio text
    pub bio: String,

    /// Picture reference
    pub picture_url: String,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            user_id: profile.user_id,
            full_name: profile.full_name,
            bio: profile.bio,
            picture_url: profile.picture_url,
        }
    }
}

/// Profile update request; all fields are replaced wholesale
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name
    #[serde(default)]
    pub full_name: String,

    /// New bio text
    #[serde(default)]
    pub bio: String,

    /// New picture reference
    #[serde(default)]
    pub picture_url: String,
}

/// `GET /v1/profiles/:user_id`
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state.profiles.get_profile(user_id, &auth).await?;
    Ok(Json(profile.into()))
}

/// `PUT /v1/profiles/:user_id`
///
/// # Errors
///
/// - `403 Forbidden`: employee touching another user's profile
/// - `404 Not Found`: no profile exists for the user
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state
        .profiles
        .update_profile(
            user_id,
            UpdateProfile {
                full_name: req.full_name,
                bio: req.bio,
                picture_url: req.picture_url,
            },
            &auth,
        )
        .await?;

    Ok(Json(profile.into()))
}
