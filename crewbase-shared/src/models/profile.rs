/// Profile model
///
/// One profile exists per user, created as a side effect of user creation
/// with placeholder defaults and deleted only when its user is deleted.
/// The profile-update operation replaces the editable fields wholesale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bio text a freshly created profile starts with.
pub const DEFAULT_BIO: &str = "New employee";

/// User profile, 1:1 with a user account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    /// Unique profile ID
    pub id: Uuid,

    /// Owning user (unique foreign key)
    pub user_id: Uuid,

    /// Display name; defaults to the username at creation
    pub full_name: String,

    /// Free-form bio text
    pub bio: String,

    /// Reference to a profile picture (URL; empty when unset)
    pub picture_url: String,

    /// When the profile was last updated
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Builds the placeholder profile created alongside a new user.
    pub fn placeholder_for(user_id: Uuid, username: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            full_name: username.to_string(),
            bio: DEFAULT_BIO.to_string(),
            picture_url: String::new(),
            updated_at: Utc::now(),
        }
    }
}

/// Input for updating a profile
///
/// All three fields are replaced wholesale; there is no partial update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfile {
    /// New display name
    pub full_name: String,

    /// New bio text
    pub bio: String,

    /// New picture reference
    pub picture_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_profile_defaults() {
        let user_id = Uuid::new_v4();
        let profile = Profile::placeholder_for(user_id, "jdoe");

        assert_eq!(profile.user_id, user_id);
        assert_eq!(profile.full_name, "jdoe");
        assert_eq!(profile.bio, DEFAULT_BIO);
        assert!(profile.picture_url.is_empty());
    }
}
