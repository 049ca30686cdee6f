/// Profile service
///
/// Profiles are created by the identity service at user creation; this
/// service only reads and wholesale-updates them. Authorization runs
/// before the lookup, so an employee probing another user's profile gets
/// Forbidden whether or not the profile exists.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crewbase_shared::auth::{
    middleware::AuthContext,
    policy::{authorize, Operation},
};
use crewbase_shared::models::profile::{Profile, UpdateProfile};
use crewbase_shared::store::Store;

use crate::error::{ApiError, ApiResult};

/// Profile reads and updates
pub struct ProfileService {
    store: Arc<dyn Store>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Fetches the profile of `user_id`
    pub async fn get_profile(&self, user_id: Uuid, caller: &AuthContext) -> ApiResult<Profile> {
        authorize(caller, Operation::ReadProfile { owner_id: user_id })?;

        self.store
            .profile_by_user(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Profile for user {} not found", user_id)))
    }

    /// Replaces the editable fields of the profile of `user_id`
    ///
    /// Fails with NotFound if no profile exists; profiles are never
    /// auto-created here.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        spec: UpdateProfile,
        caller: &AuthContext,
    ) -> ApiResult<Profile> {
        authorize(caller, Operation::UpdateProfile { owner_id: user_id })?;

        let existing = self
            .store
            .profile_by_user(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Profile for user {} not found", user_id)))?;

        let profile = Profile {
            id: existing.id,
            user_id,
            full_name: spec.full_name,
            bio: spec.bio,
            picture_url: spec.picture_url,
            updated_at: Utc::now(),
        };

        self.store.update_profile(&profile).await?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewbase_shared::models::user::Role;
    use crewbase_shared::store::memory::MemStore;

    fn spec(name: &str) -> UpdateProfile {
        UpdateProfile {
            full_name: name.to_string(),
            bio: "senior engineer".to_string(),
            picture_url: "https://example.com/p.png".to_string(),
        }
    }

    async fn service_with_profile(user_id: Uuid) -> ProfileService {
        let store = Arc::new(MemStore::new());
        store
            .add_profile(&Profile::placeholder_for(user_id, "jdoe"))
            .await
            .unwrap();
        ProfileService::new(store)
    }

    #[tokio::test]
    async fn test_employee_reads_own_profile_only() {
        let owner = Uuid::new_v4();
        let svc = service_with_profile(owner).await;

        let own = AuthContext {
            user_id: owner,
            role: Role::Employee,
        };
        assert_eq!(svc.get_profile(owner, &own).await.unwrap().user_id, owner);

        let other = AuthContext {
            user_id: Uuid::new_v4(),
            role: Role::Employee,
        };
        let err = svc.get_profile(owner, &other).await.unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_employee_update_of_foreign_profile_is_forbidden() {
        let owner = Uuid::new_v4();
        let svc = service_with_profile(owner).await;

        let other = AuthContext {
            user_id: Uuid::new_v4(),
            role: Role::Employee,
        };
        let err = svc
            .update_profile(owner, spec("x"), &other)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_admin_updates_any_profile_wholesale() {
        let owner = Uuid::new_v4();
        let svc = service_with_profile(owner).await;

        let admin = AuthContext {
            user_id: Uuid::new_v4(),
            role: Role::Administrator,
        };
        let updated = svc
            .update_profile(owner, spec("Jane Doe"), &admin)
            .await
            .unwrap();
        assert_eq!(updated.full_name, "Jane Doe");
        assert_eq!(updated.bio, "senior engineer");

        let fetched = svc.get_profile(owner, &admin).await.unwrap();
        assert_eq!(fetched.full_name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_missing_profile_is_not_found_not_created() {
        let svc = ProfileService::new(Arc::new(MemStore::new()));
        let admin = AuthContext {
            user_id: Uuid::new_v4(),
            role: Role::Administrator,
        };
        let ghost = Uuid::new_v4();

        let err = svc.get_profile(ghost, &admin).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = svc.update_profile(ghost, spec("x"), &admin).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
