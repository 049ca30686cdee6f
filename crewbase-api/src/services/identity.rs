/// Identity service
///
/// Authenticates credentials against the store and issues session tokens;
/// owns user creation (with its paired placeholder profile) and deletion.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crewbase_shared::auth::{
    jwt::{self, Claims},
    middleware::AuthContext,
    password,
    policy::{authorize, Operation},
};
use crewbase_shared::models::{
    profile::Profile,
    user::{CreateUser, Role, User},
};
use crewbase_shared::store::Store;

use crate::config::JwtConfig;
use crate::error::{ApiError, ApiResult};

/// Authentication and user lifecycle
pub struct IdentityService {
    store: Arc<dyn Store>,
    jwt: JwtConfig,
}

impl IdentityService {
    pub fn new(store: Arc<dyn Store>, jwt: JwtConfig) -> Self {
        Self { store, jwt }
    }

    /// Authenticates a username/password pair and issues a session token
    ///
    /// An unknown username and a wrong password produce the same outcome:
    /// Unauthorized, with no hint which of the two failed.
    pub async fn login(&self, username: &str, password_input: &str) -> ApiResult<String> {
        let user = self
            .store
            .user_by_username(username)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

        let valid = password::verify_password(password_input, &user.password_hash)?;
        if !valid {
            return Err(ApiError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        let claims = Claims::new(
            user.id,
            &user.username,
            user.role,
            Duration::minutes(self.jwt.token_ttl_minutes),
        );
        let token = jwt::create_token(&claims, &self.jwt.secret)?;

        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }

    /// Creates a user and its placeholder profile (administrator only)
    ///
    /// The password is required and hashed before anything is persisted;
    /// the role string is parsed into the closed enum at this boundary.
    /// Returns the created user; callers must scrub the hash before
    /// serializing it outward.
    pub async fn create_user(&self, spec: CreateUser, caller: &AuthContext) -> ApiResult<User> {
        authorize(caller, Operation::CreateUser)?;

        let password_raw = spec
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::validation("password", "Password is required"))?;

        let role: Role = spec.role.parse()?;
        let password_hash = password::hash_password(password_raw)?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: spec.username,
            email: spec.email,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        };

        self.store.add_user(&user).await?;

        // The paired profile is created in the same operation; this is
        // the only place profiles come into existence.
        let profile = Profile::placeholder_for(user.id, &user.username);
        self.store.add_profile(&profile).await?;

        info!(user_id = %user.id, role = %user.role, "user created");
        Ok(user)
    }

    /// Deletes a user (administrator only)
    ///
    /// Membership rows go with the user; a user still referenced as the
    /// assignee of any task cannot be deleted and the call fails with
    /// Conflict before anything is written.
    pub async fn delete_user(&self, id: Uuid, caller: &AuthContext) -> ApiResult<()> {
        authorize(caller, Operation::DeleteUser)?;

        if self.store.user(id).await?.is_none() {
            return Err(ApiError::NotFound(format!("User {} not found", id)));
        }

        if self.store.user_has_assigned_tasks(id).await? {
            return Err(ApiError::Conflict(
                "User still has assigned tasks".to_string(),
            ));
        }

        self.store.remove_user(id).await?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    /// Fetches a single user by id (authenticated read, both roles)
    pub async fn get_user(&self, id: Uuid, caller: &AuthContext) -> ApiResult<User> {
        authorize(caller, Operation::ReadUsers)?;

        self.store
            .user(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("User {} not found", id)))
    }

    /// Lists all users (authenticated read, both roles)
    pub async fn list_users(&self, caller: &AuthContext) -> ApiResult<Vec<User>> {
        authorize(caller, Operation::ReadUsers)?;
        Ok(self.store.users().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewbase_shared::store::memory::MemStore;

    fn service() -> IdentityService {
        IdentityService::new(
            Arc::new(MemStore::new()),
            JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
                token_ttl_minutes: 60,
            },
        )
    }

    fn admin() -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            role: Role::Administrator,
        }
    }

    fn employee() -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            role: Role::Employee,
        }
    }

    fn user_spec(username: &str, password: Option<&str>, role: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: password.map(str::to_string),
            role: role.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_creates_profile_and_login_works() {
        let svc = service();

        let user = svc
            .create_user(user_spec("u", Some("pw123"), "employee"), &admin())
            .await
            .unwrap();

        // Placeholder profile exists with the default bio.
        let profile = svc.store.profile_by_user(user.id).await.unwrap().unwrap();
        assert_eq!(profile.bio, "New employee");
        assert_eq!(profile.full_name, "u");

        let token = svc.login("u", "pw123").await.unwrap();
        assert!(!token.is_empty());

        let err = svc.login("u", "wrong").await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let svc = service();
        let err = svc.login("ghost", "pw").await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_create_user_requires_password() {
        let svc = service();

        let err = svc
            .create_user(user_spec("u", None, "employee"), &admin())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));

        let err = svc
            .create_user(user_spec("u", Some(""), "employee"), &admin())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_create_user_rejects_unknown_role() {
        let svc = service();
        let err = svc
            .create_user(user_spec("u", Some("pw"), "manager"), &admin())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_create_user_is_admin_only() {
        let svc = service();
        let err = svc
            .create_user(user_spec("u", Some("pw"), "employee"), &employee())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_delete_user_refused_while_tasks_reference_it() {
        use chrono::Utc;
        use crewbase_shared::models::{project::Project, task::Task};

        let svc = service();
        let user = svc
            .create_user(user_spec("u", Some("pw123"), "employee"), &admin())
            .await
            .unwrap();

        let project = Project {
            id: Uuid::new_v4(),
            name: "p".to_string(),
            description: String::new(),
            start_date: Utc::now(),
            end_date: None,
            created_at: Utc::now(),
        };
        svc.store.add_project(&project, &[]).await.unwrap();
        svc.store
            .add_task(&Task {
                id: Uuid::new_v4(),
                project_id: project.id,
                assigned_to_user_id: user.id,
                title: "t".to_string(),
                description: String::new(),
                completed: false,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();

        let err = svc.delete_user(user.id, &admin()).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        // Still present, nothing was written.
        assert!(svc.store.user(user.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_user_cleans_up() {
        let svc = service();
        let user = svc
            .create_user(user_spec("u", Some("pw123"), "employee"), &admin())
            .await
            .unwrap();

        svc.delete_user(user.id, &admin()).await.unwrap();
        assert!(svc.store.user(user.id).await.unwrap().is_none());
        assert!(svc.store.profile_by_user(user.id).await.unwrap().is_none());

        let err = svc.delete_user(user.id, &admin()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
