/// Shared test harness for API integration tests
///
/// Builds the full router over the in-memory store and drives it through
/// `tower::Service`, so the tests exercise routing, the JWT layer, and
/// the services end-to-end without external infrastructure.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use tower::Service as _;
use uuid::Uuid;

use crewbase_api::app::{build_router, AppState};
use crewbase_api::config::{ApiConfig, Config, JwtConfig, StoreBackend, StoreConfig};
use crewbase_shared::auth::jwt::{self, Claims};
use crewbase_shared::models::profile::Profile;
use crewbase_shared::models::user::{Role, User};
use crewbase_shared::store::memory::MemStore;
use crewbase_shared::store::Store;

pub const JWT_SECRET: &str = "integration-test-secret-32-bytes!!";

pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemStore>,

    /// Seeded administrator account
    pub admin: User,
    pub admin_token: String,
}

impl TestContext {
    pub async fn new() -> Self {
        let store = Arc::new(MemStore::new());

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
                database_url: None,
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: JWT_SECRET.to_string(),
                token_ttl_minutes: 60,
            },
        };

        // Seed the administrator directly; admin tests mint their token
        // below instead of going through the login endpoint.
        let now = Utc::now();
        let admin = User {
            id: Uuid::new_v4(),
            username: "root".to_string(),
            email: "root@example.com".to_string(),
            password_hash: "seeded-out-of-band".to_string(),
            role: Role::Administrator,
            created_at: now,
            updated_at: now,
        };
        store.add_user(&admin).await.unwrap();
        store
            .add_profile(&Profile::placeholder_for(admin.id, &admin.username))
            .await
            .unwrap();

        let admin_token = mint_token(admin.id, &admin.username, Role::Administrator);

        let state = AppState::new(store.clone(), config);
        let app = build_router(state);

        Self {
            app,
            store,
            admin,
            admin_token,
        }
    }

    /// Sends a request and returns status plus parsed JSON body
    ///
    /// The body is `Value::Null` for empty responses (204 and friends).
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    /// Creates an employee through the API and mints a token for them
    ///
    /// Returns `(user_id, token)`.
    pub async fn create_employee(&self, username: &str, password: &str) -> (Uuid, String) {
        let (status, body) = self
            .send(
                "POST",
                "/v1/users",
                Some(&self.admin_token),
                Some(serde_json::json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": password,
                    "role": "employee",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "user creation failed: {body}");

        let user_id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
        let token = mint_token(user_id, username, Role::Employee);
        (user_id, token)
    }

    /// Creates a project through the API, returning its id
    pub async fn create_project(&self, name: &str, member_ids: &[Uuid]) -> Uuid {
        let (status, body) = self
            .send(
                "POST",
                "/v1/projects",
                Some(&self.admin_token),
                Some(serde_json::json!({
                    "name": name,
                    "description": "",
                    "start_date": Utc::now(),
                    "user_ids": member_ids,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "project creation failed: {body}");

        body["id"].as_str().unwrap().parse().unwrap()
    }

    /// Creates a task through the API, returning its id
    pub async fn create_task(&self, project_id: Uuid, assignee: Uuid, completed: bool) -> Uuid {
        let (status, body) = self
            .send(
                "POST",
                "/v1/tasks",
                Some(&self.admin_token),
                Some(serde_json::json!({
                    "project_id": project_id,
                    "assigned_to_user_id": assignee,
                    "title": "task",
                    "completed": completed,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "task creation failed: {body}");

        body["id"].as_str().unwrap().parse().unwrap()
    }
}

/// Mints a session token directly, bypassing the login endpoint
pub fn mint_token(user_id: Uuid, username: &str, role: Role) -> String {
    let claims = Claims::new(user_id, username, role, Duration::minutes(60));
    jwt::create_token(&claims, JWT_SECRET).unwrap()
}
