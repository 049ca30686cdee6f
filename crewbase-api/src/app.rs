/// Application state and router builder
///
/// This module defines the shared application state and provides a
/// function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use crewbase_api::{app::AppState, config::Config};
/// use crewbase_shared::store::memory::MemStore;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemStore::new()), config);
/// let app = crewbase_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crewbase_shared::auth::{jwt, middleware as auth_middleware, middleware::AuthContext};
use crewbase_shared::store::Store;

use crate::config::Config;
use crate::services::{
    identity::IdentityService, profiles::ProfileService, projects::ProjectService,
    tasks::TaskService,
};

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; the
/// services and the store are behind `Arc`, so cloning is cheap. Services
/// hold no cross-request state; the store is the only shared mutable
/// state in the system.
#[derive(Clone)]
pub struct AppState {
    /// Record store shared by all services
    pub store: Arc<dyn Store>,

    /// Application configuration
    pub config: Arc<Config>,

    /// Identity and user lifecycle
    pub identity: Arc<IdentityService>,

    /// Profile reads and updates
    pub profiles: Arc<ProfileService>,

    /// Project CRUD and membership
    pub projects: Arc<ProjectService>,

    /// Task CRUD
    pub tasks: Arc<TaskService>,
}

impl AppState {
    /// Creates application state over the given store
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        let config = Arc::new(config);
        Self {
            identity: Arc::new(IdentityService::new(store.clone(), config.jwt.clone())),
            profiles: Arc::new(ProfileService::new(store.clone())),
            projects: Arc::new(ProjectService::new(store.clone())),
            tasks: Arc::new(TaskService::new(store.clone())),
            store,
            config,
        }
    }

    /// Gets the secret used to sign and validate session tokens
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// └── /v1/                             # API v1 (versioned)
///     ├── /auth/login                  # Login (public)
///     ├── /users ...                   # User management
///     ├── /profiles/:user_id           # Profiles
///     ├── /projects ...                # Projects + membership
///     └── /tasks ...                   # Tasks
/// ```
///
/// Everything under `/v1` except `/v1/auth/login` sits behind the JWT
/// layer, which validates the bearer token and injects [`AuthContext`]
/// into request extensions.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Login (public, no auth required)
    let auth_routes = Router::new().route("/login", post(routes::auth::login));

    // Everything else requires a valid session token
    let protected_routes = Router::new()
        .route(
            "/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/users/:id",
            get(routes::users::get_user).delete(routes::users::delete_user),
        )
        .route("/users/:id/projects", get(routes::users::user_projects))
        .route(
            "/profiles/:user_id",
            get(routes::profiles::get_profile).put(routes::profiles::update_profile),
        )
        .route(
            "/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/projects/:id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/projects/:id/members/:user_id",
            get(routes::projects::check_member)
                .put(routes::projects::add_member)
                .delete(routes::projects::remove_member),
        )
        .route("/projects/:id/tasks", get(routes::tasks::list_project_tasks))
        .route("/tasks", post(routes::tasks::create_task))
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the bearer token from the Authorization header,
/// then injects [`AuthContext`] into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(auth_middleware::AuthError::MissingCredentials)?;

    let token = auth_middleware::bearer_token(auth_header)?;
    let claims = jwt::validate_token(token, state.jwt_secret())?;

    let auth_context = AuthContext::from_claims(&claims);
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
