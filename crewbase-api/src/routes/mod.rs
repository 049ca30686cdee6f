/// API route handlers
///
/// Handlers are thin: deserialize and validate the request, pull the
/// [`AuthContext`](crewbase_shared::auth::middleware::AuthContext) from
/// request extensions, and delegate to the matching service.
///
/// - `health`: Health check endpoint
/// - `auth`: Login endpoint
/// - `users`: User management
/// - `profiles`: Profile read/update
/// - `projects`: Project CRUD and membership
/// - `tasks`: Task CRUD

pub mod auth;
pub mod health;
pub mod profiles;
pub mod projects;
pub mod tasks;
pub mod users;
