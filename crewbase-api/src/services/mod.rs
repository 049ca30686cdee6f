/// Orchestration services
///
/// Each service owns one slice of the model and follows the same shape:
/// take the caller's [`AuthContext`](crewbase_shared::auth::middleware::AuthContext)
/// explicitly, fetch the current resource facts, ask the authorization
/// policy, and only then touch the store. Authorization and validation
/// failures are raised before any mutation, so there are no partial writes.
///
/// # Services
///
/// - `identity`: login, user creation (with the paired profile), deletion
/// - `profiles`: profile read and wholesale update
/// - `projects`: project CRUD, the membership relation, deletion integrity
/// - `tasks`: project-scoped task CRUD with assignee-gated mutation

pub mod identity;
pub mod profiles;
pub mod projects;
pub mod tasks;
