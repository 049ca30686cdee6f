/// Authorization policy
///
/// A single pure decision function over the caller's claim pair and the
/// facts of the target resource. No IO, no panics, no business logic.
/// Services fetch the facts (fresh, on every call) and ask this module
/// before touching the store.
///
/// # Decision table
///
/// | Operation                      | Administrator | Employee                       |
/// |--------------------------------|---------------|--------------------------------|
/// | Read / update a profile        | allow         | only own                       |
/// | List projects                  | allow         | allow (results filtered)       |
/// | Read a project                 | allow         | only if member                 |
/// | Create/update/delete project   | allow         | deny                           |
/// | Edit / query membership        | allow         | deny                           |
/// | List a user's projects         | allow         | only own                       |
/// | List tasks of a project        | allow         | only if member                 |
/// | Create a task in a project     | allow         | only if member                 |
/// | Read / update a task           | allow         | only if assignee               |
/// | Delete a task                  | allow         | deny                           |
/// | Create / delete a user         | allow         | deny                           |
/// | Read users                     | allow         | allow                          |
///
/// An administrator short-circuits to allow for every operation. Employee
/// denials are distinguishable (`AdminOnly`, `NotOwner`, `NotMember`,
/// `NotAssignee`) but all map to the same Forbidden outcome at the
/// transport boundary.
///
/// # Example
///
/// ```
/// use crewbase_shared::auth::middleware::AuthContext;
/// use crewbase_shared::auth::policy::{authorize, Operation};
/// use crewbase_shared::models::user::Role;
/// use uuid::Uuid;
///
/// let caller = AuthContext { user_id: Uuid::new_v4(), role: Role::Employee };
/// let members = vec![caller.user_id];
///
/// assert!(authorize(&caller, Operation::ReadProject { member_ids: &members }).is_ok());
/// assert!(authorize(&caller, Operation::DeleteProject).is_err());
/// ```

use uuid::Uuid;

use super::middleware::AuthContext;

/// Denial reasons returned by [`authorize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// The operation is restricted to administrators
    #[error("operation requires administrator role")]
    AdminOnly,

    /// The caller does not own the target resource
    #[error("not authorized to access another user's resource")]
    NotOwner,

    /// The caller is not a member of the target project
    #[error("not a member of this project")]
    NotMember,

    /// The caller is not the assignee of the target task
    #[error("not the assignee of this task")]
    NotAssignee,
}

/// An operation to be authorized, carrying the resource facts it needs
///
/// Facts are passed by the caller and must reflect the current store
/// state; membership and assignment are re-checked on every call, never
/// cached across requests.
#[derive(Debug, Clone, Copy)]
pub enum Operation<'a> {
    /// Read the profile owned by `owner_id`
    ReadProfile { owner_id: Uuid },

    /// Update the profile owned by `owner_id`
    UpdateProfile { owner_id: Uuid },

    /// List projects (employee results are filtered by the service)
    ListProjects,

    /// Read a single project with the given member set
    ReadProject { member_ids: &'a [Uuid] },

    /// Create a project
    CreateProject,

    /// Update a project (name, description, dates, member set)
    UpdateProject,

    /// Delete a project
    DeleteProject,

    /// Add or remove a membership pair
    EditMembership,

    /// Query whether a user is a member of a project
    QueryMembership,

    /// List the projects of the user `owner_id`
    ReadUserProjects { owner_id: Uuid },

    /// List tasks of a project with the given member set
    ListTasks { member_ids: &'a [Uuid] },

    /// Create a task inside a project with the given member set
    CreateTask { member_ids: &'a [Uuid] },

    /// Read a task assigned to `assignee_id`
    ReadTask { assignee_id: Uuid },

    /// Update a task currently assigned to `assignee_id`
    UpdateTask { assignee_id: Uuid },

    /// Delete a task
    DeleteTask,

    /// Create a user account
    CreateUser,

    /// Delete a user account
    DeleteUser,

    /// Read the user list or a single user
    ReadUsers,
}

/// Decides whether `caller` may perform `op`
///
/// Pure function: the only inputs are the claim pair and the facts
/// embedded in the operation.
pub fn authorize(caller: &AuthContext, op: Operation<'_>) -> Result<(), PolicyError> {
    // Administrator short-circuit: every operation is allowed.
    if caller.role.is_admin() {
        return Ok(());
    }

    match op {
        Operation::ReadProfile { owner_id }
        | Operation::UpdateProfile { owner_id }
        | Operation::ReadUserProjects { owner_id } => {
            if caller.user_id == owner_id {
                Ok(())
            } else {
                Err(PolicyError::NotOwner)
            }
        }

        Operation::ListProjects | Operation::ReadUsers => Ok(()),

        Operation::ReadProject { member_ids }
        | Operation::ListTasks { member_ids }
        | Operation::CreateTask { member_ids } => {
            if member_ids.contains(&caller.user_id) {
                Ok(())
            } else {
                Err(PolicyError::NotMember)
            }
        }

        Operation::ReadTask { assignee_id } | Operation::UpdateTask { assignee_id } => {
            if caller.user_id == assignee_id {
                Ok(())
            } else {
                Err(PolicyError::NotAssignee)
            }
        }

        Operation::CreateProject
        | Operation::UpdateProject
        | Operation::DeleteProject
        | Operation::EditMembership
        | Operation::QueryMembership
        | Operation::DeleteTask
        | Operation::CreateUser
        | Operation::DeleteUser => Err(PolicyError::AdminOnly),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;

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

    #[test]
    fn test_admin_allows_everything() {
        let caller = admin();
        let other = Uuid::new_v4();
        let members: Vec<Uuid> = vec![];

        let ops = [
            Operation::ReadProfile { owner_id: other },
            Operation::UpdateProfile { owner_id: other },
            Operation::ListProjects,
            Operation::ReadProject {
                member_ids: &members,
            },
            Operation::CreateProject,
            Operation::UpdateProject,
            Operation::DeleteProject,
            Operation::EditMembership,
            Operation::QueryMembership,
            Operation::ReadUserProjects { owner_id: other },
            Operation::ListTasks {
                member_ids: &members,
            },
            Operation::CreateTask {
                member_ids: &members,
            },
            Operation::ReadTask { assignee_id: other },
            Operation::UpdateTask { assignee_id: other },
            Operation::DeleteTask,
            Operation::CreateUser,
            Operation::DeleteUser,
            Operation::ReadUsers,
        ];

        for op in ops {
            assert!(authorize(&caller, op).is_ok(), "admin denied {:?}", op);
        }
    }

    #[test]
    fn test_employee_profile_access_is_own_only() {
        let caller = employee();

        assert!(authorize(
            &caller,
            Operation::ReadProfile {
                owner_id: caller.user_id
            }
        )
        .is_ok());
        assert!(authorize(
            &caller,
            Operation::UpdateProfile {
                owner_id: caller.user_id
            }
        )
        .is_ok());

        let other = Uuid::new_v4();
        assert_eq!(
            authorize(&caller, Operation::ReadProfile { owner_id: other }),
            Err(PolicyError::NotOwner)
        );
        assert_eq!(
            authorize(&caller, Operation::UpdateProfile { owner_id: other }),
            Err(PolicyError::NotOwner)
        );
    }

    #[test]
    fn test_employee_project_access_requires_membership() {
        let caller = employee();
        let member_set = vec![Uuid::new_v4(), caller.user_id];
        let foreign_set = vec![Uuid::new_v4()];

        assert!(authorize(
            &caller,
            Operation::ReadProject {
                member_ids: &member_set
            }
        )
        .is_ok());
        assert_eq!(
            authorize(
                &caller,
                Operation::ReadProject {
                    member_ids: &foreign_set
                }
            ),
            Err(PolicyError::NotMember)
        );
    }

    #[test]
    fn test_employee_cannot_manage_projects_or_membership() {
        let caller = employee();

        for op in [
            Operation::CreateProject,
            Operation::UpdateProject,
            Operation::DeleteProject,
            Operation::EditMembership,
            Operation::QueryMembership,
        ] {
            assert_eq!(authorize(&caller, op), Err(PolicyError::AdminOnly));
        }
    }

    #[test]
    fn test_employee_task_visibility() {
        let caller = employee();
        let member_set = vec![caller.user_id];
        let foreign_set = vec![Uuid::new_v4()];

        assert!(authorize(
            &caller,
            Operation::ListTasks {
                member_ids: &member_set
            }
        )
        .is_ok());
        assert_eq!(
            authorize(
                &caller,
                Operation::ListTasks {
                    member_ids: &foreign_set
                }
            ),
            Err(PolicyError::NotMember)
        );
        assert!(authorize(
            &caller,
            Operation::CreateTask {
                member_ids: &member_set
            }
        )
        .is_ok());
        assert_eq!(
            authorize(
                &caller,
                Operation::CreateTask {
                    member_ids: &foreign_set
                }
            ),
            Err(PolicyError::NotMember)
        );
    }

    #[test]
    fn test_employee_task_mutation_is_assignee_gated() {
        let caller = employee();

        assert!(authorize(
            &caller,
            Operation::UpdateTask {
                assignee_id: caller.user_id
            }
        )
        .is_ok());

        // Membership does not matter here: a member who is not the
        // assignee is still denied.
        assert_eq!(
            authorize(
                &caller,
                Operation::UpdateTask {
                    assignee_id: Uuid::new_v4()
                }
            ),
            Err(PolicyError::NotAssignee)
        );
        assert_eq!(
            authorize(&caller, Operation::DeleteTask),
            Err(PolicyError::AdminOnly)
        );
    }

    #[test]
    fn test_employee_user_operations() {
        let caller = employee();

        // Reads are intentionally permissive.
        assert!(authorize(&caller, Operation::ReadUsers).is_ok());
        assert!(authorize(&caller, Operation::ListProjects).is_ok());

        assert_eq!(
            authorize(&caller, Operation::CreateUser),
            Err(PolicyError::AdminOnly)
        );
        assert_eq!(
            authorize(&caller, Operation::DeleteUser),
            Err(PolicyError::AdminOnly)
        );
    }

    #[test]
    fn test_employee_user_projects_own_only() {
        let caller = employee();

        assert!(authorize(
            &caller,
            Operation::ReadUserProjects {
                owner_id: caller.user_id
            }
        )
        .is_ok());
        assert_eq!(
            authorize(
                &caller,
                Operation::ReadUserProjects {
                    owner_id: Uuid::new_v4()
                }
            ),
            Err(PolicyError::NotOwner)
        );
    }
}
