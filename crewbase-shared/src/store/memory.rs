/// In-memory store
///
/// Backs tests and the `memory` dev backend. Not optimized for
/// performance; every operation takes the single table lock. Membership
/// pairs live in a set, which gives the same idempotent-add semantics the
/// Postgres composite key provides.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{profile::Profile, project::Project, task::Task, user::User};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    /// Keyed by user_id: profiles are 1:1 with users.
    profiles: HashMap<Uuid, Profile>,
    projects: HashMap<Uuid, Project>,
    tasks: HashMap<Uuid, Task>,
    /// Membership pairs (project_id, user_id).
    members: BTreeSet<(Uuid, Uuid)>,
}

/// In-memory implementation of [`Store`]
#[derive(Debug, Default)]
pub struct MemStore {
    tables: RwLock<Tables>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }
}

fn sorted_by_creation<T, F>(mut items: Vec<T>, created_at: F) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<chrono::Utc>,
{
    items.sort_by_key(|item| created_at(item));
    items
}

#[async_trait]
impl Store for MemStore {
    async fn add_user(&self, user: &User) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        // Linear scan; username uniqueness is assumed, not enforced here.
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn users(&self) -> Result<Vec<User>, StoreError> {
        let users: Vec<User> = self.read()?.users.values().cloned().collect();
        Ok(sorted_by_creation(users, |u| u.created_at))
    }

    async fn remove_user(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.profiles.remove(&id);
        tables.members.retain(|(_, user_id)| *user_id != id);
        Ok(true)
    }

    async fn user_has_assigned_tasks(&self, user_id: Uuid) -> Result<bool, StoreError> {
        Ok(self
            .read()?
            .tasks
            .values()
            .any(|t| t.assigned_to_user_id == user_id))
    }

    async fn add_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.profiles.insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self.read()?.profiles.get(&user_id).cloned())
    }

    async fn update_profile(&self, profile: &Profile) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        if !tables.profiles.contains_key(&profile.user_id) {
            return Ok(false);
        }
        tables.profiles.insert(profile.user_id, profile.clone());
        Ok(true)
    }

    async fn add_project(&self, project: &Project, member_ids: &[Uuid]) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.projects.insert(project.id, project.clone());
        for user_id in member_ids {
            tables.members.insert((project.id, *user_id));
        }
        Ok(())
    }

    async fn project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(self.read()?.projects.get(&id).cloned())
    }

    async fn projects(&self) -> Result<Vec<Project>, StoreError> {
        let projects: Vec<Project> = self.read()?.projects.values().cloned().collect();
        Ok(sorted_by_creation(projects, |p| p.created_at))
    }

    async fn projects_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, StoreError> {
        let tables = self.read()?;
        let projects: Vec<Project> = tables
            .projects
            .values()
            .filter(|p| tables.members.contains(&(p.id, user_id)))
            .cloned()
            .collect();
        Ok(sorted_by_creation(projects, |p| p.created_at))
    }

    async fn update_project(
        &self,
        project: &Project,
        member_ids: &[Uuid],
    ) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        if !tables.projects.contains_key(&project.id) {
            return Ok(false);
        }
        tables.projects.insert(project.id, project.clone());
        // Wholesale replacement of the member set.
        tables.members.retain(|(p, _)| *p != project.id);
        for user_id in member_ids {
            tables.members.insert((project.id, *user_id));
        }
        Ok(true)
    }

    async fn remove_project(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        if tables.projects.remove(&id).is_none() {
            return Ok(false);
        }
        tables.tasks.retain(|_, t| t.project_id != id);
        tables.members.retain(|(p, _)| *p != id);
        Ok(true)
    }

    async fn add_member(&self, project_id: Uuid, user_id: Uuid) -> Result<(), StoreError> {
        // Set insert: a present pair is a no-op, matching ON CONFLICT
        // DO NOTHING on the Postgres side.
        self.write()?.members.insert((project_id, user_id));
        Ok(())
    }

    async fn remove_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.write()?.members.remove(&(project_id, user_id)))
    }

    async fn is_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.read()?.members.contains(&(project_id, user_id)))
    }

    async fn member_ids(&self, project_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        Ok(self
            .read()?
            .members
            .iter()
            .filter(|(p, _)| *p == project_id)
            .map(|(_, u)| *u)
            .collect())
    }

    async fn add_task(&self, task: &Task) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    async fn tasks_by_project(&self, project_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let tasks: Vec<Task> = self
            .read()?
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        Ok(sorted_by_creation(tasks, |t| t.created_at))
    }

    async fn update_task(&self, task: &Task) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        if !tables.tasks.contains_key(&task.id) {
            return Ok(false);
        }
        tables.tasks.insert(task.id, task.clone());
        Ok(true)
    }

    async fn remove_task(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.write()?.tasks.remove(&id).is_some())
    }
}
