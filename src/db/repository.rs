//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing business logic.
//!
//! Methods return `Send` futures so that generic axum handlers over
//! `D: Database` remain `Send` themselves.

use crate::db::{
    DbResult,
    models::{
        Id, Project, ProjectFields, ProjectSearch, Task, TaskFields, TaskSearch, User, UserFields,
        UserSearch,
    },
};

/// Repository for User operations.
pub trait UserRepository {
    /// Get all users ordered by ID.
    fn list(&self) -> impl Future<Output = DbResult<Vec<User>>> + Send;

    /// Get a user by ID.
    fn get(&self, id: Id) -> impl Future<Output = DbResult<User>> + Send;

    /// Create a user, stamping the registration date. Returns the new ID.
    fn create(&self, user: &UserFields) -> impl Future<Output = DbResult<Id>> + Send;

    /// Replace a user's writable fields. Returns the stored user.
    fn update(&self, id: Id, user: &UserFields) -> impl Future<Output = DbResult<User>> + Send;

    /// Delete a user by ID.
    fn delete(&self, id: Id) -> impl Future<Output = DbResult<()>> + Send;

    /// Find users matching a single criterion.
    fn search(&self, query: &UserSearch) -> impl Future<Output = DbResult<Vec<User>>> + Send;
}

/// Repository for Task operations.
pub trait TaskRepository {
    /// Get all tasks ordered by ID.
    fn list(&self) -> impl Future<Output = DbResult<Vec<Task>>> + Send;

    /// Get a task by ID.
    fn get(&self, id: Id) -> impl Future<Output = DbResult<Task>> + Send;

    /// Create a task, stamping the creation date and resolving the
    /// completion date. Fails with `Validation` if completion precedes
    /// creation. Returns the new ID.
    fn create(&self, task: &TaskFields) -> impl Future<Output = DbResult<Id>> + Send;

    /// Replace a task's writable fields. The completion date is checked
    /// against the stored creation date. Returns the stored task.
    fn update(&self, id: Id, task: &TaskFields) -> impl Future<Output = DbResult<Task>> + Send;

    /// Delete a task by ID.
    fn delete(&self, id: Id) -> impl Future<Output = DbResult<()>> + Send;

    /// Find tasks matching a single criterion.
    fn search(&self, query: &TaskSearch) -> impl Future<Output = DbResult<Vec<Task>>> + Send;
}

/// Repository for Project operations.
pub trait ProjectRepository {
    /// Get all projects ordered by ID.
    fn list(&self) -> impl Future<Output = DbResult<Vec<Project>>> + Send;

    /// Get a project by ID.
    fn get(&self, id: Id) -> impl Future<Output = DbResult<Project>> + Send;

    /// Create a project, stamping the start date. Returns the new ID.
    fn create(&self, project: &ProjectFields) -> impl Future<Output = DbResult<Id>> + Send;

    /// Replace a project's writable fields. Returns the stored project.
    fn update(
        &self,
        id: Id,
        project: &ProjectFields,
    ) -> impl Future<Output = DbResult<Project>> + Send;

    /// Delete a project by ID.
    fn delete(&self, id: Id) -> impl Future<Output = DbResult<()>> + Send;

    /// Find projects matching a single criterion.
    fn search(&self, query: &ProjectSearch)
    -> impl Future<Output = DbResult<Vec<Project>>> + Send;
}

/// Combined database interface.
///
/// Repositories are borrowed views over the backend's connection pool,
/// exposed through associated types to avoid dynamic dispatch.
pub trait Database: Send + Sync + 'static {
    type Users<'a>: UserRepository + Send + Sync
    where
        Self: 'a;
    type Tasks<'a>: TaskRepository + Send + Sync
    where
        Self: 'a;
    type Projects<'a>: ProjectRepository + Send + Sync
    where
        Self: 'a;

    /// Run pending migrations.
    fn migrate(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Get the user repository.
    fn users(&self) -> Self::Users<'_>;

    /// Get the task repository.
    fn tasks(&self) -> Self::Tasks<'_>;

    /// Get the project repository.
    fn projects(&self) -> Self::Projects<'_>;
}
