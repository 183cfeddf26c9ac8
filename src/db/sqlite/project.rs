//! SQLite ProjectRepository implementation.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::utils::{current_timestamp, like_pattern};
use crate::db::{
    DbError, DbResult, Id, Project, ProjectFields, ProjectRepository, ProjectSearch,
};

const PROJECT_COLUMNS: &str = "id, title, description, started, completed, manager_id";

/// SQLx-backed project repository.
pub struct SqliteProjectRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    async fn list(&self) -> DbResult<Vec<Project>> {
        let rows = sqlx::query(&format!("SELECT {PROJECT_COLUMNS} FROM projects ORDER BY id"))
            .fetch_all(self.pool)
            .await?;

        rows.iter().map(row_to_project).collect()
    }

    async fn get(&self, id: Id) -> DbResult<Project> {
        let row = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let row = row.ok_or_else(|| DbError::not_found("Project", id))?;
        row_to_project(&row)
    }

    async fn create(&self, project: &ProjectFields) -> DbResult<Id> {
        // Start date is always server-generated
        let started = current_timestamp();

        let id: Id = sqlx::query_scalar(
            "INSERT INTO projects (title, description, started, completed, manager_id) VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&project.title)
        .bind(&project.description)
        .bind(started)
        .bind(project.completed)
        .bind(project.manager_id)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, id: Id, project: &ProjectFields) -> DbResult<Project> {
        let row = sqlx::query(&format!(
            "UPDATE projects SET title = ?, description = ?, completed = ?, manager_id = ? WHERE id = ? RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(&project.title)
        .bind(&project.description)
        .bind(project.completed)
        .bind(project.manager_id)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let row = row.ok_or_else(|| DbError::not_found("Project", id))?;
        row_to_project(&row)
    }

    async fn delete(&self, id: Id) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Project", id));
        }

        Ok(())
    }

    async fn search(&self, query: &ProjectSearch) -> DbResult<Vec<Project>> {
        let rows = match query {
            ProjectSearch::Title(title) => {
                sqlx::query(&format!(
                    "SELECT {PROJECT_COLUMNS} FROM projects WHERE title LIKE ? ESCAPE '\\' ORDER BY id"
                ))
                .bind(like_pattern(title))
                .fetch_all(self.pool)
                .await?
            }
            ProjectSearch::Manager(manager_id) => {
                sqlx::query(&format!(
                    "SELECT {PROJECT_COLUMNS} FROM projects WHERE manager_id = ? ORDER BY id"
                ))
                .bind(*manager_id)
                .fetch_all(self.pool)
                .await?
            }
        };

        rows.iter().map(row_to_project).collect()
    }
}

/// Convert a database row to a Project model.
fn row_to_project(row: &SqliteRow) -> DbResult<Project> {
    Ok(Project {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        started: row.try_get("started")?,
        completed: row.try_get("completed")?,
        manager_id: row.try_get("manager_id")?,
    })
}
