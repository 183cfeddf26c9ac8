//! SQLite TaskRepository implementation.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::utils::{current_timestamp, like_pattern, resolve_completion};
use crate::db::{DbError, DbResult, Id, Task, TaskFields, TaskRepository, TaskSearch};

const TASK_COLUMNS: &str =
    "id, title, description, priority, status, resp_id, project_id, creation_date, completion_date";

/// SQLx-backed task repository.
pub struct SqliteTaskRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl TaskRepository for SqliteTaskRepository<'_> {
    async fn list(&self) -> DbResult<Vec<Task>> {
        let rows = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id"))
            .fetch_all(self.pool)
            .await?;

        rows.iter().map(row_to_task).collect()
    }

    async fn get(&self, id: Id) -> DbResult<Task> {
        let row = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        let row = row.ok_or_else(|| DbError::not_found("Task", id))?;
        row_to_task(&row)
    }

    async fn create(&self, task: &TaskFields) -> DbResult<Id> {
        // Creation date is always server-generated
        let creation_date = current_timestamp();
        let completion_date = resolve_completion(task.completion_date, creation_date, creation_date)?;

        let id: Id = sqlx::query_scalar(
            r#"
            INSERT INTO tasks (title, description, priority, status, resp_id, project_id, creation_date, completion_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority.to_string())
        .bind(task.status.to_string())
        .bind(task.resp_id)
        .bind(task.project_id)
        .bind(creation_date)
        .bind(completion_date)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, id: Id, task: &TaskFields) -> DbResult<Task> {
        let mut tx = self.pool.begin().await?;

        let creation_date: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT creation_date FROM tasks WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let creation_date = creation_date.ok_or_else(|| DbError::not_found("Task", id))?;

        let completion_date =
            resolve_completion(task.completion_date, creation_date, current_timestamp())?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, priority = ?, status = ?, resp_id = ?, project_id = ?,
                completion_date = ?
            WHERE id = ?
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority.to_string())
        .bind(task.status.to_string())
        .bind(task.resp_id)
        .bind(task.project_id)
        .bind(completion_date)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        let updated = row_to_task(&row)?;
        tx.commit().await?;

        Ok(updated)
    }

    async fn delete(&self, id: Id) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Task", id));
        }

        Ok(())
    }

    async fn search(&self, query: &TaskSearch) -> DbResult<Vec<Task>> {
        let select = |condition: &str| {
            format!("SELECT {TASK_COLUMNS} FROM tasks WHERE {condition} ORDER BY id")
        };

        let rows = match query {
            TaskSearch::Title(title) => {
                sqlx::query(&select("title LIKE ? ESCAPE '\\'"))
                    .bind(like_pattern(title))
                    .fetch_all(self.pool)
                    .await?
            }
            TaskSearch::Status(status) => {
                sqlx::query(&select("status = ?"))
                    .bind(status.to_string())
                    .fetch_all(self.pool)
                    .await?
            }
            TaskSearch::Priority(priority) => {
                sqlx::query(&select("priority = ?"))
                    .bind(priority.to_string())
                    .fetch_all(self.pool)
                    .await?
            }
            TaskSearch::Assignee(user_id) => {
                sqlx::query(&select("resp_id = ?"))
                    .bind(*user_id)
                    .fetch_all(self.pool)
                    .await?
            }
            TaskSearch::Project(project_id) => {
                sqlx::query(&select("project_id = ?"))
                    .bind(*project_id)
                    .fetch_all(self.pool)
                    .await?
            }
        };

        rows.iter().map(row_to_task).collect()
    }
}

/// Convert a database row to a Task model.
fn row_to_task(row: &SqliteRow) -> DbResult<Task> {
    let priority: String = row.try_get("priority")?;
    let status: String = row.try_get("status")?;

    Ok(Task {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        priority: priority
            .parse()
            .map_err(|message| DbError::InvalidData { message })?,
        status: status
            .parse()
            .map_err(|message| DbError::InvalidData { message })?,
        resp_id: row.try_get("resp_id")?,
        project_id: row.try_get("project_id")?,
        creation_date: row.try_get("creation_date")?,
        completion_date: row.try_get("completion_date")?,
    })
}
