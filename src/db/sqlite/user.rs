//! SQLite UserRepository implementation.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::utils::{current_timestamp, like_pattern};
use crate::db::{DbError, DbResult, Id, User, UserFields, UserRepository, UserSearch};

const USER_COLUMNS: &str = "id, name, email, registration_date, role";

/// SQLx-backed user repository.
pub struct SqliteUserRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl UserRepository for SqliteUserRepository<'_> {
    async fn list(&self) -> DbResult<Vec<User>> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
            .fetch_all(self.pool)
            .await?;

        rows.iter().map(row_to_user).collect()
    }

    async fn get(&self, id: Id) -> DbResult<User> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        let row = row.ok_or_else(|| DbError::not_found("User", id))?;
        row_to_user(&row)
    }

    async fn create(&self, user: &UserFields) -> DbResult<Id> {
        // Registration date is always server-generated
        let registration_date = current_timestamp();

        let id: Id = sqlx::query_scalar(
            "INSERT INTO users (name, email, registration_date, role) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(registration_date)
        .bind(&user.role)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, id: Id, user: &UserFields) -> DbResult<User> {
        let row = sqlx::query(&format!(
            "UPDATE users SET name = ?, email = ?, role = ? WHERE id = ? RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.role)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let row = row.ok_or_else(|| DbError::not_found("User", id))?;
        row_to_user(&row)
    }

    async fn delete(&self, id: Id) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    async fn search(&self, query: &UserSearch) -> DbResult<Vec<User>> {
        let (column, term) = match query {
            UserSearch::Name(name) => ("name", name),
            UserSearch::Email(email) => ("email", email),
        };

        // SQLite LIKE is case-insensitive for ASCII
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {column} LIKE ? ESCAPE '\\' ORDER BY id"
        ))
        .bind(like_pattern(term))
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(row_to_user).collect()
    }
}

/// Convert a database row to a User model.
fn row_to_user(row: &SqliteRow) -> DbResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        registration_date: row.try_get("registration_date")?,
        role: row.try_get("role")?,
    })
}
