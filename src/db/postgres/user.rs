//! PostgreSQL UserRepository implementation.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::db::utils::{current_timestamp, like_pattern};
use crate::db::{DbError, DbResult, Id, User, UserFields, UserRepository, UserSearch};

const USER_COLUMNS: &str = "id, name, email, registration_date, role";

/// SQLx-backed user repository.
pub struct PgUserRepository<'a> {
    pub(crate) pool: &'a PgPool,
}

impl UserRepository for PgUserRepository<'_> {
    async fn list(&self) -> DbResult<Vec<User>> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
            .fetch_all(self.pool)
            .await?;

        rows.iter().map(row_to_user).collect()
    }

    async fn get(&self, id: Id) -> DbResult<User> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        let row = row.ok_or_else(|| DbError::not_found("User", id))?;
        row_to_user(&row)
    }

    async fn create(&self, user: &UserFields) -> DbResult<Id> {
        let id: Id = sqlx::query_scalar(
            "INSERT INTO users (name, email, registration_date, role) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(current_timestamp())
        .bind(&user.role)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, id: Id, user: &UserFields) -> DbResult<User> {
        let row = sqlx::query(&format!(
            "UPDATE users SET name = $1, email = $2, role = $3 WHERE id = $4 RETURNING {USER_COLUMNS}"
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
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
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

        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {column} ILIKE $1 ESCAPE '\\' ORDER BY id"
        ))
        .bind(like_pattern(term))
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(row_to_user).collect()
    }
}

/// Convert a database row to a User model.
fn row_to_user(row: &PgRow) -> DbResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        registration_date: row.try_get("registration_date")?,
        role: row.try_get("role")?,
    })
}
