//! User management handlers.

use std::sync::LazyLock;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

use super::{
    CreatedResponse, ErrorResponse, HandlerError, TaskResponse, bad_request, map_db_error,
    non_empty, parse_body, parse_id, parse_query, require_text,
};
use crate::api::AppState;
use crate::db::{
    Database, Id, TaskRepository, TaskSearch, User, UserFields, UserRepository, UserSearch,
};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

// =============================================================================
// DTOs (Data Transfer Objects)
// =============================================================================

/// User response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: Id,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Set by the server when the user is created
    pub registration_date: DateTime<Utc>,
    #[schema(example = "developer")]
    pub role: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            registration_date: u.registration_date,
            role: u.role,
        }
    }
}

/// Create/replace user request DTO.
///
/// `id` and `registrationDate` in the body are ignored.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    #[serde(default)]
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[serde(default)]
    #[schema(example = "developer")]
    pub role: String,
}

impl UserRequest {
    fn into_fields(self) -> Result<UserFields, String> {
        let name = require_text("name", self.name)?;
        let role = require_text("role", self.role)?;
        let email = self.email.trim().to_string();
        if !EMAIL.is_match(&email) {
            return Err(format!("email '{}' is not a valid address", self.email));
        }
        Ok(UserFields { name, email, role })
    }
}

/// Query parameters for user search. `name` wins when both are given.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserSearchQuery {
    /// Case-insensitive substring of the user's name
    #[param(example = "ada")]
    pub name: Option<String>,
    /// Case-insensitive substring of the user's email
    #[param(example = "example.com")]
    pub email: Option<String>,
}

impl UserSearchQuery {
    fn into_search(self) -> Option<UserSearch> {
        non_empty(self.name)
            .map(UserSearch::Name)
            .or_else(|| non_empty(self.email).map(UserSearch::Email))
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = Vec<UserResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_users<D: Database>(
    State(state): State<AppState<D>>,
) -> Result<Json<Vec<UserResponse>>, HandlerError> {
    let users = state.db().users().list().await.map_err(map_db_error)?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user<D: Database>(
    State(state): State<AppState<D>>,
    path: Result<Path<Id>, PathRejection>,
) -> Result<Json<UserResponse>, HandlerError> {
    let id = parse_id(path)?;
    let user = state.db().users().get(id).await.map_err(map_db_error)?;
    Ok(Json(UserResponse::from(user)))
}

/// Create a new user
///
/// The registration date is set by the server.
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = CreatedResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_user<D: Database>(
    State(state): State<AppState<D>>,
    body: Result<Json<UserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), HandlerError> {
    let fields = parse_body(body)?.into_fields().map_err(bad_request)?;
    let id = state
        .db()
        .users()
        .create(&fields)
        .await
        .map_err(map_db_error)?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// Replace a user
///
/// Overwrites name, email and role; the registration date is kept.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_user<D: Database>(
    State(state): State<AppState<D>>,
    path: Result<Path<Id>, PathRejection>,
    body: Result<Json<UserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, HandlerError> {
    let id = parse_id(path)?;
    let fields = parse_body(body)?.into_fields().map_err(bad_request)?;
    let user = state
        .db()
        .users()
        .update(id, &fields)
        .await
        .map_err(map_db_error)?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_user<D: Database>(
    State(state): State<AppState<D>>,
    path: Result<Path<Id>, PathRejection>,
) -> Result<StatusCode, HandlerError> {
    let id = parse_id(path)?;
    state.db().users().delete(id).await.map_err(map_db_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the tasks assigned to a user
#[utoipa::path(
    get,
    path = "/users/{id}/tasks",
    tag = "users",
    params(("id" = i64, Path, description = "Assignee user ID")),
    responses(
        (status = 200, description = "Tasks assigned to the user", body = Vec<TaskResponse>),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_user_tasks<D: Database>(
    State(state): State<AppState<D>>,
    path: Result<Path<Id>, PathRejection>,
) -> Result<Json<Vec<TaskResponse>>, HandlerError> {
    let id = parse_id(path)?;
    let tasks = state
        .db()
        .tasks()
        .search(&TaskSearch::Assignee(id))
        .await
        .map_err(map_db_error)?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// Search users by name or email
#[utoipa::path(
    get,
    path = "/users/search",
    tag = "users",
    params(UserSearchQuery),
    responses(
        (status = 200, description = "Matching users", body = Vec<UserResponse>),
        (status = 400, description = "No search parameter given", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn search_users<D: Database>(
    State(state): State<AppState<D>>,
    query: Result<Query<UserSearchQuery>, QueryRejection>,
) -> Result<Json<Vec<UserResponse>>, HandlerError> {
    let search = parse_query(query)?
        .into_search()
        .ok_or_else(|| bad_request("name or email query parameter is required"))?;

    let users = state
        .db()
        .users()
        .search(&search)
        .await
        .map_err(map_db_error)?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
