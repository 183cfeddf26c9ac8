//! Task management handlers.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

use super::{
    CreatedResponse, ErrorResponse, HandlerError, bad_request, map_db_error, non_empty,
    parse_body, parse_id, parse_id_param, parse_query, require_text,
};
use crate::api::AppState;
use crate::db::{
    Database, Id, Task, TaskFields, TaskPriority, TaskRepository, TaskSearch, TaskStatus,
};

// =============================================================================
// DTOs (Data Transfer Objects)
// =============================================================================

/// Task response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    #[schema(example = 1)]
    pub id: Id,
    #[schema(example = "Write release notes")]
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    /// Assignee user ID
    #[schema(example = 1)]
    pub resp_id: Id,
    pub project_id: Option<Id>,
    /// Set by the server when the task is created
    pub creation_date: DateTime<Utc>,
    pub completion_date: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(t: Task) -> Self {
        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            priority: t.priority,
            status: t.status,
            resp_id: t.resp_id,
            project_id: t.project_id,
            creation_date: t.creation_date,
            completion_date: t.completion_date,
        }
    }
}

/// Create/replace task request DTO.
///
/// Omitted `priority` and `status` default to `medium` and `new`. An omitted
/// `completionDate` defaults to one month after the save. `id` and
/// `creationDate` in the body are ignored.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    #[serde(default)]
    #[schema(example = "Write release notes")]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
    /// Assignee user ID
    #[schema(example = 1)]
    pub resp_id: Option<Id>,
    pub project_id: Option<Id>,
    pub completion_date: Option<DateTime<Utc>>,
}

impl TaskRequest {
    fn into_fields(self) -> Result<TaskFields, String> {
        let title = require_text("title", self.title)?;
        let resp_id = self.resp_id.ok_or("respId is required")?;
        Ok(TaskFields {
            title,
            description: self.description,
            priority: self.priority,
            status: self.status,
            resp_id,
            project_id: self.project_id,
            completion_date: self.completion_date,
        })
    }
}

/// Query parameters for task search.
///
/// Only the first present parameter is used, in the order
/// `title`, `status`, `priority`, `respId`, `projectId`.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TaskSearchQuery {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// One of `new`, `inprogress`, `done`
    pub status: Option<String>,
    /// One of `low`, `medium`, `high`
    pub priority: Option<String>,
    /// Assignee user ID
    pub resp_id: Option<String>,
    pub project_id: Option<String>,
}

impl TaskSearchQuery {
    /// Pick the search criterion. `Ok(None)` means no parameter was given.
    pub fn into_search(self) -> Result<Option<TaskSearch>, String> {
        if let Some(title) = non_empty(self.title) {
            return Ok(Some(TaskSearch::Title(title)));
        }
        if let Some(status) = non_empty(self.status) {
            return status.trim().parse().map(|s| Some(TaskSearch::Status(s)));
        }
        if let Some(priority) = non_empty(self.priority) {
            return priority.trim().parse().map(|p| Some(TaskSearch::Priority(p)));
        }
        if let Some(resp_id) = parse_id_param("respId", self.resp_id)? {
            return Ok(Some(TaskSearch::Assignee(resp_id)));
        }
        Ok(parse_id_param("projectId", self.project_id)?.map(TaskSearch::Project))
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// List all tasks
#[utoipa::path(
    get,
    path = "/tasks",
    tag = "tasks",
    responses(
        (status = 200, description = "All tasks", body = Vec<TaskResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_tasks<D: Database>(
    State(state): State<AppState<D>>,
) -> Result<Json<Vec<TaskResponse>>, HandlerError> {
    let tasks = state.db().tasks().list().await.map_err(map_db_error)?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// Get a task by ID
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    tag = "tasks",
    params(("id" = i64, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task found", body = TaskResponse),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_task<D: Database>(
    State(state): State<AppState<D>>,
    path: Result<Path<Id>, PathRejection>,
) -> Result<Json<TaskResponse>, HandlerError> {
    let id = parse_id(path)?;
    let task = state.db().tasks().get(id).await.map_err(map_db_error)?;
    Ok(Json(TaskResponse::from(task)))
}

/// Create a new task
///
/// The creation date is set by the server; a completion date earlier than it
/// is rejected.
#[utoipa::path(
    post,
    path = "/tasks",
    tag = "tasks",
    request_body = TaskRequest,
    responses(
        (status = 201, description = "Task created", body = CreatedResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_task<D: Database>(
    State(state): State<AppState<D>>,
    body: Result<Json<TaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), HandlerError> {
    let fields = parse_body(body)?.into_fields().map_err(bad_request)?;
    let id = state
        .db()
        .tasks()
        .create(&fields)
        .await
        .map_err(map_db_error)?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// Replace a task
///
/// The completion date is checked against the task's stored creation date.
#[utoipa::path(
    put,
    path = "/tasks/{id}",
    tag = "tasks",
    params(("id" = i64, Path, description = "Task ID")),
    request_body = TaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_task<D: Database>(
    State(state): State<AppState<D>>,
    path: Result<Path<Id>, PathRejection>,
    body: Result<Json<TaskRequest>, JsonRejection>,
) -> Result<Json<TaskResponse>, HandlerError> {
    let id = parse_id(path)?;
    let fields = parse_body(body)?.into_fields().map_err(bad_request)?;
    let task = state
        .db()
        .tasks()
        .update(id, &fields)
        .await
        .map_err(map_db_error)?;

    Ok(Json(TaskResponse::from(task)))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    tag = "tasks",
    params(("id" = i64, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_task<D: Database>(
    State(state): State<AppState<D>>,
    path: Result<Path<Id>, PathRejection>,
) -> Result<StatusCode, HandlerError> {
    let id = parse_id(path)?;
    state.db().tasks().delete(id).await.map_err(map_db_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Search tasks
///
/// Filters by exactly one criterion; see the parameter list for precedence.
#[utoipa::path(
    get,
    path = "/tasks/search",
    tag = "tasks",
    params(TaskSearchQuery),
    responses(
        (status = 200, description = "Matching tasks", body = Vec<TaskResponse>),
        (status = 400, description = "Missing or invalid search parameter", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn search_tasks<D: Database>(
    State(state): State<AppState<D>>,
    query: Result<Query<TaskSearchQuery>, QueryRejection>,
) -> Result<Json<Vec<TaskResponse>>, HandlerError> {
    let search = parse_query(query)?
        .into_search()
        .map_err(bad_request)?
        .ok_or_else(|| {
            bad_request("one of title, status, priority, respId or projectId is required")
        })?;

    let tasks = state
        .db()
        .tasks()
        .search(&search)
        .await
        .map_err(map_db_error)?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}
