//! Project management handlers.

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
    CreatedResponse, ErrorResponse, HandlerError, TaskResponse, bad_request, map_db_error,
    non_empty, parse_body, parse_id, parse_id_param, parse_query, require_text,
};
use crate::api::AppState;
use crate::db::{
    Database, Id, Project, ProjectFields, ProjectRepository, ProjectSearch, TaskRepository,
    TaskSearch,
};

// =============================================================================
// DTOs (Data Transfer Objects)
// =============================================================================

/// Project response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    #[schema(example = 1)]
    pub id: Id,
    #[schema(example = "Website relaunch")]
    pub project_title: String,
    pub project_description: Option<String>,
    /// Set by the server when the project is created
    pub started: DateTime<Utc>,
    pub completed: Option<DateTime<Utc>>,
    /// Managing user ID
    #[schema(example = 1)]
    pub manager_id: Id,
}

impl From<Project> for ProjectResponse {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            project_title: p.title,
            project_description: p.description,
            started: p.started,
            completed: p.completed,
            manager_id: p.manager_id,
        }
    }
}

/// Create/replace project request DTO.
///
/// `id` and `started` in the body are ignored.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    #[serde(default)]
    #[schema(example = "Website relaunch")]
    pub project_title: String,
    pub project_description: Option<String>,
    pub completed: Option<DateTime<Utc>>,
    /// Managing user ID
    #[schema(example = 1)]
    pub manager_id: Option<Id>,
}

impl ProjectRequest {
    fn into_fields(self) -> Result<ProjectFields, String> {
        let title = require_text("projectTitle", self.project_title)?;
        let manager_id = self.manager_id.ok_or("managerId is required")?;
        Ok(ProjectFields {
            title,
            description: self.project_description,
            completed: self.completed,
            manager_id,
        })
    }
}

/// Query for `/projects/search/title`
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectTitleQuery {
    /// Case-insensitive substring of the project title
    #[param(example = "web")]
    pub title: Option<String>,
}

/// Query for `/projects/search/manager`
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProjectManagerQuery {
    /// Managing user ID
    #[param(example = "1")]
    pub manager_id: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// List all projects
#[utoipa::path(
    get,
    path = "/projects",
    tag = "projects",
    responses(
        (status = 200, description = "All projects", body = Vec<ProjectResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_projects<D: Database>(
    State(state): State<AppState<D>>,
) -> Result<Json<Vec<ProjectResponse>>, HandlerError> {
    let projects = state.db().projects().list().await.map_err(map_db_error)?;
    Ok(Json(
        projects.into_iter().map(ProjectResponse::from).collect(),
    ))
}

/// Get a project by ID
#[utoipa::path(
    get,
    path = "/projects/{id}",
    tag = "projects",
    params(("id" = i64, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project found", body = ProjectResponse),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_project<D: Database>(
    State(state): State<AppState<D>>,
    path: Result<Path<Id>, PathRejection>,
) -> Result<Json<ProjectResponse>, HandlerError> {
    let id = parse_id(path)?;
    let project = state.db().projects().get(id).await.map_err(map_db_error)?;
    Ok(Json(ProjectResponse::from(project)))
}

/// Create a new project
///
/// The start date is set by the server.
#[utoipa::path(
    post,
    path = "/projects",
    tag = "projects",
    request_body = ProjectRequest,
    responses(
        (status = 201, description = "Project created", body = CreatedResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_project<D: Database>(
    State(state): State<AppState<D>>,
    body: Result<Json<ProjectRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), HandlerError> {
    let fields = parse_body(body)?.into_fields().map_err(bad_request)?;
    let id = state
        .db()
        .projects()
        .create(&fields)
        .await
        .map_err(map_db_error)?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// Replace a project
///
/// The start date is kept.
#[utoipa::path(
    put,
    path = "/projects/{id}",
    tag = "projects",
    params(("id" = i64, Path, description = "Project ID")),
    request_body = ProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = ProjectResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_project<D: Database>(
    State(state): State<AppState<D>>,
    path: Result<Path<Id>, PathRejection>,
    body: Result<Json<ProjectRequest>, JsonRejection>,
) -> Result<Json<ProjectResponse>, HandlerError> {
    let id = parse_id(path)?;
    let fields = parse_body(body)?.into_fields().map_err(bad_request)?;
    let project = state
        .db()
        .projects()
        .update(id, &fields)
        .await
        .map_err(map_db_error)?;

    Ok(Json(ProjectResponse::from(project)))
}

/// Delete a project
///
/// Tasks that reference the project are left untouched.
#[utoipa::path(
    delete,
    path = "/projects/{id}",
    tag = "projects",
    params(("id" = i64, Path, description = "Project ID")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_project<D: Database>(
    State(state): State<AppState<D>>,
    path: Result<Path<Id>, PathRejection>,
) -> Result<StatusCode, HandlerError> {
    let id = parse_id(path)?;
    state
        .db()
        .projects()
        .delete(id)
        .await
        .map_err(map_db_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the tasks belonging to a project
#[utoipa::path(
    get,
    path = "/projects/{id}/tasks",
    tag = "projects",
    params(("id" = i64, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Tasks in the project", body = Vec<TaskResponse>),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_project_tasks<D: Database>(
    State(state): State<AppState<D>>,
    path: Result<Path<Id>, PathRejection>,
) -> Result<Json<Vec<TaskResponse>>, HandlerError> {
    let id = parse_id(path)?;
    let tasks = state
        .db()
        .tasks()
        .search(&TaskSearch::Project(id))
        .await
        .map_err(map_db_error)?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// Search projects by title
#[utoipa::path(
    get,
    path = "/projects/search/title",
    tag = "projects",
    params(ProjectTitleQuery),
    responses(
        (status = 200, description = "Matching projects", body = Vec<ProjectResponse>),
        (status = 400, description = "Missing title parameter", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn search_projects_by_title<D: Database>(
    State(state): State<AppState<D>>,
    query: Result<Query<ProjectTitleQuery>, QueryRejection>,
) -> Result<Json<Vec<ProjectResponse>>, HandlerError> {
    let title = non_empty(parse_query(query)?.title)
        .ok_or_else(|| bad_request("title query parameter is required"))?;

    search_projects(&state, ProjectSearch::Title(title)).await
}

/// Search projects by manager
#[utoipa::path(
    get,
    path = "/projects/search/manager",
    tag = "projects",
    params(ProjectManagerQuery),
    responses(
        (status = 200, description = "Projects managed by the user", body = Vec<ProjectResponse>),
        (status = 400, description = "Missing or invalid managerId parameter", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn search_projects_by_manager<D: Database>(
    State(state): State<AppState<D>>,
    query: Result<Query<ProjectManagerQuery>, QueryRejection>,
) -> Result<Json<Vec<ProjectResponse>>, HandlerError> {
    let manager_id = parse_id_param("managerId", parse_query(query)?.manager_id)
        .map_err(bad_request)?
        .ok_or_else(|| bad_request("managerId query parameter is required"))?;

    search_projects(&state, ProjectSearch::Manager(manager_id)).await
}

async fn search_projects<D: Database>(
    state: &AppState<D>,
    search: ProjectSearch,
) -> Result<Json<Vec<ProjectResponse>>, HandlerError> {
    let projects = state
        .db()
        .projects()
        .search(&search)
        .await
        .map_err(map_db_error)?;

    Ok(Json(
        projects.into_iter().map(ProjectResponse::from).collect(),
    ))
}
