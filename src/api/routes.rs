//! API route configuration.

use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::state::AppState;
use super::v1::{
    self, CreatedResponse, ErrorResponse, HealthResponse, ProjectRequest, ProjectResponse,
    TaskRequest, TaskResponse, UserRequest, UserResponse,
};
use crate::db::{Database, TaskPriority, TaskStatus};

/// Build routes with generic database type.
///
/// This macro reduces boilerplate when registering handlers that are generic
/// over the Database trait. It applies the turbofish operator automatically.
macro_rules! routes {
    ($D:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$D>));
        )*
        router
    }};
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Project API",
        version = "0.1.0",
        description = "CRUD API for users, tasks and projects",
        license(name = "GPL-2.0")
    ),
    paths(
        v1::health,
        v1::list_users,
        v1::get_user,
        v1::create_user,
        v1::update_user,
        v1::delete_user,
        v1::list_user_tasks,
        v1::search_users,
        v1::list_tasks,
        v1::get_task,
        v1::create_task,
        v1::update_task,
        v1::delete_task,
        v1::search_tasks,
        v1::list_projects,
        v1::get_project,
        v1::create_project,
        v1::update_project,
        v1::delete_project,
        v1::list_project_tasks,
        v1::search_projects_by_title,
        v1::search_projects_by_manager,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            CreatedResponse,
            UserResponse,
            UserRequest,
            TaskResponse,
            TaskRequest,
            TaskPriority,
            TaskStatus,
            ProjectResponse,
            ProjectRequest,
        )
    ),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "users", description = "User management endpoints"),
        (name = "tasks", description = "Task management endpoints"),
        (name = "projects", description = "Project management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the API router with OpenAPI documentation
pub fn create_router<D: Database>(state: AppState<D>) -> Router {
    let api = ApiDoc::openapi();

    // System routes (non-generic)
    let system_routes = Router::new()
        .route("/health", get(v1::health))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }));

    let user_routes = routes!(D => {
        get "/users" => v1::list_users,
        post "/users" => v1::create_user,
        get "/users/search" => v1::search_users,
        get "/users/{id}" => v1::get_user,
        put "/users/{id}" => v1::update_user,
        delete "/users/{id}" => v1::delete_user,
        get "/users/{id}/tasks" => v1::list_user_tasks,
    });

    let task_routes = routes!(D => {
        get "/tasks" => v1::list_tasks,
        post "/tasks" => v1::create_task,
        get "/tasks/search" => v1::search_tasks,
        get "/tasks/{id}" => v1::get_task,
        put "/tasks/{id}" => v1::update_task,
        delete "/tasks/{id}" => v1::delete_task,
    });

    let project_routes = routes!(D => {
        get "/projects" => v1::list_projects,
        post "/projects" => v1::create_project,
        get "/projects/search/title" => v1::search_projects_by_title,
        get "/projects/search/manager" => v1::search_projects_by_manager,
        get "/projects/{id}" => v1::get_project,
        put "/projects/{id}" => v1::update_project,
        delete "/projects/{id}" => v1::delete_project,
        get "/projects/{id}/tasks" => v1::list_project_tasks,
    });

    system_routes
        .merge(user_routes)
        .merge(task_routes)
        .merge(project_routes)
        .merge(Scalar::with_url("/docs", api))
        .with_state(state)
}
