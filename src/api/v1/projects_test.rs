//! Integration tests for Project API endpoints.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::api::{AppState, create_router};
use crate::db::{Database, SqliteDatabase};

/// Create a test app with an in-memory database
async fn test_app() -> axum::Router {
    let db = SqliteDatabase::in_memory().await.unwrap();
    db.migrate().await.unwrap();
    create_router(AppState::new(db))
}

/// Helper to parse JSON response body
async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn create_project(app: &axum::Router, title: &str, manager_id: i64) -> i64 {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/projects",
            json!({"projectTitle": title, "projectDescription": "desc", "managerId": manager_id}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await["id"].as_i64().unwrap()
}

// =============================================================================
// GET /projects - List Projects
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn list_projects_initially_empty() {
    let app = test_app().await;

    let response = app.oneshot(get("/projects")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn list_projects_ordered_by_id() {
    let app = test_app().await;
    let first = create_project(&app, "Alpha", 1).await;
    let second = create_project(&app, "Beta", 1).await;

    let body = json_body(app.oneshot(get("/projects")).await.unwrap()).await;
    let projects = body.as_array().unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0]["id"], first);
    assert_eq!(projects[1]["id"], second);
}

// =============================================================================
// CRUD
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn create_then_get_uses_wire_field_names() {
    let app = test_app().await;
    let id = create_project(&app, "Website relaunch", 3).await;

    let response = app
        .oneshot(get(&format!("/projects/{}", id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["id"], id);
    assert_eq!(body["projectTitle"], "Website relaunch");
    assert_eq!(body["projectDescription"], "desc");
    assert_eq!(body["managerId"], 3);
    assert!(body["started"].is_string());
    assert!(body["completed"].is_null());
}

#[tokio::test(flavor = "multi_thread")]
async fn update_sets_completion_and_keeps_start() {
    let app = test_app().await;
    let id = create_project(&app, "Apollo", 1).await;
    let before = json_body(
        app.clone()
            .oneshot(get(&format!("/projects/{}", id)))
            .await
            .unwrap(),
    )
    .await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/projects/{}", id),
            json!({
                "projectTitle": "Apollo 11",
                "projectDescription": null,
                "completed": "2030-07-20T20:17:00Z",
                "managerId": 2,
                "started": "1961-05-25T00:00:00Z"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["projectTitle"], "Apollo 11");
    assert!(body["projectDescription"].is_null());
    assert_eq!(body["managerId"], 2);
    assert!(body["completed"].is_string());
    assert_eq!(body["started"], before["started"]);

    let fetched = json_body(app.oneshot(get(&format!("/projects/{}", id))).await.unwrap()).await;
    assert_eq!(fetched, body);
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_then_get_returns_not_found() {
    let app = test_app().await;
    let id = create_project(&app, "Doomed", 1).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/projects/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get(&format!("/projects/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn create_without_title_is_bad_request() {
    let app = test_app().await;

    let response = app
        .oneshot(json_request("POST", "/projects", json!({"managerId": 1})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn update_missing_project_returns_not_found() {
    let app = test_app().await;

    let response = app
        .oneshot(json_request(
            "PUT",
            "/projects/77",
            json!({"projectTitle": "Ghost", "managerId": 1}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Search and related tasks
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn search_by_title_matches_substring() {
    let app = test_app().await;
    let web = create_project(&app, "Website relaunch", 1).await;
    create_project(&app, "Mobile app", 1).await;

    let response = app
        .oneshot(get("/projects/search/title?title=SITE"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let projects = body.as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["id"], web);
}

#[tokio::test(flavor = "multi_thread")]
async fn search_by_manager_returns_only_their_projects() {
    let app = test_app().await;
    let mine = create_project(&app, "Mine", 5).await;
    create_project(&app, "Theirs", 6).await;

    let body = json_body(
        app.clone()
            .oneshot(get("/projects/search/manager?managerId=5"))
            .await
            .unwrap(),
    )
    .await;
    let projects = body.as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["id"], mine);

    let response = app
        .oneshot(get("/projects/search/manager?managerId=42"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn search_without_or_with_bad_parameter_is_bad_request() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(get("/projects/search/title"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(get("/projects/search/manager"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get("/projects/search/manager?managerId=boss"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn project_tasks_lists_tasks_in_project() {
    let app = test_app().await;
    let project = create_project(&app, "Apollo", 1).await;

    for (title, project_id) in [("Launch", Some(project)), ("Unrelated", None)] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/tasks",
                json!({"title": title, "respId": 1, "projectId": project_id}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(get(&format!("/projects/{}/tasks", project)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let tasks = body.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Launch");
    assert_eq!(tasks[0]["projectId"], project);
}

// =============================================================================
// System
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn health_and_openapi_are_served() {
    let app = test_app().await;

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");

    let response = app.oneshot(get("/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let doc = json_body(response).await;
    assert!(doc["paths"]["/tasks/search"].is_object());
    assert!(doc["paths"]["/projects/{id}/tasks"].is_object());
}
