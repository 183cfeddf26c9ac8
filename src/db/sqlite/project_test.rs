//! Tests for SqliteProjectRepository.

use chrono::{Duration, Utc};

use crate::db::{
    Database, DbError, ProjectFields, ProjectRepository, ProjectSearch, SqliteDatabase,
};

async fn setup_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    db
}

fn fields(title: &str, manager_id: i64) -> ProjectFields {
    ProjectFields {
        title: title.to_string(),
        description: None,
        completed: None,
        manager_id,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn create_and_get_project() {
    let db = setup_db().await;
    let repo = db.projects();

    let before = Utc::now() - Duration::seconds(1);
    let id = repo
        .create(&ProjectFields {
            description: Some("A test project".to_string()),
            ..fields("Test Project", 5)
        })
        .await
        .expect("Create should succeed");

    let project = repo.get(id).await.expect("Get should succeed");
    assert_eq!(project.id, id);
    assert_eq!(project.title, "Test Project");
    assert_eq!(project.description.as_deref(), Some("A test project"));
    assert_eq!(project.manager_id, 5);
    assert_eq!(project.completed, None);
    assert!(project.started >= before);
}

#[tokio::test(flavor = "multi_thread")]
async fn get_nonexistent_project_returns_not_found() {
    let db = setup_db().await;

    let result = db.projects().get(12345).await;
    assert!(matches!(result, Err(DbError::NotFound { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn update_project_keeps_start_date() {
    let db = setup_db().await;
    let repo = db.projects();

    let id = repo.create(&fields("Original", 1)).await.unwrap();
    let started = repo.get(id).await.unwrap().started;

    let completed = started + Duration::days(10);
    let updated = repo
        .update(
            id,
            &ProjectFields {
                title: "Updated".to_string(),
                description: Some("Now with description".to_string()),
                completed: Some(completed),
                manager_id: 2,
            },
        )
        .await
        .expect("Update should succeed");

    assert_eq!(updated.title, "Updated");
    assert_eq!(updated.completed, Some(completed));
    assert_eq!(updated.manager_id, 2);
    assert_eq!(updated.started, started);
    assert_eq!(repo.get(id).await.unwrap(), updated);
}

#[tokio::test(flavor = "multi_thread")]
async fn update_nonexistent_project_returns_not_found() {
    let db = setup_db().await;

    let result = db.projects().update(77, &fields("Ghost", 1)).await;
    assert!(matches!(result, Err(DbError::NotFound { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_project() {
    let db = setup_db().await;
    let repo = db.projects();

    let id = repo.create(&fields("To Delete", 1)).await.unwrap();
    repo.delete(id).await.expect("Delete should succeed");

    assert!(matches!(repo.get(id).await, Err(DbError::NotFound { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn search_projects_by_title_and_manager() {
    let db = setup_db().await;
    let repo = db.projects();

    let website = repo.create(&fields("Website Redesign", 1)).await.unwrap();
    let mobile = repo.create(&fields("Mobile App", 2)).await.unwrap();
    let site = repo.create(&fields("Intranet SITE", 2)).await.unwrap();

    let by_title = repo
        .search(&ProjectSearch::Title("site".to_string()))
        .await
        .unwrap();
    let ids: Vec<_> = by_title.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![website, site]);

    let by_manager = repo.search(&ProjectSearch::Manager(2)).await.unwrap();
    let ids: Vec<_> = by_manager.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![mobile, site]);

    let none = repo.search(&ProjectSearch::Manager(3)).await.unwrap();
    assert!(none.is_empty());
}
