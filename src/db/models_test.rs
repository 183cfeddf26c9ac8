//! Tests for domain models.

use crate::db::models::*;

#[test]
fn task_status_deserializes_from_wire_format() {
    let in_progress: TaskStatus = serde_json::from_str("\"inprogress\"").unwrap();
    assert_eq!(in_progress, TaskStatus::InProgress);

    let done: TaskStatus = serde_json::from_str("\"done\"").unwrap();
    assert_eq!(done, TaskStatus::Done);
}

#[test]
fn task_status_rejects_unknown_values() {
    assert!(serde_json::from_str::<TaskStatus>("\"in_progress\"").is_err());
    assert!("later".parse::<TaskStatus>().is_err());
}

#[test]
fn task_status_display_matches_serde() {
    for status in [TaskStatus::New, TaskStatus::InProgress, TaskStatus::Done] {
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, format!("\"{}\"", status));
        assert_eq!(status.to_string().parse::<TaskStatus>().unwrap(), status);
    }
}

#[test]
fn task_priority_display_matches_serde() {
    for priority in [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High] {
        let json = serde_json::to_string(&priority).unwrap();
        assert_eq!(json, format!("\"{}\"", priority));
        assert_eq!(
            priority.to_string().parse::<TaskPriority>().unwrap(),
            priority
        );
    }
}

#[test]
fn defaults_are_new_and_medium() {
    assert_eq!(TaskStatus::default(), TaskStatus::New);
    assert_eq!(TaskPriority::default(), TaskPriority::Medium);
}
