//! Domain models for the project database.
//!
//! These models are storage-agnostic and represent the core entities
//! used throughout the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Database-generated integer ID used for all entities.
pub type Id = i64;

// =============================================================================
// Users
// =============================================================================

/// A person who can be assigned tasks and manage projects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub registration_date: DateTime<Utc>,
    pub role: String,
}

/// Writable user fields, used for both create and full-replace update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFields {
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Single-criterion user search. String matches are case-insensitive substrings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserSearch {
    Name(String),
    Email(String),
}

// =============================================================================
// Tasks
// =============================================================================

/// An individual work item assigned to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: Id,
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    /// Assignee user ID
    pub resp_id: Id,
    pub project_id: Option<Id>,
    pub creation_date: DateTime<Utc>,
    pub completion_date: DateTime<Utc>,
}

/// Writable task fields.
///
/// `completion_date` of `None` is resolved by the repository to one month
/// after the save time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFields {
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub resp_id: Id,
    pub project_id: Option<Id>,
    pub completion_date: Option<DateTime<Utc>>,
}

/// Single-criterion task search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSearch {
    /// Case-insensitive title substring
    Title(String),
    Status(TaskStatus),
    Priority(TaskPriority),
    Assignee(Id),
    Project(Id),
}

/// Status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    New,
    InProgress,
    Done,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::New => write!(f, "new"),
            TaskStatus::InProgress => write!(f, "inprogress"),
            TaskStatus::Done => write!(f, "done"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(TaskStatus::New),
            "inprogress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(format!("Invalid task status: {}", s)),
        }
    }
}

/// Priority of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            _ => Err(format!("Invalid task priority: {}", s)),
        }
    }
}

// =============================================================================
// Projects
// =============================================================================

/// A project groups tasks under a managing user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: Id,
    pub title: String,
    pub description: Option<String>,
    pub started: DateTime<Utc>,
    pub completed: Option<DateTime<Utc>>,
    pub manager_id: Id,
}

/// Writable project fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFields {
    pub title: String,
    pub description: Option<String>,
    pub completed: Option<DateTime<Utc>>,
    pub manager_id: Id,
}

/// Single-criterion project search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectSearch {
    /// Case-insensitive title substring
    Title(String),
    Manager(Id),
}
