//! V1 API handlers.
//!
//! Shared DTOs and error mapping live here; each resource has its own module.

mod projects;
mod system;
mod tasks;
mod users;

#[cfg(test)]
mod projects_test;

pub use projects::*;
pub use system::*;
pub use tasks::*;
pub use users::*;

use axum::{
    Json,
    extract::{
        Path, Query,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::db::{DbError, Id};

/// Error response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    #[schema(example = "Entity not found: User with id '42'")]
    pub error: String,
}

/// Body returned by every create endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    /// Generated identifier
    #[schema(example = 1)]
    pub id: Id,
}

/// Error half of every handler result.
pub type HandlerError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub(crate) fn bad_request(message: impl Into<String>) -> HandlerError {
    error_response(StatusCode::BAD_REQUEST, message)
}

/// Map a repository error to its HTTP status.
pub(crate) fn map_db_error(err: DbError) -> HandlerError {
    match err {
        DbError::NotFound { .. } => error_response(StatusCode::NOT_FOUND, err.to_string()),
        DbError::Validation { .. } => bad_request(err.to_string()),
        _ => {
            error!(error = %err, "Database operation failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

/// Unwrap an integer path id, turning extractor failures into 400.
pub(crate) fn parse_id(path: Result<Path<Id>, PathRejection>) -> Result<Id, HandlerError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| bad_request(format!("Invalid id: {}", rejection.body_text())))
}

/// Unwrap a JSON body, turning malformed or mistyped input into 400.
pub(crate) fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, HandlerError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| bad_request(format!("Invalid input: {}", rejection.body_text())))
}

/// Unwrap query parameters, turning decode failures into 400.
pub(crate) fn parse_query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, HandlerError> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| bad_request(rejection.body_text()))
}

/// Treat an empty query parameter the same as a missing one.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse an optional integer query parameter.
pub(crate) fn parse_id_param(name: &str, value: Option<String>) -> Result<Option<Id>, String> {
    non_empty(value)
        .map(|v| {
            v.trim()
                .parse::<Id>()
                .map_err(|_| format!("{name} must be an integer, got '{v}'"))
        })
        .transpose()
}

/// Reject blank required strings.
pub(crate) fn require_text(name: &str, value: String) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err(format!("{name} is required"));
    }
    Ok(value)
}
