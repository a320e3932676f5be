use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::response::{ApiResponse, Meta};

/// A single rejected field in a multi-row payload.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FieldIssue {
    pub index: usize,
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(index: usize, field: &str, message: &str) -> Self {
        Self {
            index,
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("{message}")]
    Validation {
        message: String,
        issues: Vec<FieldIssue>,
    },

    #[error("Unauthorized {0}")]
    Unauthorized(String),

    #[error("Forbidden {0}")]
    Forbidden(String),

    #[error("Conflict {0}")]
    Conflict(String),

    #[error("ORM error")]
    OrmError(#[source] DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Map a unique-index violation to `Conflict(message)`; other errors pass through.
    pub fn on_unique(message: impl Into<String>) -> impl FnOnce(DbErr) -> AppError {
        let message = message.into();
        move |err| match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(message),
            _ => AppError::OrmError(err),
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::on_unique("Resource already exists")(err)
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    issues: Option<Vec<FieldIssue>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::OrmError(err) => {
                tracing::error!(error = %err, "database error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = self.to_string();
        let issues = match self {
            AppError::Validation { issues, .. } => Some(issues),
            _ => None,
        };

        let body = ApiResponse {
            message: message.clone(),
            data: Some(ErrorData {
                error: message,
                issues,
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
