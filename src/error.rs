use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use rusqlite::ffi;
use serde::Serialize;
use thiserror::Error;

use crate::validation::ValidationError;

/// Which integrity rule SQLite refused a write for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    Unique,
    ForeignKey,
}

impl Constraint {
    /// Classify a rusqlite error by its extended result code.
    pub fn of(err: &rusqlite::Error) -> Option<Self> {
        match err {
            rusqlite::Error::SqliteFailure(e, _) => match e.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    Some(Constraint::Unique)
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(Constraint::ForeignKey),
                _ => None,
            },
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{message}")]
    NotFound { code: &'static str, message: String },

    #[error("{message}")]
    Constraint { code: &'static str, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        AppError::NotFound {
            code,
            message: message.into(),
        }
    }

    pub fn foreign_key(message: impl Into<String>) -> Self {
        AppError::Constraint {
            code: "FOREIGN_KEY_CONSTRAINT",
            message: message.into(),
        }
    }

    /// The constraint SQLite rejected a statement for, if that is what this is.
    pub fn constraint(&self) -> Option<Constraint> {
        match self {
            AppError::Database(e) => Constraint::of(e),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, Some(e.code()), e.to_string()),
            AppError::NotFound { code, message } => {
                (StatusCode::NOT_FOUND, Some(code.to_string()), message.clone())
            }
            AppError::Constraint { code, message } => {
                (StatusCode::BAD_REQUEST, Some(code.to_string()), message.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    None,
                    format!("Internal server error: {}", e),
                )
            }
            AppError::Pool(e) => {
                tracing::error!("Pool error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    None,
                    format!("Internal server error: {}", e),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    None,
                    format!("Internal server error: {}", msg),
                )
            }
        };

        (
            status,
            Json(ErrorBody {
                error: message,
                code,
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(ValidationError::MalformedBody(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(ValidationError::MalformedQuery(rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(_: PathRejection) -> Self {
        AppError::Validation(ValidationError::InvalidId)
    }
}

pub type AppResult<T> = Result<T, AppError>;
