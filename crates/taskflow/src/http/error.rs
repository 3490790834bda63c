//! Mapping from application failures to HTTP responses.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use taskflow_app::{CommentError, TaskServiceError};
use taskflow_core::error::ValidationError;
use thiserror::Error;
use tracing::error;

use super::AppState;
use super::envelope::Envelope;

const VALIDATION_ERROR: &str = "Validation error";
const NOT_FOUND: &str = "Not Found";
const INTERNAL_ERROR: &str = "Internal Server Error";

/// Failure of a single request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or out-of-range input.
    #[error("{0}")]
    Validation(String),
    /// Resource or route does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Anything else.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    const fn label(&self) -> &'static str {
        match self {
            Self::Validation(_) => VALIDATION_ERROR,
            Self::NotFound(_) => NOT_FOUND,
            Self::Internal(_) => INTERNAL_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(err) = &self {
            error!("internal error: {err:#}");
        }
        let envelope = Envelope::failure(self.label(), Some(self.to_string()));
        (self.status(), envelope).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::Validation(err) => err.into(),
            TaskServiceError::Store(err) => Self::Internal(err),
        }
    }
}

impl From<CommentError> for ApiError {
    fn from(err: CommentError) -> Self {
        match err {
            CommentError::NotFoundOrForbidden => Self::NotFound(err.to_string()),
            CommentError::NotFound(_) => Self::NotFound("Comment not found".to_owned()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// Strip internal error details from 500 responses in production.
pub async fn redact_internal_errors(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if response.status() == StatusCode::INTERNAL_SERVER_ERROR
        && !state.config.environment.exposes_internal_errors()
    {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Envelope::failure(INTERNAL_ERROR, None),
        )
            .into_response();
    }
    response
}
