//! JSON error envelope shared by every handler.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::auth::AuthError;
use crate::application::posts::WorkspaceError;
use crate::application::render::RenderError;
use crate::application::repos::RepoError;
use crate::application::uploads::UploadError;

pub mod codes {
    pub const VALIDATION: &str = "validation_error";
    pub const DUPLICATE: &str = "duplicate";
    pub const NOT_FOUND: &str = "not_found";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const BAD_REQUEST: &str = "bad_request";
    pub const BACKEND: &str = "backend_error";
    pub const UPLOAD: &str = "upload_error";
    pub const RENDER: &str = "render_error";
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    error: ApiErrorMessage,
}

#[derive(Debug, Serialize)]
struct ApiErrorMessage {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    hint: Option<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            hint,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, None)
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            codes::UNAUTHORIZED,
            "authentication required",
            None,
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message, None)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            codes::VALIDATION,
            message,
            None,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code,
                message: self.message,
                hint: self.hint,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<WorkspaceError> for ApiError {
    fn from(err: WorkspaceError) -> Self {
        match err {
            WorkspaceError::MissingField { .. } | WorkspaceError::InvalidSlug => {
                Self::validation(err.to_string())
            }
            WorkspaceError::DuplicateSlug { .. } => {
                Self::new(StatusCode::CONFLICT, codes::DUPLICATE, err.to_string(), None)
            }
            WorkspaceError::NotFound => Self::not_found("record not found"),
            WorkspaceError::Repo(repo) => repo.into(),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::not_found("record not found"),
            RepoError::Duplicate { .. } => Self::new(
                StatusCode::CONFLICT,
                codes::DUPLICATE,
                "record already exists",
                None,
            ),
            RepoError::InvalidInput { message } => Self::bad_request(message),
            RepoError::Timeout | RepoError::Persistence(_) => Self::new(
                StatusCode::BAD_GATEWAY,
                codes::BACKEND,
                err.to_string(),
                None,
            ),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Validation(validation) => Self::validation(validation.to_string()),
            UploadError::Storage(storage) => Self::new(
                StatusCode::BAD_GATEWAY,
                codes::UPLOAD,
                storage.to_string(),
                None,
            ),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidToken => Self::new(
                StatusCode::UNAUTHORIZED,
                codes::UNAUTHORIZED,
                err.to_string(),
                None,
            ),
            AuthError::Backend { .. } | AuthError::Transport(_) => Self::new(
                StatusCode::BAD_GATEWAY,
                codes::BACKEND,
                err.to_string(),
                None,
            ),
        }
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::RENDER,
            err.to_string(),
            None,
        )
    }
}
