use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use quill_db::{StoreError, Table};
use quill_types::api::ErrorBody;
use thiserror::Error;
use tracing::error;

/// Every failure a handler can surface. Rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    MissingField(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Username not found")]
    UnknownUsername,

    #[error("Invalid authentication")]
    InvalidCredentials,

    #[error("Credentials required")]
    CredentialsRequired,

    #[error("Not allowed to modify this resource")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DuplicateUsername => StatusCode::CONFLICT,
            ApiError::UnknownUsername
            | ApiError::InvalidCredentials
            | ApiError::CredentialsRequired => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a client. Internal detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { table, .. } => ApiError::NotFound(match table {
                Table::Account => "Account id not found",
                Table::Blog => "Blog id not found",
                Table::Comment => "Comment not found",
            }),
            StoreError::AuthorNotFound(_) => ApiError::NotFound("Author ID not found"),
            StoreError::BlogNotFound(_) => ApiError::NotFound("blog_id not found"),
            StoreError::DuplicateUsername(_) => ApiError::DuplicateUsername,
            other => {
                error!("Store error: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.public_message(),
        };

        if matches!(self, ApiError::CredentialsRequired) {
            return (
                self.status(),
                [(header::WWW_AUTHENTICATE, r#"Basic realm="quill""#)],
                Json(body),
            )
                .into_response();
        }

        (self.status(), Json(body)).into_response()
    }
}
