use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::error;

/// Failure taxonomy surfaced to API callers as `{ "error": kind, "message": text }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("transfer code does not match")]
    InvalidCode,
    #[error("transfer code has expired")]
    Expired,
    #[error("cards cannot be transferred to their current owner")]
    SelfTransfer,
    #[error("this quiz question was already answered")]
    AlreadyAnswered,
    #[error("admin privileges required")]
    Forbidden,
    #[error("unsupported question/answer combination: {0}")]
    IllegalQuestionPair(String),
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("database error")]
    Persistence(#[from] sqlx::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::InvalidCode => "invalid_code",
            ApiError::Expired => "expired",
            ApiError::SelfTransfer => "self_transfer",
            ApiError::AlreadyAnswered => "already_answered",
            ApiError::Forbidden => "forbidden",
            ApiError::IllegalQuestionPair(_) => "illegal_question_pair",
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Persistence(_) => "persistence_error",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidCode => StatusCode::UNAUTHORIZED,
            ApiError::Expired => StatusCode::GONE,
            ApiError::SelfTransfer => StatusCode::CONFLICT,
            ApiError::AlreadyAnswered => StatusCode::CONFLICT,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::IllegalQuestionPair(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Persistence(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, kind = self.kind(), "request failed");
        }
        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}
