use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::services::ServiceError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    pub fn token_not_found() -> Self {
        ApiError::Unauthorized("token not found".into())
    }

    pub fn invalid_token() -> Self {
        ApiError::Unauthorized("invalid token".into())
    }

    pub fn invalid_id() -> Self {
        ApiError::BadRequest("invalid id".into())
    }

    pub fn invalid_json() -> Self {
        ApiError::BadRequest("invalid json".into())
    }

    /// Failed read of a single record. Anything but a storage fault is a 404.
    pub fn lookup_failed(err: ServiceError, not_found: &str) -> Self {
        match err {
            ServiceError::Storage(msg) => ApiError::storage(msg),
            _ => ApiError::NotFound(not_found.to_string()),
        }
    }

    pub fn create_failed(err: ServiceError) -> Self {
        match err {
            ServiceError::Storage(msg) => ApiError::storage(msg),
            other => ApiError::BadRequest(other.to_string()),
        }
    }

    pub fn update_failed(err: ServiceError) -> Self {
        match err {
            ServiceError::Storage(msg) => ApiError::storage(msg),
            other => ApiError::Conflict(other.to_string()),
        }
    }

    pub fn delete_failed(err: ServiceError) -> Self {
        match err {
            ServiceError::Storage(msg) => ApiError::storage(msg),
            other => ApiError::NotFound(other.to_string()),
        }
    }

    fn storage(msg: String) -> Self {
        tracing::error!(error = %msg, "storage failure");
        ApiError::Internal(format!("db error: {msg}"))
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Unauthorized(msg)
            | ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Internal(msg) => msg,
        };
        (
            status,
            Json(ErrorResponse {
                status: status.as_u16(),
                message,
            }),
        )
            .into_response()
    }
}
