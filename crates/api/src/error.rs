//! API error types mapped to HTTP status codes.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use bookshelf_storage::BookStoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Storage(#[from] BookStoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::Storage(error) => {
                tracing::error!("storage operation failed: {error:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage operation failed".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
