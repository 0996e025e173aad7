use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

// Failure inside a store backend. The in-memory store never produces one;
// the sqlite store wraps whatever sqlx reports.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// Request-level errors. Everything a handler can fail with collapses into
// one of these three, each mapped to a status code and the standard
// `{success: false, message}` envelope at the response boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Todo not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error("Something went wrong!")]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(err) => {
                tracing::error!(error = %err, "store operation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = json!({
            "success": false,
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
