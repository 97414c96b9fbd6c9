use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Photo API error: {status} {reason}")]
    Api { status: u16, reason: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("No image stored for {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(day) => (StatusCode::NOT_FOUND, format!("No image for {}", day)),
            AppError::Api { .. } | AppError::Transport(_) => {
                tracing::error!("Upstream error: {}", self);
                (
                    StatusCode::BAD_GATEWAY,
                    "Photo service unavailable".to_string(),
                )
            }
            _ => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
