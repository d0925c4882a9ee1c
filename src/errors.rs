use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Reasons a key/value slot refused a write.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("value for '{key}' is {size} bytes, limit is {limit}")]
    TooLarge {
        key: String,
        size: usize,
        limit: usize,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a port number, got '{0}'")]
    InvalidPort(String),

    #[error("APP_STORE must be 'cookie' or 'memory', got '{0}'")]
    UnknownStore(String),
}
