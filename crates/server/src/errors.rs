use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Failures a handler reports to the client as plain text.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Internal(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("template error: {0}")]
    Render(#[from] minijinja::Error),
}

impl AppError {
    pub fn internal(msg: impl Into<String>) -> Self { Self::Internal(msg.into()) }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response(),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Render(e) => {
                error!(error = %e, event = "render_failed", "template rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Unable to render page").into_response()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("schema initialization failed: {0}")]
    Schema(#[from] service::errors::ServiceError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
