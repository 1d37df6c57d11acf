use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};

use crate::api::response;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    ValidationError(String),

    #[error("Failed to download document: {0}")]
    DownloadError(String),

    #[error("Failed to extract text: {0}")]
    ExtractionError(String),

    #[error("Summary generation failed: {0}")]
    GenerationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::DownloadError(_)
            | AppError::ExtractionError(_)
            | AppError::GenerationError(_)
            | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short name of the failure kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation",
            AppError::DownloadError(_) => "download",
            AppError::ExtractionError(_) => "extraction",
            AppError::GenerationError(_) => "generation",
            AppError::ConfigError(_) => "config",
        }
    }

    /// The caller-facing message, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            AppError::ValidationError(msg)
            | AppError::DownloadError(msg)
            | AppError::ExtractionError(msg)
            | AppError::GenerationError(msg)
            | AppError::ConfigError(msg) => msg,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        response::error(status, self.message().to_string()).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::DownloadError(format!("Failed to download PDF: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
