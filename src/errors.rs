use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error; // Use thiserror for cleaner error definitions

// --- Domain/Infrastructure Errors ---

#[derive(Error, Debug)]
pub enum RepoError {
    #[error("Database backend error: {0}")]
    BackendError(#[from] anyhow::Error), // Wrap anyhow errors from the SQLite layer
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File write failed: {0}")]
    WriteFailed(String),

    #[error("Storage backend error: {0}")]
    BackendError(#[from] anyhow::Error), // Wrap anyhow errors from the disk layer
}

// --- Web Layer Error ---

#[derive(Error, Debug)]
pub enum AppError {
    // Input validation / request parsing errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Missing form field: {0}")]
    MissingFormField(String),
    #[error("Error processing multipart form data: {0}")]
    MultipartError(#[from] axum::extract::multipart::MultipartError),
    #[error("Unknown category: {0}")]
    UnknownCategory(#[from] crate::models::UnknownCategory),

    // Admin gate refused the request
    #[error("Forbidden")]
    Forbidden,

    // Domain/Service level errors (mapped from RepoError/StorageError)
    #[error("Could not access photo records")]
    RepositoryError(#[source] RepoError),
    #[error("Could not perform file storage operation")]
    StorageError(#[source] StorageError),

    // View rendering
    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] askama::Error),

    // Configuration / Startup errors
    #[error("Initialization error: {0}")]
    InitError(String),

    // Generic Internal Server Error
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        AppError::RepositoryError(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::StorageError(err)
    }
}

// --- Axum Response Implementation ---
//
// Last line of defense: every error becomes a plain-text response. Client
// errors carry a short reason; server errors log the detail and leak nothing.

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            // 4xx Client Errors
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::MissingFormField(field) => {
                (StatusCode::BAD_REQUEST, format!("Missing form field: {}", field))
            }
            AppError::MultipartError(e) => {
                (StatusCode::BAD_REQUEST, format!("Invalid multipart form data: {}", e))
            }
            AppError::UnknownCategory(_) => {
                (StatusCode::NOT_FOUND, "404 - Not Found".to_string())
            }
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),

            // 5xx Server Errors
            AppError::RepositoryError(e) => {
                tracing::error!(error.source = ?e, "Repository error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error".to_string())
            }
            AppError::StorageError(e) => {
                tracing::error!(error.source = ?e, "Storage error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error".to_string())
            }
            AppError::TemplateError(e) => {
                tracing::error!(error.source = ?e, "Template rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error".to_string())
            }
            AppError::InitError(msg) => {
                tracing::error!("Initialization error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error".to_string())
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error".to_string())
            }
        };

        tracing::error!(error.detail = %self, error.status = %status, "Responding with error");

        (status, body).into_response()
    }
}
