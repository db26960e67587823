use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Request-time errors surfaced at the HTTP boundary
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Metadata unavailable: {0}")]
    MetadataUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// The user-facing message for a title that did not resolve
    pub fn title_not_found(input: &str) -> Self {
        AppError::NotFound(format!(
            "Movie '{}' not found in dataset. Please try another title.",
            input
        ))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::MetadataUnavailable(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Startup errors while loading the catalog or similarity artifacts.
///
/// Any of these is fatal: the server never binds a socket with a partially
/// loaded engine.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Inconsistent data: {0}")]
    Inconsistent(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError::title_not_found("xyz").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_metadata_unavailable_maps_to_502() {
        let response = AppError::MetadataUnavailable("down".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_title_not_found_message() {
        let err = AppError::title_not_found("Blade Runner 3");
        assert_eq!(
            err.to_string(),
            "Movie 'Blade Runner 3' not found in dataset. Please try another title."
        );
    }

    #[test]
    fn test_parse_error_display() {
        let err = LoadError::Parse {
            path: PathBuf::from("movies.dat"),
            line: 7,
            reason: "expected 3 fields".to_string(),
        };
        assert_eq!(err.to_string(), "movies.dat:7: expected 3 fields");
    }
}
