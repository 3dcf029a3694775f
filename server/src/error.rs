//! Error types for the Lingus server.

use crate::api::ErrorBody;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lingus_embedding::EmbeddingError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while serving word-embedding requests.
#[derive(Debug, Error)]
pub enum LingusError {
    #[error("There is no Word2Vec model loaded at the present time.")]
    NoModelLoaded,

    #[error("The term '{0}' is not recognized by the current model.")]
    UnknownTerm(String),

    #[error("The requested model '{0}' is not available.")]
    UnavailableModel(String),

    #[error("Unable to load Word2Vec model from file '{}': {source}", .location.display())]
    UnableToActivateModel {
        location: PathBuf,
        #[source]
        source: EmbeddingError,
    },

    #[error("The model location at '{}' cannot be listed: {source}", .path.display())]
    ModelDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Internal(String),
}

/// Translate an error into the HTTP status and message reported to clients.
///
/// This is the only place where domain failures turn into status codes.
pub fn map_error(err: &LingusError) -> (StatusCode, String) {
    let status = match err {
        LingusError::NoModelLoaded => StatusCode::CONFLICT,
        LingusError::UnknownTerm(_) => StatusCode::NOT_FOUND,
        LingusError::UnavailableModel(_) => StatusCode::NOT_FOUND,
        LingusError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        LingusError::UnableToActivateModel { .. }
        | LingusError::ModelDirectory { .. }
        | LingusError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

impl IntoResponse for LingusError {
    fn into_response(self) -> Response {
        let (status, message) = map_error(&self);
        if status.is_server_error() {
            tracing::error!("Request failed: {}", message);
        } else {
            tracing::debug!("Request rejected ({}): {}", status.as_u16(), message);
        }
        (status, Json(ErrorBody::new(message, status))).into_response()
    }
}

/// Result type alias for server operations.
pub type LingusResult<T> = Result<T, LingusError>;
