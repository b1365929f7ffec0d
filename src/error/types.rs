/**
 * Server Error Types
 *
 * This module defines the error taxonomy for the server. Each variant
 * carries the context needed to produce an HTTP response, and the
 * realtime gateway reuses the same variants when reporting failures to
 * a connected session.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::cache::FastStoreError;

/// Server error taxonomy
///
/// # Usage
///
/// ```rust,ignore
/// use sketchsync::error::AppError;
///
/// // Authentication failure on a connection with no token
/// let err = AppError::MissingToken;
///
/// // Permission failure reported only to the offending caller
/// let err = AppError::permission_denied("no write access to document");
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// No bearer token was supplied with the request or handshake
    #[error("missing authentication token")]
    MissingToken,

    /// The supplied token failed signature or claims validation
    #[error("invalid authentication token")]
    InvalidToken,

    /// The token verified but does not carry a usable subject claim
    #[error("authentication token has no subject")]
    IncompleteToken,

    /// The caller is authenticated but not allowed to perform the action
    #[error("permission denied: {message}")]
    PermissionDenied {
        /// Human-readable reason, safe to show to the caller
        message: String,
    },

    /// A referenced entity does not exist
    #[error("{resource} not found")]
    NotFound {
        /// Name of the missing entity kind (e.g. "document", "user")
        resource: String,
    },

    /// Document store failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Fast store failure outside the rate limiter's fail-open scope
    #[error(transparent)]
    FastStore(#[from] FastStoreError),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Create a new permission-denied error
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create a new not-found error for the given resource kind
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `MissingToken` / `InvalidToken` / `IncompleteToken` - 401 Unauthorized
    /// - `PermissionDenied` - 403 Forbidden
    /// - `NotFound` - 404 Not Found
    /// - `Database` - 404 for row-not-found, 500 otherwise
    /// - `FastStore` / `Serialization` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingToken | Self::InvalidToken | Self::IncompleteToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::PermissionDenied { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::FastStore(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message shown to the caller
    ///
    /// Dependency errors are reported generically so internal details
    /// never reach the client; the full error is logged server-side.
    pub fn message(&self) -> String {
        match self {
            Self::Database(sqlx::Error::RowNotFound) => "not found".to_string(),
            Self::Database(_) => "internal error".to_string(),
            Self::FastStore(_) => "internal error".to_string(),
            Self::Serialization(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}
