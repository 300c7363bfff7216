//! Unified error handling for the HTTP facade.
//!
//! Route handlers return `Result<T, AppError>`. Upstream and persistence
//! failures collapse into a generic 500 body; the underlying cause is logged
//! and captured to Sentry, never echoed to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::pending::PendingError;
use crate::registry::RegistryError;
use crate::steam::SteamError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Steam Web API operation failed.
    #[error("Steam error: {0}")]
    Steam(#[from] SteamError),

    /// Registry file write failed.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A confirmation token could not be generated.
    #[error("Pending confirmation error: {0}")]
    Pending(#[from] PendingError),

    /// No Steam account matches the supplied vanity name or id.
    #[error("{0}")]
    UnknownPlayer(String),

    /// Confirmation token is unknown or has expired.
    #[error("Confirmation url expired")]
    ConfirmationExpired,

    /// Player deletion is disabled by configuration.
    #[error("Player deletion is disabled")]
    DeletionDisabled,
}

/// JSON error body sent to the client.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Steam(_) | Self::Registry(_) | Self::Pending(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Steam(_) | Self::Registry(_) | Self::Pending(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::UnknownPlayer(_) => StatusCode::BAD_REQUEST,
            Self::ConfirmationExpired => StatusCode::GONE,
            Self::DeletionDisabled => StatusCode::FORBIDDEN,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Steam(_) | Self::Registry(_) | Self::Pending(_) => "Server error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
