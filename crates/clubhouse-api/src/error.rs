//! Error type shared by every handler.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clubhouse_types::api::ErrorBody;
use clubhouse_types::validation::{already_exists, field_messages};
use clubhouse_upstream::UpstreamError;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    /// The caller's email is not an active allow-list entry.
    #[error("User email not found in allowed emails. Something went wrong.")]
    NotProvisioned,

    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    #[error("Not found")]
    NotFound,

    #[error("File too large")]
    PayloadTooLarge,

    /// The hosted backend answered, but not with success.
    #[error("{0}")]
    Upstream(String),

    #[error("{message}")]
    Internal {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// A failure whose detail stays in the log; the client only sees `message`.
    pub fn internal(message: &'static str, err: impl Into<anyhow::Error>) -> Self {
        Self::Internal {
            message,
            source: err.into(),
        }
    }

    /// Map a gateway error. Configuration and status failures keep their own
    /// message; transport failures are reported as `fallback`.
    pub fn upstream(err: UpstreamError, fallback: &'static str) -> Self {
        match err {
            UpstreamError::NotAnImage => Self::BadRequest(err.to_string()),
            UpstreamError::NotConfigured
            | UpstreamError::QueryFailed { .. }
            | UpstreamError::UploadFailed { .. } => Self::Upstream(err.to_string()),
            UpstreamError::Transport(e) => Self::internal(fallback, e),
        }
    }

    /// Turn a unique-email violation into a field error on `email`.
    pub fn unique_email(err: anyhow::Error, entity: &str) -> Self {
        if clubhouse_db::is_constraint_violation(&err) {
            let mut errors = ValidationErrors::new();
            errors.add("email", already_exists(entity));
            Self::Validation(errors)
        } else {
            Self::from(err)
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::NotProvisioned | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Upstream(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("Internal server error", err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            match &self {
                Self::Internal { message, source } => error!("{}: {:#}", message, source),
                other => error!("{}", other),
            }
        }

        match self {
            Self::Validation(errors) => (status, Json(field_messages(&errors))).into_response(),
            other => (
                status,
                Json(ErrorBody {
                    error: other.to_string(),
                }),
            )
                .into_response(),
        }
    }
}
