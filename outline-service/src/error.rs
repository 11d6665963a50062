//! Gateway failures and their caller-visible responses.

use crate::models::ErrorEnvelope;
use crate::services::providers::ProviderError;
use axum::{
    extract::rejection::BytesRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

pub const MISSING_CREDENTIAL_MESSAGE: &str =
    "API key is not configured on the server. Please contact the site administrator.";

pub const UNKNOWN_UPSTREAM_ERROR_MESSAGE: &str = "An unknown API error occurred.";

/// Terminal outcome of a failed outline request. None is retried.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Method Not Allowed")]
    InvalidMethod,

    #[error("{0}")]
    InvalidBody(String),

    /// The body could not be buffered, e.g. it exceeds the size limit.
    #[error("{message}")]
    UnreadableBody { status: StatusCode, message: String },

    #[error("{}", MISSING_CREDENTIAL_MESSAGE)]
    MissingCredential,

    #[error("{message}")]
    UpstreamFailure { status: StatusCode, message: String },

    #[error("{0}")]
    LocalFault(#[from] anyhow::Error),
}

impl From<ProviderError> for GatewayError {
    fn from(err: ProviderError) -> Self {
        GatewayError::LocalFault(anyhow::Error::new(err))
    }
}

impl From<BytesRejection> for GatewayError {
    fn from(rejection: BytesRejection) -> Self {
        GatewayError::UnreadableBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidMethod => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            GatewayError::MissingCredential | GatewayError::LocalFault(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::UnreadableBody { status, .. }
            | GatewayError::UpstreamFailure { status, .. } => *status,
        }
    }

    /// Metric label.
    pub fn outcome(&self) -> &'static str {
        match self {
            GatewayError::InvalidMethod => "invalid_method",
            GatewayError::InvalidBody(_) => "invalid_body",
            GatewayError::UnreadableBody { .. } => "unreadable_body",
            GatewayError::MissingCredential => "missing_credential",
            GatewayError::UpstreamFailure { .. } => "upstream_failure",
            GatewayError::LocalFault(_) => "local_fault",
        }
    }

    /// Client faults at `warn`, server and upstream faults at `error`.
    pub fn log(&self) {
        match self {
            GatewayError::InvalidMethod
            | GatewayError::InvalidBody(_)
            | GatewayError::UnreadableBody { .. } => {
                tracing::warn!(error = %self, status = self.status().as_u16(), "Rejected outline request");
            }
            GatewayError::MissingCredential => {
                tracing::error!("Gemini API key not configured; refusing outline request");
            }
            GatewayError::UpstreamFailure { status, message } => {
                tracing::error!(status = status.as_u16(), message = %message, "Gemini API error");
            }
            GatewayError::LocalFault(err) => {
                tracing::error!(error = ?err, "Outline request failed");
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            GatewayError::InvalidMethod => (
                status,
                [(header::ALLOW, "POST")],
                "Method Not Allowed",
            )
                .into_response(),
            other => (status, Json(ErrorEnvelope::new(other.to_string()))).into_response(),
        }
    }
}
