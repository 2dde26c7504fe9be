use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::io;

use crate::signature::SignatureError;

/// Rejections produced while handling a webhook delivery.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Method not allowed")]
    Forbidden,

    #[error("Request body could not be read")]
    UnreadableBody,

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Webhook failed: {0}")]
    LaunchFailed(#[from] LaunchError),
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::Forbidden | WebhookError::Signature(_) => StatusCode::FORBIDDEN,
            WebhookError::UnreadableBody | WebhookError::InvalidJson(_) => {
                StatusCode::BAD_REQUEST
            }
            WebhookError::LaunchFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text sent back to the webhook sender. Transport errors carry no body.
    pub fn body(&self) -> &'static str {
        match self {
            WebhookError::Forbidden | WebhookError::UnreadableBody => "",
            WebhookError::Signature(SignatureError::Missing) => "Missing signature\n",
            WebhookError::Signature(SignatureError::Invalid) => "Invalid signature\n",
            WebhookError::Signature(SignatureError::Mismatch) => "Bad signature\n",
            WebhookError::InvalidJson(_) => "Invalid JSON\n",
            WebhookError::LaunchFailed(_) => "Webhook failed\n",
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (self.status(), self.body()).into_response()
    }
}

/// Failure to start the sync process. What the process does afterwards is not reported here.
#[derive(Debug, thiserror::Error)]
#[error("Failed to launch `{program}` in '{working_dir}': {source}")]
pub struct LaunchError {
    pub program: String,
    pub working_dir: String,
    #[source]
    pub source: io::Error,
}

/// Startup errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid bind address '{address}': {message}")]
    InvalidBindAddress { address: String, message: String },

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Helper type for startup Results that use ConfigError
pub type Result<T> = std::result::Result<T, ConfigError>;
