//! Webhook handler for push events

use axum::{
    body::Bytes,
    extract::{State as AxumState, rejection::BytesRejection},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::RouteConfig;
use crate::error::WebhookError;
use crate::secret::SecretProvider;
use crate::signature::{SIGNATURE_HEADER, verify_signature};
use crate::sync::{LaunchHandle, ProcessLauncher, SyncCommand};
use crate::webhook::WebhookPayload;

/// Successful outcomes; both answer 200.
#[derive(Debug)]
pub enum Ack {
    /// The sync was launched. It may still be running.
    Synced(LaunchHandle),
    /// The push was for some other ref.
    Ignored,
}

impl IntoResponse for Ack {
    fn into_response(self) -> Response {
        match self {
            Ack::Synced(_) => (StatusCode::OK, "OK\n").into_response(),
            Ack::Ignored => (StatusCode::OK, "Not interested in this ref\n").into_response(),
        }
    }
}

/// Handles deliveries for a single route. Each route gets its own instance.
pub struct WebhookHandler {
    route: RouteConfig,
    command: SyncCommand,
    secrets: Arc<dyn SecretProvider>,
    launcher: Arc<dyn ProcessLauncher>,
}

impl WebhookHandler {
    pub fn new(
        route: RouteConfig,
        secrets: Arc<dyn SecretProvider>,
        launcher: Arc<dyn ProcessLauncher>,
    ) -> Self {
        let command = SyncCommand::for_ref(&route.tracked_ref);
        Self {
            route,
            command,
            secrets,
            launcher,
        }
    }

    pub fn route(&self) -> &RouteConfig {
        &self.route
    }

    /// Runs one delivery through method, body, signature, payload and ref checks,
    /// launching the sync when the ref matches.
    pub fn handle(
        &self,
        method: &Method,
        headers: &HeaderMap,
        body: Result<Bytes, BytesRejection>,
    ) -> Result<Ack, WebhookError> {
        if *method != Method::POST {
            return Err(WebhookError::Forbidden);
        }

        let body = body.map_err(|e| {
            debug!("Could not read request body: {}", e);
            WebhookError::UnreadableBody
        })?;

        // Looked up per request so a changed secret applies immediately
        if let Some(secret) = self.secrets.secret() {
            let signature = headers.get(SIGNATURE_HEADER).map(|v| v.as_bytes());
            verify_signature(secret.as_bytes(), &body, signature)?;
        }

        let payload = WebhookPayload::from_slice(&body)?;

        if !payload.targets(&self.route.tracked_ref) {
            info!(
                "{}: ignoring push to {:?}, tracking '{}'",
                self.route.path,
                payload.git_ref,
                self.route.tracked_ref_name()
            );
            return Ok(Ack::Ignored);
        }

        let handle = self.launcher.launch(&self.route.working_dir, &self.command)?;
        info!(
            "{}: started sync {} (pid {:?}) of '{}' in '{}'",
            self.route.path,
            handle.id,
            handle.pid,
            self.route.tracked_ref,
            self.route.working_dir.display()
        );
        Ok(Ack::Synced(handle))
    }
}

/// Axum entry point; mounted once per route with that route's handler as state.
pub async fn handle_webhook(
    AxumState(handler): AxumState<Arc<WebhookHandler>>,
    method: Method,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match handler.handle(&method, &headers, body) {
        Ok(ack) => ack.into_response(),
        Err(e) => {
            match &e {
                WebhookError::LaunchFailed(_) => {
                    error!("{}: {}", handler.route().path, e)
                }
                WebhookError::Forbidden => {
                    warn!("{}: rejected {} request", handler.route().path, method)
                }
                _ => warn!("{}: {}", handler.route().path, e),
            }
            e.into_response()
        }
    }
}
