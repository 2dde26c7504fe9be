//! HTTP surface: one webhook endpoint per configured route

pub mod webhook;

use axum::{Router, extract::DefaultBodyLimit, routing};
use std::sync::Arc;

pub use webhook::{Ack, WebhookHandler, handle_webhook};

/// Push deliveries are capped at 25 MB by the sender.
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Mounts every handler on its route's path. Routes accept any method so that
/// non-POST requests get the handler's 403 rather than a 405.
pub fn create_router(handlers: impl IntoIterator<Item = Arc<WebhookHandler>>) -> Router {
    handlers
        .into_iter()
        .fold(Router::new(), |router, handler| {
            let path = handler.route().path.clone();
            router.route(&path, routing::any(handle_webhook).with_state(handler))
        })
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
