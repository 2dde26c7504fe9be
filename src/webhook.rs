//! Webhook related structures

use serde::Deserialize;
use serde_json::{Map, Value};

pub const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// The part of a push event this service cares about.
/// Every other field in the delivery is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookPayload {
    pub git_ref: String,
}

impl WebhookPayload {
    /// Parse a raw request body, which must be a JSON object (or `null`, read as empty).
    /// A missing or `null` ref is empty; with repeated keys the last one wins.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let fields: Option<Map<String, Value>> = serde_json::from_slice(body)?;
        let git_ref = match fields.as_ref().and_then(|f| f.get("ref")) {
            None | Some(Value::Null) => String::new(),
            Some(value) => String::deserialize(value)?,
        };
        Ok(Self { git_ref })
    }

    /// Returns true if the ref is exactly `refs/heads/<branch>`.
    pub fn targets(&self, branch: &str) -> bool {
        self.git_ref
            .strip_prefix(BRANCH_REF_PREFIX)
            .is_some_and(|name| name == branch)
    }
}
