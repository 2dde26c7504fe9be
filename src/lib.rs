pub mod api;
pub mod error;
pub mod logging;
pub mod secret;
pub mod signature;
pub mod sync;
pub mod webhook;

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::webhook::BRANCH_REF_PREFIX;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.2:9000";

/// One webhook endpoint: requests on `path` keep `working_dir` in sync with `tracked_ref`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    pub path: String,
    pub working_dir: PathBuf,
    pub tracked_ref: String,
}

impl RouteConfig {
    pub fn new(
        path: impl Into<String>,
        working_dir: impl Into<PathBuf>,
        tracked_ref: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            working_dir: working_dir.into(),
            tracked_ref: tracked_ref.into(),
        }
    }

    /// The full ref a push must name, e.g. `refs/heads/master`.
    pub fn tracked_ref_name(&self) -> String {
        format!("{}{}", BRANCH_REF_PREFIX, self.tracked_ref)
    }
}

/// The two sites this listener serves.
pub fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::new("/_webhook/homepage", "/var/www/homepage", "gh-pages"),
        RouteConfig::new("/_webhook/static", "/var/www/static", "master"),
    ]
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub routes: Vec<RouteConfig>,
    pub log_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Hardcoded routes; `BIND_ADDRESS` and `LOG_DIR` may come from the environment.
    pub fn from_env() -> Result<Self> {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
        let log_dir = std::env::var_os("LOG_DIR")
            .filter(|d| !d.is_empty())
            .map(PathBuf::from);
        Self::build(&bind_address, log_dir)
    }

    fn build(bind_address: &str, log_dir: Option<PathBuf>) -> Result<Self> {
        let bind_address: SocketAddr =
            bind_address
                .parse()
                .map_err(|e: AddrParseError| ConfigError::InvalidBindAddress {
                    address: bind_address.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            bind_address,
            routes: default_routes(),
            log_dir,
        })
    }
}
