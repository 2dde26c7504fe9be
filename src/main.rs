use git_webhook_sync::api::{WebhookHandler, create_router};
use git_webhook_sync::error::{ConfigError, Result};
use git_webhook_sync::logging::{FileLogger, setup_logging};
use git_webhook_sync::secret::{EnvSecret, SecretProvider};
use git_webhook_sync::sync::{ProcessLauncher, ShellLauncher};
use git_webhook_sync::ServerConfig;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let config = match ServerConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let file_logger = config.log_dir.clone().map(FileLogger::new);
    let _log_guard = match setup_logging(file_logger.as_ref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(config: ServerConfig) -> Result<()> {
    let secrets: Arc<dyn SecretProvider> = Arc::new(EnvSecret::default());
    let launcher: Arc<dyn ProcessLauncher> = Arc::new(ShellLauncher::new());

    let handlers: Vec<Arc<WebhookHandler>> = config
        .routes
        .iter()
        .map(|route| {
            info!(
                "Route {} -> '{}' (branch {})",
                route.path,
                route.working_dir.display(),
                route.tracked_ref
            );
            Arc::new(WebhookHandler::new(
                route.clone(),
                Arc::clone(&secrets),
                Arc::clone(&launcher),
            ))
        })
        .collect();

    if secrets.secret().is_none() {
        info!("WEBHOOK_SECRET not set; requests are accepted unsigned until it is");
    }

    let app = create_router(handlers);

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .map_err(|e| ConfigError::Bind {
            address: config.bind_address.to_string(),
            source: e,
        })?;
    info!("Listening on {}", config.bind_address);
    axum::serve(listener, app).await?;
    Ok(())
}
