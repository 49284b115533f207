mod utils;

use std::time::Duration;

use tokio::time::timeout;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::http;
use crate::{ServiceConfig, ServiceState, StateSetupError};

const FINAL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);
const LOG_FILE_PREFIX: &str = "rollbook.log";

/// Install the global subscriber: compact stdout, plus a daily file when `log_dir` is set
///
/// The returned guards flush the non-blocking writers and must outlive the service.
pub fn init_logging(service_config: &ServiceConfig) -> Vec<WorkerGuard> {
    let mut guards = Vec::new();

    let env_filter = || {
        EnvFilter::builder()
            .with_default_directive(service_config.log_level.into())
            .from_env_lossy()
    };

    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    guards.push(stdout_guard);
    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stdout_writer)
        .with_filter(env_filter());

    let file_layer = service_config.log_dir.as_ref().map(|dir| {
        let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
        let (file_writer, file_guard) = tracing_appender::non_blocking(appender);
        guards.push(file_guard);
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_writer)
            .with_filter(env_filter())
    });

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .ok();

    guards
}

/// Run the sync service until SIGINT or SIGTERM
pub async fn spawn_service(service_config: &ServiceConfig) -> Result<(), ServiceError> {
    let _guards = init_logging(service_config);

    utils::register_panic_logger();
    utils::report_build_info();

    let (mut graceful_waiter, shutdown_rx) =
        utils::graceful_shutdown_blocker().map_err(ServiceError::Signals)?;

    let state = ServiceState::from_config(service_config).await.map_err(|e| {
        tracing::error!("error creating server state: {}", e);
        ServiceError::State(e)
    })?;

    let api_config = service_config.http_config();
    let mut api_handle = tokio::spawn(http::run_api(api_config, state, shutdown_rx));

    // the API is the only task, so it ending on its own ends the service
    let finished_early = tokio::select! {
        result = &mut api_handle => Some(result),
        _ = &mut graceful_waiter => None,
    };

    if let Some(result) = finished_early {
        graceful_waiter.abort();
        return match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                tracing::error!("API server error: {}", e);
                Err(ServiceError::Http(e))
            }
            Err(e) => {
                tracing::error!("API server task failed: {}", e);
                Err(ServiceError::Task(e))
            }
        };
    }

    match timeout(FINAL_SHUTDOWN_TIMEOUT, api_handle).await {
        Err(_) => {
            tracing::error!(
                "Failed to shut down within {} seconds",
                FINAL_SHUTDOWN_TIMEOUT.as_secs()
            );
            return Err(ServiceError::ShutdownTimeout);
        }
        Ok(Ok(Err(e))) => tracing::error!("API server error during shutdown: {}", e),
        Ok(Err(e)) => tracing::error!("API server task failed during shutdown: {}", e),
        Ok(Ok(Ok(()))) => {}
    }

    tracing::info!("service stopped");
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("failed to install signal handlers: {0}")]
    Signals(std::io::Error),
    #[error("failed to set up service state: {0}")]
    State(#[from] StateSetupError),
    #[error("API server failed: {0}")]
    Http(#[from] http::HttpServerError),
    #[error("API server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("service did not shut down within the grace period")]
    ShutdownTimeout,
}
