//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Router configuration with all API endpoints
//! - Middleware stack (logging, compression, CORS, timeouts)
//! - Graceful shutdown handling

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::middleware::{log_requests, request_id};
use crate::routes::{api_info, health, not_found, recommend};
use crate::state::ServerState;
use crate::telemetry;
use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::{BoxError, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::timeout::error::Elapsed;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
///
/// Middleware runs outermost first: tracing, request ID, request logging,
/// CORS, compression, timeout, then the body limit on the handlers.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let probes = Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics));

    let api = Router::new()
        .route("/predict", post(recommend::recommend))
        .route("/api/v1/recommend", post(recommend::recommend))
        .route("/api/v1/model", get(health::model_info))
        .layer(DefaultBodyLimit::max(state.config.max_body_size()));

    let routes = Router::new()
        .merge(probes)
        .merge(api)
        .fallback(not_found);

    with_request_timeout(routes, state.config.timeout())
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bound handler time; late requests get 408 in the standard error envelope.
pub fn with_request_timeout<S>(router: Router<S>, timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_timeout))
            .layer(TimeoutLayer::new(timeout)),
    )
}

async fn handle_timeout(err: BoxError) -> ServerError {
    if err.is::<Elapsed>() {
        ServerError::Timeout
    } else {
        ServerError::Internal(format!("unhandled middleware error: {err}"))
    }
}

/// Start the trackrec HTTP server
///
/// Loads the model artifacts named in `config`, then serves until SIGTERM
/// or Ctrl+C. A model that fails to load leaves the server running with
/// `/ready` and the recommendation endpoints answering 503.
///
/// # Example
///
/// ```rust,no_run
/// use server::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     server::start_server(config).await?;
///     Ok(())
/// }
/// ```
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .init();

    // Artifact decoding and the HNSW build are CPU bound.
    let load_config = config.clone();
    let mut state = tokio::task::spawn_blocking(move || ServerState::new(load_config)).await?;
    if config.metrics_enabled {
        state = state.with_metrics(telemetry::install()?);
    }
    let available = state.recommender.is_available();

    let app = build_router(Arc::new(state));
    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(%addr, model_ready = available, "Starting trackrec server");
    tracing::info!(
        "Timeout: {}s, Max body: {}MB, default k: {}",
        config.timeout_secs,
        config.max_body_size_mb,
        config.recommender.result_count
    );
    tracing::info!(
        "CORS: {}, Metrics: {}",
        config.enable_cors,
        config.metrics_enabled
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
