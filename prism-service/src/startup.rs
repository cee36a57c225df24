//! Application startup and lifecycle management.
//!
//! Provider clients are built once here and injected into every handler
//! through `AppState`.

use crate::config::PrismConfig;
use crate::handlers;
use crate::services::providers::{GeminiConfig, GeminiTextProvider, MockTextProvider, TextProvider};
use crate::services::repositories::github::GithubClientConfig;
use crate::services::repositories::{GithubClient, MockRepositoryHost, RepositoryHost};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: PrismConfig,
    pub repository_host: Arc<dyn RepositoryHost>,
    pub text_provider: Arc<dyn TextProvider>,
}

impl AppState {
    /// Construct the real or mock providers according to configuration.
    pub fn from_config(config: PrismConfig) -> Result<Self, AppError> {
        if config.providers.use_mock {
            tracing::warn!("Mock providers enabled; no upstream calls will be made");
            return Ok(Self {
                config,
                repository_host: Arc::new(MockRepositoryHost::with_sample_data()),
                text_provider: Arc::new(MockTextProvider::new()),
            });
        }

        let timeout = Duration::from_secs(config.providers.timeout_secs);

        let repository_host: Arc<dyn RepositoryHost> = Arc::new(
            GithubClient::new(GithubClientConfig {
                api_base: config.github.api_base.clone(),
                token: config.github.token.clone(),
                timeout,
            })
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?,
        );
        tracing::info!(api_base = %config.github.api_base, "Initialized GitHub client");

        let text_provider: Arc<dyn TextProvider> = Arc::new(
            GeminiTextProvider::new(GeminiConfig {
                api_key: config.gemini.api_key.clone(),
                api_base: config.gemini.api_base.clone(),
                model: config.gemini.model.clone(),
                timeout,
            })
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?,
        );
        tracing::info!(model = %config.gemini.model, "Initialized Gemini text provider");

        Ok(Self {
            config,
            repository_host,
            text_provider,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    // The front-end is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/repositories", post(handlers::search_repositories))
        .route("/get_info", post(handlers::get_info))
        .route("/get_ai_recs", post(handlers::get_ai_recs))
        .route("/ai_chat", post(handlers::ai_chat))
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(cors)
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: PrismConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(config.clone())?;
        Self::with_state(config.common.port, state).await
    }

    /// Build around pre-constructed state (port 0 = random port for testing).
    pub async fn with_state(port: u16, state: AppState) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("prism-service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
