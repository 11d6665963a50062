//! Application startup and lifecycle management.

use crate::config::{CorsSettings, Settings};
use crate::handlers::{
    health::{health_check, readiness_check},
    metrics::metrics,
    outline::get_outline,
};
use crate::services::providers::gemini::{GeminiClient, GeminiConfig};
use crate::services::providers::GenerationClient;
use crate::services::{OutlineGateway, PromptTemplate};
use crate::AppState;
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{any, get},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    security_headers::security_headers_middleware,
    tracing::{http_request_span, request_id_middleware},
};
use service_core::observability::REQUEST_ID_HEADER;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Netlify function path that existing browser clients post to.
pub const LEGACY_FUNCTION_PATH: &str = "/.netlify/functions/get-outline";

pub fn build_router(state: AppState, cors: &CorsSettings) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics))
        .route("/api/outline", any(get_outline))
        .route(LEGACY_FUNCTION_PATH, any(get_outline))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| http_request_span(request),
        ))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors_layer(cors))
        .with_state(state)
}

fn cors_layer(cors: &CorsSettings) -> CorsLayer {
    let allow_origin = if cors.allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(cors.allowed_origins.iter().filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| tracing::error!("Invalid CORS origin '{}': {}. Skipping.", origin, e))
                .ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

/// Build the gateway from settings and the upstream client.
pub fn build_state(settings: &Settings, client: Arc<dyn GenerationClient>) -> AppState {
    let credential = settings.gemini.credential();
    if credential.is_none() {
        tracing::warn!("Gemini API key not configured - outline requests will fail");
    }

    AppState::new(OutlineGateway::new(
        credential,
        PromptTemplate::from(&settings.pricing),
        settings.gemini.generation_mode,
        client,
    ))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(settings: Settings) -> Result<Self, AppError> {
        let client: Arc<dyn GenerationClient> = Arc::new(GeminiClient::new(GeminiConfig {
            api_base: settings.gemini.api_base.clone(),
            model: settings.gemini.model.clone(),
        }));

        tracing::info!(
            model = %settings.gemini.model,
            mode = ?settings.gemini.generation_mode,
            "Initialized Gemini client"
        );

        let state = build_state(&settings, client);
        let router = build_router(state, &settings.cors);

        // Port 0 = random port for testing
        let address = format!("{}:{}", settings.server.host, settings.server.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Outline service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
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
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
