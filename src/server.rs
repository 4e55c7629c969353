use std::{net::SocketAddr, path::Path};

use anyhow::Context;
use axum::{http::HeaderName, middleware, routing::get, Router};
use derivative::Derivative;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    decompression::RequestDecompressionLayer,
    sensitive_headers::SetSensitiveRequestHeadersLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ErrorVerbosity,
    middleware::{
        method_not_allowed::method_not_allowed, not_found::not_found, trace_headers::trace_headers,
        trace_response_body::trace_response_body,
    },
    openapi::{self, OPENAPI_JSON_PATH},
    route,
    state::ApiState,
    store::BookStore,
    traits::ApiKeyProvider,
    utils::mask_fmt,
};

pub const DEFAULT_API_KEY_HEADER_NAME: &str = "X-API-Token";

fn default_api_key_header_name() -> String {
    DEFAULT_API_KEY_HEADER_NAME.to_string()
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Derivative, Deserialize)]
#[derivative(Debug)]
pub struct ServerConfig {
    pub socket_address: SocketAddr,
    #[serde(default)]
    pub error_verbosity: ErrorVerbosity,
    /// Header carrying the shared secret on mutating requests.
    #[serde(default = "default_api_key_header_name")]
    pub api_key_header_name: String,
    /// The shared secret.
    #[derivative(Debug(format_with = "mask_fmt"))]
    pub api_key: String,
    /// E.g. `sqlite://books.db?mode=rwc` or `sqlite::memory:`.
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl ServerConfig {
    pub async fn from_config_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: ServerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }
}

pub struct Server {
    config: ServerConfig,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Opens the store, creating the schema if needed, and serves until a shutdown signal arrives.
    pub async fn run(self) -> anyhow::Result<()> {
        let ServerConfig {
            socket_address,
            error_verbosity,
            api_key_header_name,
            api_key,
            database_url,
            max_connections,
        } = self.config;

        anyhow::ensure!(!api_key.is_empty(), "API key must not be empty");

        let api_key_header_name = HeaderName::try_from(api_key_header_name.as_str())
            .with_context(|| format!("Invalid API key header name: {api_key_header_name}"))?;

        let store = BookStore::connect(&database_url, max_connections)
            .await
            .context("Failed to open book store")?;

        let state = ApiState::new(error_verbosity, api_key_header_name, api_key, store);

        let app = app(state);

        tracing::info!(addr = %socket_address, "Starting server");

        let listener = TcpListener::bind(&socket_address)
            .await
            .context("Bind failed")?;

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

        Ok(())
    }
}

/// Builds the complete application: book routes, API docs and the middleware stack.
pub fn app(state: ApiState) -> Router {
    let openapi = openapi::openapi(state.header_name());
    let api_key_header_name = state.header_name().clone();

    Router::new()
        .route("/", get(route::root::root))
        .merge(route::books::app::app())
        .merge(SwaggerUi::new("/docs").url(OPENAPI_JSON_PATH, openapi.clone()))
        .merge(Redoc::with_url("/redoc", openapi))
        .merge(RapiDoc::new(OPENAPI_JSON_PATH).path("/rapidoc"))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            method_not_allowed,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            trace_response_body,
        ))
        .layer(middleware::from_fn(trace_headers))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                // Header values marked sensitive print as `Sensitive` in every log below.
                .layer(SetSensitiveRequestHeadersLayer::new(std::iter::once(
                    api_key_header_name,
                )))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                        .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                        .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
                )
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");

        tracing::info!("CTRL+C received");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;

        tracing::info!("SIGTERM received");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
}
