use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use leaselens_common::Config;
use leaselens_engine::Engine;

mod rest;

/// Five photos at a few megabytes each, plus form fields.
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

pub struct AppState {
    pub engine: Engine,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("leaselens_engine=info".parse()?)
                .add_directive("leaselens_api=info".parse()?),
        )
        .init();

    let config = Config::from_env();
    let engine = Engine::from_config(&config);

    let state = Arc::new(AppState { engine });

    let app = Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // Analysis endpoint
        .route("/analyze", post(rest::api_analyze))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path only, no form contents
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("LeaseLens API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
