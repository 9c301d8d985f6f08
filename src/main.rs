//! notify-gateway server entry point.
//!
//! Starts the Axum HTTP server with the REST and WebSocket endpoints.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use notify_gateway::api;
use notify_gateway::app_state::AppState;
use notify_gateway::config::NotifyConfig;
use notify_gateway::domain::EventBus;
use notify_gateway::service::NotifyService;
use notify_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = NotifyConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting notify-gateway");

    // Build domain and service layers
    let event_bus = EventBus::new(config.event_bus_capacity);
    let notify_service = Arc::new(NotifyService::new(event_bus.clone()));

    // Build application state
    let app_state = AppState {
        notify_service,
        event_bus,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
