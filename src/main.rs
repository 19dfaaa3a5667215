// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{routing::{get, post}, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::loader_service::DataLoader;
use crate::application::view_service::ViewService;
use crate::domain::view::Size;
use crate::infrastructure::coindesk_repository::CoindeskRepository;
use crate::infrastructure::config::load_app_config;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    chart_stream, chart_svg, health_check, index, pointer_leave, pointer_move, resize, view_state,
};
use crate::presentation::renderer::ChartRenderer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bpi_year_compare=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Start the view (presentation + application layers)
    let initial_size = Size::new(config.view.width, config.view.height);
    let view = ViewService::spawn(initial_size, Arc::new(ChartRenderer::new()))?;

    // Load both years once, in the background
    let repository = Arc::new(CoindeskRepository::new(config.coindesk.endpoint));
    DataLoader::new(repository, view.clone()).spawn();

    let state = Arc::new(AppState { view });

    let router = Router::new()
        .route("/", get(index))
        .route("/healthz", get(health_check))
        .route("/chart.svg", get(chart_svg))
        .route("/chart/stream", get(chart_stream))
        .route("/state", get(view_state))
        .route("/events/pointer", post(pointer_move))
        .route("/events/leave", post(pointer_leave))
        .route("/events/resize", post(resize))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting bpi-year-compare on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
