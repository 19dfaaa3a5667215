// HTTP request handlers
use crate::application::view_service::ViewEvent;
use crate::domain::view::{Size, ViewSnapshot};
use crate::infrastructure::frame_stream::frame_event_stream;
use crate::infrastructure::http_response::{accepts_brotli, svg_response};
use crate::presentation::app_state::AppState;
use crate::presentation::page::INDEX_HTML;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct PointerQuery {
    pub x: f64,
    pub y: f64,
}

#[derive(Deserialize)]
pub struct ResizeQuery {
    pub width: u32,
    pub height: u32,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Latest rendered frame
pub async fn chart_svg(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let frame = state.view.current_frame();
    match svg_response(&frame.svg, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Every frame from now on, as Server-Sent Events
pub async fn chart_stream(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    frame_event_stream(state.view.subscribe())
}

pub async fn view_state(State(state): State<Arc<AppState>>) -> Result<Json<ViewSnapshot>, StatusCode> {
    state.view.snapshot().await.map(Json).map_err(|e| {
        tracing::error!("Error reading view state: {:#}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })
}

pub async fn pointer_move(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PointerQuery>,
) -> StatusCode {
    accept(&state, ViewEvent::PointerMove { x: query.x, y: query.y }).await
}

pub async fn pointer_leave(State(state): State<Arc<AppState>>) -> StatusCode {
    accept(&state, ViewEvent::PointerLeave).await
}

pub async fn resize(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResizeQuery>,
) -> StatusCode {
    accept(&state, ViewEvent::Resize(Size::new(query.width, query.height))).await
}

async fn accept(state: &AppState, event: ViewEvent) -> StatusCode {
    match state.view.dispatch(event).await {
        Ok(()) => StatusCode::ACCEPTED,
        Err(e) => {
            tracing::error!("Error dispatching view event: {:#}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
