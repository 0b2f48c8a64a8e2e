//! HTTP API module
//!
//! This module contains the widget page, the action endpoints and the event
//! stream the page listens to.

pub mod handlers;
pub mod page;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(page_handler))
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/resume", post(resume_handler))
        .route("/rest", post(rest_handler))
        .route("/reset", post(reset_handler))
        .route("/title", put(title_handler))
        .route("/status", get(status_handler))
        .route("/events", get(events_handler))
        .route("/sounds/start.wav", get(start_sound_handler))
        .route("/sounds/finish.wav", get(finish_sound_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
