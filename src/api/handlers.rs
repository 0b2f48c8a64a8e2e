//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    http::header,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::{
    audio::Cue,
    error::ShellError,
    state::AppState,
    view::WidgetView,
};
use super::page::PAGE;
use super::responses::{ApiResponse, HealthResponse, StatusResponse, TitleRequest};

/// Handle GET / - Serve the widget page
pub async fn page_handler() -> Html<&'static str> {
    Html(PAGE)
}

/// Handle POST /start - Begin a working phase
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ShellError> {
    let session = state.start()?;
    info!("Start endpoint called - working for {}s", session.remaining_seconds);
    Ok(Json(ApiResponse::new("Pomodoro started".to_string(), &session)))
}

/// Handle POST /pause - Freeze the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ShellError> {
    let session = state.pause()?;
    info!("Pause endpoint called - {}s left", session.remaining_seconds);
    Ok(Json(ApiResponse::new("Countdown paused".to_string(), &session)))
}

/// Handle POST /resume - Continue the countdown
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ShellError> {
    let session = state.resume()?;
    info!("Resume endpoint called - {}s left", session.remaining_seconds);
    Ok(Json(ApiResponse::new("Countdown resumed".to_string(), &session)))
}

/// Handle POST /rest - Take a short rest now
pub async fn rest_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ShellError> {
    let session = state.rest()?;
    info!("Rest endpoint called - resting for {}s", session.remaining_seconds);
    Ok(Json(ApiResponse::new("Short rest started".to_string(), &session)))
}

/// Handle POST /reset - Abandon the session
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ShellError> {
    let session = state.reset()?;
    info!("Reset endpoint called - session back to idle");
    Ok(Json(ApiResponse::new("Session reset".to_string(), &session)))
}

/// Handle PUT /title - Set the activity title
pub async fn title_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TitleRequest>,
) -> Result<Json<ApiResponse>, ShellError> {
    let session = state.set_title(request.title)?;
    Ok(Json(ApiResponse::new("Activity title updated".to_string(), &session)))
}

/// Handle GET /status - Return the rendered widget and raw session
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, ShellError> {
    let session = state.get_session()?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        view: WidgetView::render(&session),
        session,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream snapshots and cues to the page
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("Page connected to event stream");
    let events_rx = state.subscribe_events();

    let stream = stream::unfold(events_rx, |mut events_rx| async move {
        loop {
            match events_rx.recv().await {
                Ok(shell_event) => {
                    let event = Event::default()
                        .event(shell_event.kind())
                        .json_data(&shell_event)
                        .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()));
                    return Some((Ok(event), events_rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle GET /sounds/start.wav
pub async fn start_sound_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    wav(state.sounds.get(Cue::WorkStart).to_vec())
}

/// Handle GET /sounds/finish.wav
pub async fn finish_sound_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    wav(state.sounds.get(Cue::PhaseEnd).to_vec())
}

fn wav(bytes: Vec<u8>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "audio/wav"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        bytes,
    )
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
