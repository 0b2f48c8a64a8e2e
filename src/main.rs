//! Pomodoro Widget - A Pomodoro timer served to the browser
//!
//! This is the main entry point for the pomodoro-widget application.

use std::sync::Arc;
use tokio::{net::TcpListener, sync::broadcast};
use tracing::info;

use pomodoro_widget::{
    audio::{BroadcastCuePlayer, CueFanout, TerminalBell},
    config::Config,
    state::AppState,
    api::create_router,
    tasks::countdown_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_widget={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomodoro-widget v{}", env!("CARGO_PKG_VERSION"));

    let timer = config.timer_config();
    info!("Configuration: host={}, port={}, pomodoro={}s, short rest={}s, long rest={}s, cycles={}",
          config.host, config.port, timer.pomodoro_time, timer.short_rest_time,
          timer.long_rest_time, timer.cycles);

    // Cues go to connected pages, and to the terminal bell if asked
    let (events_tx, _) = broadcast::channel(64);
    let mut cues = CueFanout::new().with(BroadcastCuePlayer::new(events_tx.clone()));
    if config.bell {
        cues = cues.with(TerminalBell);
    }

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        timer,
        config.tick_period(),
        events_tx,
        Arc::new(cues),
    ));

    // Start the countdown background task
    let countdown_state = Arc::clone(&state);
    let countdown = tokio::spawn(async move {
        countdown_task(countdown_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Widget running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /          - Widget page");
    info!("  POST /start     - Start a pomodoro");
    info!("  POST /pause     - Pause the countdown");
    info!("  POST /resume    - Resume the countdown");
    info!("  POST /rest      - Take a short rest now");
    info!("  POST /reset     - Abandon the session");
    info!("  PUT  /title     - Set the activity title");
    info!("  GET  /status    - Current view and session");
    info!("  GET  /events    - Snapshot and cue stream");
    info!("  GET  /health    - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Stops the scheduler with it
    countdown.abort();

    info!("Server shutdown complete");
    Ok(())
}
