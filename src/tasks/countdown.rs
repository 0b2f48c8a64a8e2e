//! Countdown background task

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::state::AppState;

use super::scheduler::Scheduler;

/// Background task that ticks the session while it is counting
///
/// Owns the scheduler: aborting this task drops the scheduler and with it
/// any pending tick.
pub async fn countdown_task(state: Arc<AppState>) {
    info!("Starting countdown task (tick every {:?})", state.tick_period);

    let mut session_rx = state.watch_session();

    let tick_state = Arc::clone(&state);
    let scheduler = Scheduler::spawn(
        move || {
            if let Err(e) = tick_state.tick() {
                error!("Failed to apply tick: {}", e);
            }
        },
        None,
    );

    loop {
        let counting = session_rx.borrow_and_update().is_counting;
        let period = counting.then_some(state.tick_period);
        if scheduler.is_enabled() != counting {
            debug!("Countdown {}", if counting { "running" } else { "stopped" });
        }
        scheduler.set_period(period);

        // Wait for the next session change
        if session_rx.changed().await.is_err() {
            info!("Session channel closed, stopping countdown task");
            return;
        }
    }
}
