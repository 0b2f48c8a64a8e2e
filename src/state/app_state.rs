//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::audio::{Cue, CueError, CuePlayer, CueSounds};
use crate::config::TimerConfig;
use crate::error::ShellError;
use crate::view::WidgetView;

use super::{Action, ShellEvent, TimerSession};

/// Shared state behind the HTTP shell and the countdown task
pub struct AppState {
    /// The running pomodoro session
    pub session: Arc<Mutex<TimerSession>>,
    /// Scheduler period while the session is counting
    pub tick_period: Duration,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last user action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for session snapshots, watched by the countdown task
    pub session_tx: watch::Sender<TimerSession>,
    /// Keep the receiver alive to prevent channel closure
    pub _session_rx: watch::Receiver<TimerSession>,
    /// Snapshots and cues for connected pages
    pub events_tx: broadcast::Sender<ShellEvent>,
    /// Cue sounds served to the page
    pub sounds: CueSounds,
    cue_player: Arc<dyn CuePlayer>,
}

impl AppState {
    /// Create an AppState holding an idle session
    pub fn new(
        port: u16,
        host: String,
        timer: TimerConfig,
        tick_period: Duration,
        events_tx: broadcast::Sender<ShellEvent>,
        cue_player: Arc<dyn CuePlayer>,
    ) -> Self {
        let session = TimerSession::new(timer);
        let (session_tx, session_rx) = watch::channel(session.clone());

        Self {
            session: Arc::new(Mutex::new(session)),
            tick_period,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            session_tx,
            _session_rx: session_rx,
            events_tx,
            sounds: CueSounds::render(),
            cue_player,
        }
    }

    /// Apply an action to the session, publish the result and play its cues
    pub fn dispatch(&self, action: Action) -> Result<TimerSession, ShellError> {
        let name = action.name();
        let is_tick = matches!(action, Action::Tick);

        let mut session = self.session.lock()
            .map_err(|e| ShellError::StateLock(e.to_string()))?;

        let previous_phase = session.phase;
        let outcome = session.step(action)?;
        let snapshot = session.clone();

        // Publish under the lock so snapshots go out in the order the session changed
        self.session_tx.send_replace(snapshot.clone());
        // No connected page is not an error
        let _ = self.events_tx.send(ShellEvent::snapshot(&snapshot));
        drop(session);

        if snapshot.phase != previous_phase {
            info!("Phase changed: {} -> {}", previous_phase, snapshot.phase);
        }

        if !is_tick {
            debug!("Applied action: {}", name);
            if let Ok(mut last_action) = self.last_action.lock() {
                *last_action = Some(name.to_string());
            }
            if let Ok(mut last_time) = self.last_action_time.lock() {
                *last_time = Some(Utc::now());
            }
        }

        for cue in outcome.cues {
            self.play_cue(cue);
        }

        Ok(snapshot)
    }

    /// Start a working phase from idle
    pub fn start(&self) -> Result<TimerSession, ShellError> {
        info!("Starting pomodoro");
        self.dispatch(Action::Start)
    }

    /// Freeze the countdown
    pub fn pause(&self) -> Result<TimerSession, ShellError> {
        info!("Pausing countdown");
        self.dispatch(Action::Pause)
    }

    /// Continue a paused countdown
    pub fn resume(&self) -> Result<TimerSession, ShellError> {
        info!("Resuming countdown");
        self.dispatch(Action::Resume)
    }

    /// Take a short rest right away
    pub fn rest(&self) -> Result<TimerSession, ShellError> {
        info!("Taking a short rest early");
        self.dispatch(Action::Rest)
    }

    /// Abandon the session and return to idle
    pub fn reset(&self) -> Result<TimerSession, ShellError> {
        info!("Resetting session");
        self.dispatch(Action::Reset)
    }

    /// Advance the countdown by one tick
    pub fn tick(&self) -> Result<TimerSession, ShellError> {
        self.dispatch(Action::Tick)
    }

    /// Set the activity title
    pub fn set_title(&self, title: String) -> Result<TimerSession, ShellError> {
        debug!("Setting activity title to: {:?}", title);
        self.dispatch(Action::SetTitle(title))
    }

    fn play_cue(&self, cue: Cue) {
        match self.cue_player.play(cue) {
            Ok(()) => debug!("Played cue: {}", cue),
            Err(CueError::NoListeners(_)) => debug!("Cue {} played to nobody", cue),
            Err(e) => warn!("Cue playback failed: {}", e),
        }
    }

    /// Get current session
    pub fn get_session(&self) -> Result<TimerSession, ShellError> {
        self.session.lock()
            .map(|session| session.clone())
            .map_err(|e| ShellError::StateLock(e.to_string()))
    }

    /// Render the current session
    pub fn get_view(&self) -> Result<WidgetView, ShellError> {
        self.get_session().map(|session| WidgetView::render(&session))
    }

    /// Subscribe to session snapshots
    pub fn watch_session(&self) -> watch::Receiver<TimerSession> {
        self.session_tx.subscribe()
    }

    /// Subscribe to page events
    pub fn subscribe_events(&self) -> broadcast::Receiver<ShellEvent> {
        self.events_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Phase, RestKind};

    /// Records every cue it is asked to play
    #[derive(Default)]
    struct RecordingPlayer {
        played: Mutex<Vec<Cue>>,
    }

    impl CuePlayer for RecordingPlayer {
        fn play(&self, cue: Cue) -> Result<(), CueError> {
            self.played.lock().unwrap().push(cue);
            Ok(())
        }
    }

    struct BrokenPlayer;

    impl CuePlayer for BrokenPlayer {
        fn play(&self, cue: Cue) -> Result<(), CueError> {
            Err(CueError::Io {
                cue,
                source: std::io::Error::new(std::io::ErrorKind::Other, "autoplay blocked"),
            })
        }
    }

    fn timer() -> TimerConfig {
        TimerConfig {
            pomodoro_time: 3,
            short_rest_time: 1,
            long_rest_time: 2,
            cycles: 2,
        }
    }

    fn app_state(player: Arc<dyn CuePlayer>) -> AppState {
        let (events_tx, _) = broadcast::channel(16);
        AppState::new(20554, "127.0.0.1".to_string(), timer(), Duration::from_secs(1), events_tx, player)
    }

    #[test]
    fn dispatch_plays_returned_cues() {
        let player = Arc::new(RecordingPlayer::default());
        let state = app_state(player.clone());

        state.start().unwrap();
        for _ in 0..3 {
            state.tick().unwrap();
        }
        state.tick().unwrap();

        let played = player.played.lock().unwrap().clone();
        assert_eq!(played, vec![Cue::WorkStart, Cue::PhaseEnd, Cue::WorkStart]);
        assert_eq!(state.get_session().unwrap().phase, Phase::Working);
    }

    #[test]
    fn playback_failures_do_not_fail_the_action() {
        let state = app_state(Arc::new(BrokenPlayer));
        let session = state.start().unwrap();
        assert_eq!(session.phase, Phase::Working);
    }

    #[test]
    fn refused_action_leaves_state_alone() {
        let player = Arc::new(RecordingPlayer::default());
        let state = app_state(player.clone());

        let err = state.pause().unwrap_err();
        assert!(matches!(err, ShellError::Transition(_)));
        assert_eq!(state.get_session().unwrap().phase, Phase::Idle);
        assert!(player.played.lock().unwrap().is_empty());
        assert_eq!(state.get_last_action(), (None, None));
    }

    #[test]
    fn ticks_do_not_count_as_user_actions() {
        let state = app_state(Arc::new(RecordingPlayer::default()));
        state.start().unwrap();
        state.tick().unwrap();

        assert_eq!(state.get_last_action().0.as_deref(), Some("start"));
    }

    #[test]
    fn racing_pause_and_resume_publish_the_final_session() {
        use std::sync::Barrier;
        use std::thread;

        let state = app_state(Arc::new(RecordingPlayer::default()));
        state.start().unwrap();
        let session_rx = state.watch_session();

        for _ in 0..2_000 {
            let barrier = Barrier::new(2);
            thread::scope(|scope| {
                scope.spawn(|| {
                    barrier.wait();
                    state.pause().unwrap();
                });
                scope.spawn(|| {
                    barrier.wait();
                    state.resume().unwrap();
                });
            });

            let counting = state.get_session().unwrap().is_counting;
            assert_eq!(session_rx.borrow().is_counting, counting);
        }
    }

    #[test]
    fn dispatch_publishes_snapshots() {
        let state = app_state(Arc::new(RecordingPlayer::default()));
        let mut session_rx = state.watch_session();
        let mut events_rx = state.subscribe_events();

        state.start().unwrap();
        state.rest().unwrap();

        assert!(session_rx.has_changed().unwrap());
        assert_eq!(session_rx.borrow_and_update().phase, Phase::Resting(RestKind::Short));

        let first = events_rx.try_recv().unwrap();
        assert_eq!(first.kind(), "snapshot");
        assert_eq!(state.get_view().unwrap().status_label.as_deref(), Some("Resting"));
    }
}
