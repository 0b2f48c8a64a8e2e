//! Cue players

use std::io::Write;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

use super::Cue;
use crate::state::ShellEvent;

#[derive(Debug, Error)]
pub enum CueError {
    /// No page is connected to hear the cue
    #[error("no listeners for cue {0}")]
    NoListeners(Cue),
    #[error("failed to write cue {cue}: {source}")]
    Io {
        cue: Cue,
        #[source]
        source: std::io::Error,
    },
    #[error("{failed} of {total} cue players failed for {cue}")]
    Partial { cue: Cue, failed: usize, total: usize },
}

/// Side-effect boundary for audio cues. Playback is fire-and-forget: callers
/// log errors and carry on.
pub trait CuePlayer: Send + Sync {
    fn play(&self, cue: Cue) -> Result<(), CueError>;
}

/// Forwards cues to connected pages over the shell event channel
#[derive(Debug, Clone)]
pub struct BroadcastCuePlayer {
    events_tx: broadcast::Sender<ShellEvent>,
}

impl BroadcastCuePlayer {
    pub fn new(events_tx: broadcast::Sender<ShellEvent>) -> Self {
        Self { events_tx }
    }
}

impl CuePlayer for BroadcastCuePlayer {
    fn play(&self, cue: Cue) -> Result<(), CueError> {
        let event = ShellEvent::Cue {
            cue,
            sound: cue.sound_path().to_string(),
            at: Utc::now(),
        };
        let receivers = self
            .events_tx
            .send(event)
            .map_err(|_| CueError::NoListeners(cue))?;
        debug!("Cue {} sent to {} listener(s)", cue, receivers);
        Ok(())
    }
}

/// Rings the terminal bell on stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl CuePlayer for TerminalBell {
    fn play(&self, cue: Cue) -> Result<(), CueError> {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(b"\x07")
            .and_then(|_| stdout.flush())
            .map_err(|source| CueError::Io { cue, source })
    }
}

/// Plays each cue on every registered player
#[derive(Default, Clone)]
pub struct CueFanout {
    players: Vec<Arc<dyn CuePlayer>>,
}

impl CueFanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, player: impl CuePlayer + 'static) -> Self {
        self.players.push(Arc::new(player));
        self
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl CuePlayer for CueFanout {
    fn play(&self, cue: Cue) -> Result<(), CueError> {
        let mut failed = 0;
        let mut unheard = 0;
        for player in &self.players {
            match player.play(cue) {
                Ok(()) => {}
                Err(CueError::NoListeners(_)) => unheard += 1,
                Err(e) => {
                    debug!("Cue player failed: {}", e);
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            Err(CueError::Partial { cue, failed, total: self.len() })
        } else if !self.is_empty() && unheard == self.len() {
            Err(CueError::NoListeners(cue))
        } else {
            Ok(())
        }
    }
}
