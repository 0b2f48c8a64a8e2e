//! Audio cues
//!
//! The session decides *when* a cue plays; players here decide *how*. The
//! browser page gets cues over the event stream and plays the synthesized
//! tones served from `/sounds`.

pub mod player;
pub mod tone;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use player::{BroadcastCuePlayer, CueError, CueFanout, CuePlayer, TerminalBell};
pub use tone::{Tone, CueSounds};

/// Sound to play on a phase transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Entering a working phase
    WorkStart,
    /// Leaving a working phase
    PhaseEnd,
}

impl Cue {
    /// Path of the sound served for this cue
    pub fn sound_path(&self) -> &'static str {
        match self {
            Cue::WorkStart => "/sounds/start.wav",
            Cue::PhaseEnd => "/sounds/finish.wav",
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cue::WorkStart => write!(f, "work_start"),
            Cue::PhaseEnd => write!(f, "phase_end"),
        }
    }
}
