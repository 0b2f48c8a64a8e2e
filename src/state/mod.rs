//! State management module
//!
//! This module contains the session state machine and the shared state that
//! wraps it for the HTTP shell and the countdown task.

pub mod app_state;
pub mod events;
pub mod session;

// Re-export main types
pub use app_state::AppState;
pub use events::ShellEvent;
pub use session::{Action, Outcome, Phase, RestKind, TimerSession, TransitionError};
