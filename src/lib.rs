//! Pomodoro Widget - A Pomodoro timer served to the browser
//!
//! This library provides the session state machine, the repeating scheduler
//! that drives its countdown, and the HTTP shell that renders it as a
//! single-page widget with audio cues.

pub mod api;
pub mod audio;
pub mod config;
pub mod error;
pub mod state;
pub mod tasks;
pub mod utils;
pub mod view;

// Re-export commonly used types
pub use api::create_router;
pub use config::{Config, TimerConfig};
pub use error::ShellError;
pub use state::{AppState, TimerSession};
pub use utils::signals::shutdown_signal;
