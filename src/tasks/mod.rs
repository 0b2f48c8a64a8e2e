//! Background tasks module
//!
//! This module contains the repeating scheduler and the countdown task that
//! runs alongside the HTTP server.

pub mod countdown;
pub mod scheduler;

// Re-export main items
pub use countdown::countdown_task;
pub use scheduler::Scheduler;
