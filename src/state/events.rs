//! Events pushed to connected pages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audio::Cue;
use crate::view::WidgetView;

use super::TimerSession;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShellEvent {
    /// The view after a state change
    Snapshot {
        view: WidgetView,
        at: DateTime<Utc>,
    },
    /// A cue the page should play from the start
    Cue {
        cue: Cue,
        sound: String,
        at: DateTime<Utc>,
    },
}

impl ShellEvent {
    pub fn snapshot(session: &TimerSession) -> Self {
        ShellEvent::Snapshot {
            view: WidgetView::render(session),
            at: Utc::now(),
        }
    }

    /// SSE event name
    pub fn kind(&self) -> &'static str {
        match self {
            ShellEvent::Snapshot { .. } => "snapshot",
            ShellEvent::Cue { .. } => "cue",
        }
    }
}
