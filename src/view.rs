//! Widget view model
//!
//! Everything the page draws is decided here from a [`TimerSession`]; the
//! page itself only copies fields into the DOM.

use serde::{Deserialize, Serialize};

use crate::state::{Phase, TimerSession};
use crate::utils::{format_clock, format_hms};

/// A button the page should offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    Start,
    Pause,
    Resume,
    Rest,
}

impl Control {
    pub fn label(&self) -> &'static str {
        match self {
            Control::Start => "Start",
            Control::Pause => "Pause",
            Control::Resume => "Resume",
            Control::Rest => "Rest",
        }
    }

    /// Endpoint the button posts to
    pub fn endpoint(&self) -> &'static str {
        match self {
            Control::Start => "/start",
            Control::Pause => "/pause",
            Control::Resume => "/resume",
            Control::Rest => "/rest",
        }
    }
}

/// Frame colour of the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    Green,
    Red,
    Blue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlView {
    pub control: Control,
    pub label: String,
    pub endpoint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetView {
    pub phase: Phase,
    pub phase_label: String,
    pub accent: Accent,
    pub countdown: String,
    pub is_counting: bool,
    /// Shown above the title input while idle
    pub prompt: Option<String>,
    pub title: String,
    pub title_visible: bool,
    /// Replaces the title while resting
    pub status_label: Option<String>,
    pub controls: Vec<ControlView>,
    pub stats: Vec<StatRow>,
}

impl WidgetView {
    pub fn render(session: &TimerSession) -> Self {
        let accent = match session.phase {
            Phase::Idle => Accent::Green,
            Phase::Working => Accent::Red,
            Phase::Resting(_) => Accent::Blue,
        };

        Self {
            phase: session.phase,
            phase_label: session.phase.to_string(),
            accent,
            countdown: format_clock(session.remaining_seconds),
            is_counting: session.is_counting,
            prompt: session.phase.is_idle().then(|| "Enter the activity:".to_string()),
            title: session.activity_title.clone(),
            title_visible: !session.phase.is_resting(),
            status_label: session.phase.is_resting().then(|| "Resting".to_string()),
            controls: controls_for(session)
                .into_iter()
                .map(|control| ControlView {
                    control,
                    label: control.label().to_string(),
                    endpoint: control.endpoint().to_string(),
                })
                .collect(),
            stats: vec![
                StatRow {
                    label: "Cycles".to_string(),
                    value: session.completed_long_cycles.to_string(),
                },
                StatRow {
                    label: "Pomodoros".to_string(),
                    value: session.pomodoros_completed.to_string(),
                },
                StatRow {
                    label: "Total time".to_string(),
                    value: format_hms(session.total_worked_seconds),
                },
            ],
        }
    }
}

fn controls_for(session: &TimerSession) -> Vec<Control> {
    match (session.phase, session.is_counting) {
        (Phase::Idle, _) => vec![Control::Start],
        (_, true) => vec![Control::Pause, Control::Rest],
        (_, false) => vec![Control::Resume, Control::Rest],
    }
}
