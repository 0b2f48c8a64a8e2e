//! Pomodoro session state machine
//!
//! Every change goes through [`TimerSession::step`]: the action is applied,
//! then an evaluation pass checks whether the countdown hit zero and moves
//! to the next phase. Transitions never perform side effects; the cues they
//! produce are returned in the [`Outcome`] for the caller to play.
//!
//! ```text
//! Idle --start--> Working --0--> Resting(Short | Long) --0--> Working
//!                    \                 ^
//!                     +------rest------+
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::Cue;
use crate::config::TimerConfig;

/// Which variant of rest the session is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestKind {
    Short,
    Long,
}

/// Current mode of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Working,
    Resting(RestKind),
}

impl Phase {
    pub fn is_idle(&self) -> bool {
        matches!(self, Phase::Idle)
    }

    pub fn is_resting(&self) -> bool {
        matches!(self, Phase::Resting(_))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Working => write!(f, "working"),
            Phase::Resting(RestKind::Short) => write!(f, "short rest"),
            Phase::Resting(RestKind::Long) => write!(f, "long rest"),
        }
    }
}

/// Inputs the session reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Start,
    Pause,
    Resume,
    Rest,
    Reset,
    Tick,
    SetTitle(String),
}

impl Action {
    /// Short name used in logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Pause => "pause",
            Action::Resume => "resume",
            Action::Rest => "rest",
            Action::Reset => "reset",
            Action::Tick => "tick",
            Action::SetTitle(_) => "title",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot {action} while {phase}")]
    NotAllowed { action: &'static str, phase: Phase },
}

/// Result of a successful step: the cues to play, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub cues: Vec<Cue>,
}

/// In-memory state of one pomodoro session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSession {
    pub remaining_seconds: u64,
    pub is_counting: bool,
    pub phase: Phase,
    /// Short-rest slots left before a long rest is due
    pub cycles_remaining_in_set: u32,
    pub completed_long_cycles: u32,
    pub total_worked_seconds: u64,
    pub pomodoros_completed: u32,
    pub activity_title: String,
    pub config: TimerConfig,
}

impl TimerSession {
    /// Create an idle session showing a full pomodoro
    pub fn new(config: TimerConfig) -> Self {
        let config = config.normalized();
        Self {
            remaining_seconds: config.pomodoro_time,
            is_counting: false,
            phase: Phase::Idle,
            cycles_remaining_in_set: config.cycles,
            completed_long_cycles: 0,
            total_worked_seconds: 0,
            pomodoros_completed: 0,
            activity_title: String::new(),
            config,
        }
    }

    /// Apply `action`, then run the evaluation pass.
    ///
    /// On error the session is left untouched.
    pub fn step(&mut self, action: Action) -> Result<Outcome, TransitionError> {
        let mut cues = Vec::new();

        match action {
            Action::Start => {
                self.require(Phase::is_idle, "start")?;
                self.configure_work(&mut cues);
            }
            Action::Pause => {
                self.require(|p| !p.is_idle(), "pause")?;
                self.is_counting = false;
            }
            Action::Resume => {
                self.require(|p| !p.is_idle(), "resume")?;
                self.is_counting = true;
            }
            Action::Rest => {
                self.require(|p| !p.is_idle(), "rest")?;
                self.configure_rest(RestKind::Short, &mut cues);
            }
            Action::Reset => {
                let title = std::mem::take(&mut self.activity_title);
                *self = Self::new(self.config);
                self.activity_title = title;
            }
            Action::Tick => self.tick(),
            Action::SetTitle(title) => self.activity_title = title,
        }

        self.evaluate(&mut cues);
        Ok(Outcome { cues })
    }

    fn require(&self, allowed: impl Fn(&Phase) -> bool, action: &'static str) -> Result<(), TransitionError> {
        if allowed(&self.phase) {
            Ok(())
        } else {
            Err(TransitionError::NotAllowed { action, phase: self.phase })
        }
    }

    fn tick(&mut self) {
        if !self.is_counting {
            return;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.phase == Phase::Working {
            self.total_worked_seconds += 1;
        }
    }

    /// Phase change once the countdown has reached zero
    fn evaluate(&mut self, cues: &mut Vec<Cue>) {
        if self.remaining_seconds > 0 {
            return;
        }

        match self.phase {
            Phase::Working => {
                if self.cycles_remaining_in_set > 0 {
                    self.configure_rest(RestKind::Short, cues);
                    self.cycles_remaining_in_set -= 1;
                } else {
                    self.configure_rest(RestKind::Long, cues);
                    self.cycles_remaining_in_set = self.config.cycles - 1;
                    self.completed_long_cycles += 1;
                }
                self.pomodoros_completed += 1;
            }
            Phase::Resting(_) => self.configure_work(cues),
            Phase::Idle => {}
        }
    }

    fn configure_work(&mut self, cues: &mut Vec<Cue>) {
        self.phase = Phase::Working;
        self.is_counting = true;
        self.remaining_seconds = self.config.pomodoro_time;
        cues.push(Cue::WorkStart);
    }

    fn configure_rest(&mut self, kind: RestKind, cues: &mut Vec<Cue>) {
        self.phase = Phase::Resting(kind);
        self.is_counting = true;
        self.remaining_seconds = match kind {
            RestKind::Short => self.config.short_rest_time,
            RestKind::Long => self.config.long_rest_time,
        };
        cues.push(Cue::PhaseEnd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_config() -> TimerConfig {
        TimerConfig {
            pomodoro_time: 10,
            short_rest_time: 2,
            long_rest_time: 5,
            cycles: 4,
        }
    }

    fn ticks(session: &mut TimerSession, count: u64) -> Vec<Cue> {
        let mut cues = Vec::new();
        for _ in 0..count {
            cues.extend(session.step(Action::Tick).unwrap().cues);
        }
        cues
    }

    #[test]
    fn new_session_is_idle() {
        let session = TimerSession::new(scenario_config());
        assert_eq!(session.phase, Phase::Idle);
        assert_eq!(session.remaining_seconds, 10);
        assert!(!session.is_counting);
        assert_eq!(session.cycles_remaining_in_set, 4);
    }

    #[test]
    fn start_enters_working_with_one_cue() {
        let mut session = TimerSession::new(scenario_config());
        let outcome = session.step(Action::Start).unwrap();

        assert_eq!(session.phase, Phase::Working);
        assert_eq!(session.remaining_seconds, 10);
        assert!(session.is_counting);
        assert_eq!(outcome.cues, vec![Cue::WorkStart]);
    }

    #[test]
    fn ticks_while_idle_do_nothing() {
        let mut session = TimerSession::new(scenario_config());
        assert!(ticks(&mut session, 3).is_empty());
        assert_eq!(session.remaining_seconds, 10);
        assert_eq!(session.total_worked_seconds, 0);
    }

    #[test]
    fn working_countdown_ends_in_short_rest() {
        let mut session = TimerSession::new(scenario_config());
        session.step(Action::Start).unwrap();

        assert!(ticks(&mut session, 9).is_empty());
        assert_eq!(session.remaining_seconds, 1);

        let cues = ticks(&mut session, 1);
        assert_eq!(cues, vec![Cue::PhaseEnd]);
        assert_eq!(session.phase, Phase::Resting(RestKind::Short));
        assert_eq!(session.remaining_seconds, 2);
        assert_eq!(session.cycles_remaining_in_set, 3);
        assert_eq!(session.pomodoros_completed, 1);
        assert_eq!(session.completed_long_cycles, 0);
    }

    #[test]
    fn exhausted_set_ends_in_long_rest() {
        let mut session = TimerSession::new(scenario_config());
        session.step(Action::Start).unwrap();
        session.cycles_remaining_in_set = 0;

        ticks(&mut session, 10);
        assert_eq!(session.phase, Phase::Resting(RestKind::Long));
        assert_eq!(session.remaining_seconds, 5);
        assert_eq!(session.completed_long_cycles, 1);
        assert_eq!(session.cycles_remaining_in_set, 3);
        assert_eq!(session.pomodoros_completed, 1);
    }

    #[test]
    fn rest_countdown_restarts_work() {
        let mut session = TimerSession::new(scenario_config());
        session.step(Action::Start).unwrap();
        ticks(&mut session, 10);

        let cues = ticks(&mut session, 2);
        assert_eq!(cues, vec![Cue::WorkStart]);
        assert_eq!(session.phase, Phase::Working);
        assert_eq!(session.remaining_seconds, 10);
        assert!(session.is_counting);
    }

    #[test]
    fn pause_freezes_countdown_until_resumed() {
        let mut session = TimerSession::new(scenario_config());
        session.step(Action::Start).unwrap();
        ticks(&mut session, 3);

        session.step(Action::Pause).unwrap();
        ticks(&mut session, 5);
        assert_eq!(session.remaining_seconds, 7);
        assert_eq!(session.total_worked_seconds, 3);
        assert_eq!(session.phase, Phase::Working);

        session.step(Action::Pause).unwrap();
        assert!(!session.is_counting);

        session.step(Action::Resume).unwrap();
        ticks(&mut session, 1);
        assert_eq!(session.remaining_seconds, 6);
    }

    #[test]
    fn manual_rest_skips_cycle_bookkeeping() {
        let mut session = TimerSession::new(scenario_config());
        session.step(Action::Start).unwrap();
        ticks(&mut session, 4);

        let outcome = session.step(Action::Rest).unwrap();
        assert_eq!(outcome.cues, vec![Cue::PhaseEnd]);
        assert_eq!(session.phase, Phase::Resting(RestKind::Short));
        assert_eq!(session.remaining_seconds, 2);
        assert_eq!(session.cycles_remaining_in_set, 4);
        assert_eq!(session.pomodoros_completed, 0);
        assert_eq!(session.total_worked_seconds, 4);
    }

    #[test]
    fn manual_rest_shortens_a_long_rest() {
        let mut session = TimerSession::new(scenario_config());
        session.step(Action::Start).unwrap();
        session.cycles_remaining_in_set = 0;
        ticks(&mut session, 10);
        assert_eq!(session.phase, Phase::Resting(RestKind::Long));

        let outcome = session.step(Action::Rest).unwrap();
        assert_eq!(outcome.cues, vec![Cue::PhaseEnd]);
        assert_eq!(session.phase, Phase::Resting(RestKind::Short));
        assert_eq!(session.remaining_seconds, 2);
        assert!(session.is_counting);
        assert_eq!(session.completed_long_cycles, 1);
        assert_eq!(session.cycles_remaining_in_set, 3);
        assert_eq!(session.pomodoros_completed, 1);
    }

    #[test]
    fn manual_rest_resumes_a_paused_session() {
        let mut session = TimerSession::new(scenario_config());
        session.step(Action::Start).unwrap();
        session.step(Action::Pause).unwrap();

        session.step(Action::Rest).unwrap();
        assert!(session.is_counting);
    }

    #[test]
    fn actions_are_gated_by_phase() {
        let mut session = TimerSession::new(scenario_config());
        for action in [Action::Pause, Action::Resume, Action::Rest] {
            let err = session.step(action).unwrap_err();
            assert!(matches!(err, TransitionError::NotAllowed { phase: Phase::Idle, .. }));
        }

        session.step(Action::Start).unwrap();
        let before = session.clone();
        let err = session.step(Action::Start).unwrap_err();
        assert_eq!(err.to_string(), "cannot start while working");
        assert_eq!(session, before);
    }

    #[test]
    fn reset_returns_to_idle_and_keeps_title() {
        let mut session = TimerSession::new(scenario_config());
        session.step(Action::SetTitle("writing".to_string())).unwrap();
        session.step(Action::Start).unwrap();
        ticks(&mut session, 12);

        let outcome = session.step(Action::Reset).unwrap();
        assert!(outcome.cues.is_empty());
        assert_eq!(session.phase, Phase::Idle);
        assert_eq!(session.remaining_seconds, 10);
        assert_eq!(session.pomodoros_completed, 0);
        assert_eq!(session.total_worked_seconds, 0);
        assert_eq!(session.activity_title, "writing");
    }

    #[test]
    fn full_set_reaches_long_rest() {
        let mut session = TimerSession::new(scenario_config());
        session.step(Action::Start).unwrap();

        ticks(&mut session, 10);
        assert_eq!(session.phase, Phase::Resting(RestKind::Short));
        assert_eq!(session.remaining_seconds, 2);
        assert_eq!(session.cycles_remaining_in_set, 3);
        assert_eq!(session.pomodoros_completed, 1);

        ticks(&mut session, 2);
        assert_eq!(session.phase, Phase::Working);
        assert_eq!(session.remaining_seconds, 10);

        // Three more short cycles drain the set.
        for _ in 0..3 {
            ticks(&mut session, 10);
            assert_eq!(session.phase, Phase::Resting(RestKind::Short));
            ticks(&mut session, 2);
        }
        assert_eq!(session.cycles_remaining_in_set, 0);
        assert_eq!(session.pomodoros_completed, 4);

        ticks(&mut session, 10);
        assert_eq!(session.phase, Phase::Resting(RestKind::Long));
        assert_eq!(session.remaining_seconds, 5);
        assert_eq!(session.completed_long_cycles, 1);
        assert_eq!(session.cycles_remaining_in_set, 3);
        assert_eq!(session.pomodoros_completed, 5);
        assert_eq!(session.total_worked_seconds, 50);
    }

    #[test]
    fn worked_time_counts_working_ticks_only() {
        let mut session = TimerSession::new(scenario_config());
        session.step(Action::Start).unwrap();

        // Four working phases with their short rests in between.
        for _ in 0..4 {
            ticks(&mut session, 10);
            assert!(session.phase.is_resting());
            if session.pomodoros_completed < 4 {
                ticks(&mut session, 2);
            }
        }
        assert_eq!(session.total_worked_seconds, 40);
    }

    #[test]
    fn single_cycle_config_always_takes_long_rests() {
        let mut session = TimerSession::new(TimerConfig {
            pomodoro_time: 1,
            short_rest_time: 1,
            long_rest_time: 3,
            cycles: 1,
        });
        session.step(Action::Start).unwrap();

        ticks(&mut session, 1);
        assert_eq!(session.phase, Phase::Resting(RestKind::Short));
        assert_eq!(session.cycles_remaining_in_set, 0);

        ticks(&mut session, 2);
        assert_eq!(session.phase, Phase::Resting(RestKind::Long));
        assert_eq!(session.cycles_remaining_in_set, 0);

        ticks(&mut session, 4);
        assert_eq!(session.phase, Phase::Resting(RestKind::Long));
        assert_eq!(session.completed_long_cycles, 2);
    }

    #[test]
    fn phase_serializes_in_lowercase() {
        let json = serde_json::to_string(&Phase::Resting(RestKind::Long)).unwrap();
        assert_eq!(json, r#"{"resting":"long"}"#);
        assert_eq!(serde_json::to_string(&Phase::Idle).unwrap(), r#""idle""#);
    }
}
