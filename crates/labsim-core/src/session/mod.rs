//! Step progression state machine.
//!
//! A [`LabSession`] owns a working copy of a lab's steps, the command
//! transcript and all transient UI state (current index, validation status,
//! hint state). It never sleeps and never touches the clock for control
//! flow: [`LabSession::handle`] applies one [`Event`] and returns the
//! [`Effect`]s the caller must carry out, including timers to schedule.
//! Fired timers come back in as [`Event::TimerFired`].
//!
//! Timers carry either the command ticket or the session generation at the
//! time they were scheduled. Navigation, reset and every validation status
//! change bump the generation, so timers scheduled before are ignored when
//! they fire.
//!
//! ```rust
//! use labsim_core::models::{LabDefinition, Step, ValidationRule};
//! use labsim_core::session::{Effect, Event, LabSession, Timer};
//!
//! let lab = LabDefinition::new(
//!     "demo",
//!     "Demo",
//!     vec![Step::new("pwd", "Where am I?").with_rule(ValidationRule::command("pwd"))],
//! );
//! let mut session = LabSession::new(&lab);
//!
//! let effects = session.handle(Event::Submit("pwd".to_string()));
//! assert!(effects.contains(&Effect::Schedule(Timer::CommandOutput { ticket: 1 })));
//!
//! let effects = session.handle(Event::TimerFired(Timer::CommandOutput { ticket: 1 }));
//! assert!(effects.contains(&Effect::LabCompleted));
//! assert!(session.is_complete());
//! ```

mod recorder;
mod snapshot;
mod transitions;

#[cfg(test)]
mod tests;

use std::collections::VecDeque;

pub use recorder::Transcript;
pub use snapshot::{HintState, SessionSnapshot, StepView};

use crate::error::{LabError, Result};
use crate::interpreter::{CommandInterpreter, Interpretation};
use crate::models::{LabDefinition, ProgressSummary, SessionStatus, Step, ValidationStatus};

/// Commands that may wait behind the one in flight.
pub const MAX_QUEUED_COMMANDS: usize = 16;

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A command typed by the learner
    Submit(String),
    /// A timer previously requested through [`Effect::Schedule`]
    TimerFired(Timer),
    /// Jump to a step; out-of-range indices are clamped
    Navigate(usize),
    /// Move one step forward, if there is one
    Next,
    /// Move one step back, if there is one
    Previous,
    /// Show or hide the current step's hints
    ToggleHints,
    /// Reveal one more hint for the current step
    RevealHint,
    /// Mark a step completed without validation
    CompleteStep(String),
    /// Return to the initial state
    Reset,
}

/// Delayed work requested by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    /// Simulated latency before a command's output is shown
    CommandOutput { ticket: u64 },
    /// Move on after a successful validation
    AutoAdvance { generation: u64 },
    /// Return an error status to idle
    StatusReset { generation: u64 },
}

/// Side effects the caller must apply, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// A command started executing
    CommandAccepted(String),
    /// A command is waiting behind the one in flight
    CommandQueued(String),
    /// The queue was full and the command was dropped
    CommandRejected(String),
    /// Output of the command that just finished
    Output(String),
    /// The visible transcript should be wiped
    ClearScreen,
    /// Request a timer; deliver it back as [`Event::TimerFired`]
    Schedule(Timer),
    StepCompleted { step_id: String },
    /// Every step is completed; fired once per session lifetime between resets
    LabCompleted,
    /// The current step changed
    StepChanged { index: usize },
    /// The session returned to its initial state
    SessionReset,
}

#[derive(Debug, Clone)]
struct InFlight {
    ticket: u64,
    command: String,
    interpretation: Interpretation,
}

/// A live lab session.
#[derive(Debug, Clone)]
pub struct LabSession {
    lab_id: String,
    lab_title: String,
    steps: Vec<Step>,
    current: usize,
    validation: ValidationStatus,
    transcript: Transcript,
    interpreter: CommandInterpreter,
    hints_visible: bool,
    hints_revealed: Vec<usize>,
    in_flight: Option<InFlight>,
    queue: VecDeque<String>,
    generation: u64,
    next_ticket: u64,
    lab_completed: bool,
}

impl LabSession {
    /// Starts a session with the built-in interpreter.
    pub fn new(lab: &LabDefinition) -> Self {
        Self::with_interpreter(lab, CommandInterpreter::builtin())
    }

    /// Starts a session on a fresh working copy of `lab`'s steps.
    pub fn with_interpreter(lab: &LabDefinition, interpreter: CommandInterpreter) -> Self {
        let steps: Vec<Step> = lab
            .steps
            .iter()
            .cloned()
            .map(|mut step| {
                step.completed = false;
                step
            })
            .collect();
        let hints_revealed = vec![0; steps.len()];
        Self {
            lab_id: lab.id.clone(),
            lab_title: lab.title.clone(),
            steps,
            current: 0,
            validation: ValidationStatus::Idle,
            transcript: Transcript::new(),
            interpreter,
            hints_visible: false,
            hints_revealed,
            in_flight: None,
            queue: VecDeque::new(),
            generation: 0,
            next_ticket: 1,
            lab_completed: false,
        }
    }

    pub fn lab_id(&self) -> &str {
        &self.lab_id
    }

    pub fn lab_title(&self) -> &str {
        &self.lab_title
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.current)
    }

    /// Position of the step with the given ID.
    pub fn step_index(&self, step_id: &str) -> Result<usize> {
        self.steps
            .iter()
            .position(|s| s.id == step_id)
            .ok_or_else(|| LabError::StepNotFound {
                id: step_id.to_string(),
            })
    }

    pub fn validation_status(&self) -> ValidationStatus {
        self.validation
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Submitted commands in order, including `clear`.
    pub fn history(&self) -> Vec<String> {
        self.transcript.history()
    }

    pub fn hints_visible(&self) -> bool {
        self.hints_visible
    }

    /// Hints revealed so far for the current step.
    pub fn revealed_hints(&self) -> &[String] {
        match self.current_step() {
            Some(step) => {
                let count = self.hints_revealed[self.current].min(step.hints.len());
                &step.hints[..count]
            }
            None => &[],
        }
    }

    pub fn session_status(&self) -> SessionStatus {
        if self.is_complete() {
            SessionStatus::Complete
        } else {
            SessionStatus::InProgress
        }
    }

    /// True when every step is completed.
    pub fn is_complete(&self) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(|s| s.completed)
    }

    pub fn progress(&self) -> ProgressSummary {
        ProgressSummary::from_steps(&self.steps)
    }

    /// True while a command is executing or waiting.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some() || !self.queue.is_empty()
    }

    /// Commands waiting behind the one in flight.
    pub fn queued_commands(&self) -> usize {
        self.queue.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Read-only view for presentation layers.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from_session(self)
    }
}
