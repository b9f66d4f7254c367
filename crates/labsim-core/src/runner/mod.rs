//! Async driver for a [`LabSession`].
//!
//! The session is a pure state machine; the runner applies its effects.
//! Timer effects become spawned tokio tasks that sleep for the configured
//! delay and then post [`Event::TimerFired`] into an unbounded channel.
//! Whoever owns the runner drains that channel and hands each event back to
//! [`LabRunner::dispatch`], so all state changes happen on one task.
//!
//! ```rust,no_run
//! use labsim_core::{catalog, runner::{LabRunnerBuilder, Timing}, session::Event};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let lab = catalog::builtin_lab("linux-basics-lab")?;
//! let (mut runner, mut events) = LabRunnerBuilder::new(lab)
//!     .with_timing(Timing::immediate())
//!     .build()?;
//!
//! runner.dispatch(Event::Submit("pwd".to_string()));
//! runner.run_until_settled(&mut events).await;
//! assert_eq!(runner.session().history(), vec!["pwd"]);
//! # Ok(())
//! # }
//! ```

mod builder;
mod observer;
mod timing;

use std::sync::Arc;

use log::debug;
use tokio::sync::{mpsc, watch};

pub use builder::LabRunnerBuilder;
pub use observer::{LabObserver, LogObserver};
pub use timing::Timing;

use crate::error::Result;
use crate::session::{Effect, Event, LabSession, SessionSnapshot, Timer};

/// Receiving end of a runner's timer channel.
pub type EventReceiver = mpsc::UnboundedReceiver<Event>;

/// Owns a session, its observers and its timers.
pub struct LabRunner {
    session: LabSession,
    observers: Vec<Arc<dyn LabObserver>>,
    timing: Timing,
    events: mpsc::UnboundedSender<Event>,
    pending_timers: usize,
    finished: watch::Sender<u64>,
    resets: watch::Sender<u64>,
}

impl LabRunner {
    /// Applies an event to the session and carries out the resulting effects.
    ///
    /// Returns the effects so that a front end can render them.
    pub fn dispatch(&mut self, event: Event) -> Vec<Effect> {
        if matches!(event, Event::TimerFired(_)) {
            self.pending_timers = self.pending_timers.saturating_sub(1);
        }
        let effects = self.session.handle(event);
        for effect in &effects {
            self.apply(effect);
        }
        effects
    }

    /// Submits a shell command.
    pub fn submit(&mut self, command: impl Into<String>) -> Vec<Effect> {
        self.dispatch(Event::Submit(command.into()))
    }

    /// Marks a step completed without validation.
    ///
    /// Fails with [`crate::LabError::StepNotFound`] if the lab has no such step.
    pub fn complete_step(&mut self, step_id: &str) -> Result<Vec<Effect>> {
        self.session.step_index(step_id)?;
        Ok(self.dispatch(Event::CompleteStep(step_id.to_string())))
    }

    /// Drains timer events until nothing is in flight, queued or scheduled.
    ///
    /// Returns early if the channel closes.
    pub async fn run_until_settled(&mut self, events: &mut EventReceiver) -> Vec<Effect> {
        let mut effects = Vec::new();
        while !self.is_settled() {
            match events.recv().await {
                Some(event) => effects.extend(self.dispatch(event)),
                None => break,
            }
        }
        effects
    }

    /// True when no command is running or queued and no timer is pending.
    pub fn is_settled(&self) -> bool {
        !self.session.is_busy() && self.pending_timers == 0
    }

    pub fn session(&self) -> &LabSession {
        &self.session
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Count of commands whose output has been recorded since the runner
    /// was built. The count survives resets.
    pub fn finished_commands(&self) -> watch::Receiver<u64> {
        self.finished.subscribe()
    }

    /// Count of session resets since the runner was built. Output of
    /// commands in flight at a reset never arrives.
    pub fn resets(&self) -> watch::Receiver<u64> {
        self.resets.subscribe()
    }

    fn apply(&mut self, effect: &Effect) {
        let lab_id = self.session.lab_id();
        match effect {
            Effect::CommandAccepted(command) => {
                for observer in &self.observers {
                    observer.on_command(lab_id, command);
                }
            }
            Effect::Output(output) => {
                self.notify_output(output);
            }
            Effect::ClearScreen => {
                self.notify_output("");
            }
            Effect::StepCompleted { step_id } => {
                for observer in &self.observers {
                    observer.on_step_complete(lab_id, step_id);
                }
            }
            Effect::LabCompleted => {
                for observer in &self.observers {
                    observer.on_lab_complete(lab_id);
                }
            }
            Effect::Schedule(timer) => self.schedule(*timer),
            Effect::SessionReset => {
                self.resets.send_modify(|count| *count += 1);
            }
            Effect::CommandQueued(_) | Effect::CommandRejected(_) | Effect::StepChanged { .. } => {}
        }
    }

    fn notify_output(&self, output: &str) {
        let lab_id = self.session.lab_id();
        let command = self.session.transcript().last_command();
        for observer in &self.observers {
            observer.on_output(lab_id, command, output);
        }
        self.finished.send_modify(|count| *count += 1);
    }

    fn schedule(&mut self, timer: Timer) {
        let delay = self.timing.delay_for(&timer);
        let events = self.events.clone();
        self.pending_timers += 1;
        debug!("Scheduling {timer:?} in {delay:?}");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The owner may have dropped the receiver; the timer is moot then
            let _ = events.send(Event::TimerFired(timer));
        });
    }
}

impl std::fmt::Debug for LabRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabRunner")
            .field("lab", &self.session.lab_id())
            .field("pending_timers", &self.pending_timers)
            .field("observers", &self.observers.len())
            .finish()
    }
}
