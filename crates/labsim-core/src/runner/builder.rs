//! Builder for creating and configuring LabRunner instances.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use super::{EventReceiver, LabObserver, LabRunner, Timing};
use crate::{
    error::Result,
    interpreter::CommandInterpreter,
    models::LabDefinition,
    session::LabSession,
};

/// Builder for creating and configuring [`LabRunner`] instances.
pub struct LabRunnerBuilder {
    lab: LabDefinition,
    timing: Timing,
    interpreter: CommandInterpreter,
    observers: Vec<Arc<dyn LabObserver>>,
}

impl LabRunnerBuilder {
    /// Creates a builder with default timing and the built-in interpreter.
    pub fn new(lab: LabDefinition) -> Self {
        Self {
            lab,
            timing: Timing::default(),
            interpreter: CommandInterpreter::builtin(),
            observers: Vec::new(),
        }
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Replaces the command interpreter.
    pub fn with_interpreter(mut self, interpreter: CommandInterpreter) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Registers an observer. Observers are notified in registration order.
    pub fn with_observer(mut self, observer: Arc<dyn LabObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Builds the runner and the receiver its timers report to.
    ///
    /// The caller owns the receiver and must feed every event it yields back
    /// into [`LabRunner::dispatch`].
    ///
    /// # Errors
    ///
    /// Returns `LabError::InvalidLab` or `LabError::InvalidPattern` if the
    /// lab definition is malformed.
    pub fn build(self) -> Result<(LabRunner, EventReceiver)> {
        self.lab.validate()?;

        let (events, receiver) = mpsc::unbounded_channel();
        let (finished, _) = watch::channel(0);
        let (resets, _) = watch::channel(0);
        let runner = LabRunner {
            session: LabSession::with_interpreter(&self.lab, self.interpreter),
            observers: self.observers,
            timing: self.timing,
            events,
            pending_timers: 0,
            finished,
            resets,
        };
        Ok((runner, receiver))
    }
}

impl std::fmt::Debug for LabRunnerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabRunnerBuilder")
            .field("lab", &self.lab.id)
            .field("timing", &self.timing)
            .field("observers", &self.observers.len())
            .finish()
    }
}
