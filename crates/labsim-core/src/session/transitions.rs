//! Event handling for [`LabSession`].

use log::{debug, info, warn};

use super::{Effect, Event, InFlight, LabSession, Timer, MAX_QUEUED_COMMANDS};
use crate::interpreter::Interpretation;
use crate::models::{StepCheck, ValidationStatus};
use crate::validation::{self, Verdict};

impl LabSession {
    /// Applies one event and returns the effects to carry out.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        debug!("Session '{}' handling {:?}", self.lab_id, event);
        let mut effects = Vec::new();
        match event {
            Event::Submit(command) => self.submit(command, &mut effects),
            Event::TimerFired(timer) => self.timer_fired(timer, &mut effects),
            Event::Navigate(index) => self.navigate(index, &mut effects),
            Event::Next => {
                if self.current + 1 < self.steps.len() {
                    self.navigate(self.current + 1, &mut effects);
                }
            }
            Event::Previous => {
                if self.current > 0 {
                    self.navigate(self.current - 1, &mut effects);
                }
            }
            Event::ToggleHints => self.toggle_hints(),
            Event::RevealHint => self.reveal_hint(),
            Event::CompleteStep(step_id) => match self.step_index(&step_id) {
                Ok(index) => self.complete_at(index, &mut effects),
                Err(e) => warn!("Cannot complete step in '{}': {e}", self.lab_id),
            },
            Event::Reset => self.reset(&mut effects),
        }
        effects
    }

    fn submit(&mut self, command: String, effects: &mut Vec<Effect>) {
        let command = command.trim().to_string();
        if command.is_empty() {
            return;
        }
        if self.in_flight.is_none() {
            self.start(command, effects);
        } else if self.queue.len() >= MAX_QUEUED_COMMANDS {
            warn!(
                "Command queue full ({MAX_QUEUED_COMMANDS}), rejecting '{command}' in '{}'",
                self.lab_id
            );
            effects.push(Effect::CommandRejected(command));
        } else {
            debug!("Queueing '{command}' behind the command in flight");
            self.queue.push_back(command.clone());
            effects.push(Effect::CommandQueued(command));
        }
    }

    fn start(&mut self, command: String, effects: &mut Vec<Effect>) {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let interpretation = self.interpreter.interpret(&command);

        let checks_current = interpretation != Interpretation::Clear
            && self
                .current_step()
                .is_some_and(|s| !s.completed && s.is_validatable());
        if checks_current {
            self.set_status(ValidationStatus::Checking);
        }

        effects.push(Effect::CommandAccepted(command.clone()));
        effects.push(Effect::Schedule(Timer::CommandOutput { ticket }));
        self.in_flight = Some(InFlight {
            ticket,
            command,
            interpretation,
        });
    }

    fn timer_fired(&mut self, timer: Timer, effects: &mut Vec<Effect>) {
        match timer {
            Timer::CommandOutput { ticket } => {
                let matches = self.in_flight.as_ref().is_some_and(|f| f.ticket == ticket);
                if !matches {
                    debug!("Ignoring stale output timer for ticket {ticket}");
                    return;
                }
                if let Some(finished) = self.in_flight.take() {
                    self.finish(finished, effects);
                }
                if let Some(next) = self.queue.pop_front() {
                    self.start(next, effects);
                }
            }
            Timer::AutoAdvance { generation } => {
                if generation != self.generation {
                    debug!("Ignoring stale auto-advance (generation {generation})");
                    return;
                }
                let next = (self.current + 1..self.steps.len()).find(|&i| !self.steps[i].completed);
                if let Some(index) = next {
                    debug!("Auto-advancing to step {index}");
                    self.current = index;
                    self.hints_visible = false;
                    effects.push(Effect::StepChanged { index });
                }
                self.set_status(ValidationStatus::Idle);
            }
            Timer::StatusReset { generation } => {
                if generation != self.generation {
                    debug!("Ignoring stale status reset (generation {generation})");
                    return;
                }
                self.set_status(ValidationStatus::Idle);
            }
        }
    }

    fn finish(&mut self, finished: InFlight, effects: &mut Vec<Effect>) {
        let InFlight {
            command,
            interpretation,
            ..
        } = finished;
        self.transcript.record(command, interpretation.output());
        match interpretation {
            Interpretation::Clear => effects.push(Effect::ClearScreen),
            Interpretation::Text(output) => {
                effects.push(Effect::Output(output));
                self.validate_current(effects);
            }
        }
    }

    fn validate_current(&mut self, effects: &mut Vec<Effect>) {
        let index = self.current;
        let Some(step) = self.steps.get(index) else {
            return;
        };
        if step.completed {
            if self.validation == ValidationStatus::Checking {
                self.set_status(ValidationStatus::Idle);
            }
            return;
        }
        let verdict = validation::evaluate(
            step,
            self.transcript.last_command(),
            self.transcript.last_output(),
        );
        let step_id = step.id.clone();
        match verdict {
            Verdict::Unvalidatable => {}
            Verdict::Passed => {
                self.transcript.record_check(StepCheck {
                    step_id,
                    passed: true,
                });
                self.complete_at(index, effects);
                self.set_status(ValidationStatus::Success);
                effects.push(Effect::Schedule(Timer::AutoAdvance {
                    generation: self.generation,
                }));
            }
            Verdict::Failed => {
                debug!("Step '{step_id}' not satisfied by '{}'", self.transcript.last_command());
                self.transcript.record_check(StepCheck {
                    step_id,
                    passed: false,
                });
                self.set_status(ValidationStatus::Error);
                effects.push(Effect::Schedule(Timer::StatusReset {
                    generation: self.generation,
                }));
            }
        }
    }

    fn complete_at(&mut self, index: usize, effects: &mut Vec<Effect>) {
        let Some(step) = self.steps.get_mut(index) else {
            return;
        };
        if step.completed {
            return;
        }
        step.completed = true;
        info!("Step '{}' completed in lab '{}'", step.id, self.lab_id);
        effects.push(Effect::StepCompleted {
            step_id: step.id.clone(),
        });

        if !self.lab_completed && self.is_complete() {
            self.lab_completed = true;
            info!("Lab '{}' completed", self.lab_id);
            effects.push(Effect::LabCompleted);
        }
    }

    fn navigate(&mut self, index: usize, effects: &mut Vec<Effect>) {
        if self.steps.is_empty() {
            return;
        }
        let last = self.steps.len() - 1;
        if index > last {
            warn!("Step index {index} out of range, clamping to {last}");
        }
        let index = index.min(last);
        if index != self.current {
            self.current = index;
            effects.push(Effect::StepChanged { index });
        }
        self.hints_visible = false;
        self.set_status(ValidationStatus::Idle);
    }

    fn toggle_hints(&mut self) {
        self.hints_visible = !self.hints_visible;
        if self.hints_visible {
            self.ensure_first_hint();
        }
    }

    fn reveal_hint(&mut self) {
        let Some(total) = self.current_step().map(|s| s.hints.len()) else {
            return;
        };
        if self.hints_visible {
            let revealed = &mut self.hints_revealed[self.current];
            *revealed = (*revealed + 1).min(total);
        } else {
            self.hints_visible = true;
            self.ensure_first_hint();
        }
    }

    fn ensure_first_hint(&mut self) {
        let has_hints = self.current_step().is_some_and(|s| !s.hints.is_empty());
        if has_hints && self.hints_revealed[self.current] == 0 {
            self.hints_revealed[self.current] = 1;
        }
    }

    fn reset(&mut self, effects: &mut Vec<Effect>) {
        info!("Resetting lab '{}'", self.lab_id);
        for step in &mut self.steps {
            step.completed = false;
        }
        self.current = 0;
        self.transcript.clear();
        self.in_flight = None;
        self.queue.clear();
        self.hints_visible = false;
        self.hints_revealed.iter_mut().for_each(|n| *n = 0);
        self.lab_completed = false;
        self.set_status(ValidationStatus::Idle);
        effects.push(Effect::SessionReset);
    }

    fn set_status(&mut self, status: ValidationStatus) {
        self.validation = status;
        self.generation += 1;
    }
}
