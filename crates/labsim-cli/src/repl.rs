//! Interactive lab session on the terminal.
//!
//! Lines starting with `:` are session commands; anything else goes to the
//! simulated shell. When stdin is not a terminal each command is run to
//! completion before the next line is read, so piped scripts behave
//! deterministically.

use std::io::IsTerminal;

use anyhow::Result;
use labsim_core::{
    display::StepBar,
    runner::{EventReceiver, LabRunner},
    session::{Effect, Event},
    ValidationStatus,
};
use log::debug;
use tokio::io::{self, AsyncBufReadExt, BufReader};

use crate::renderer::TerminalRenderer;

const HELP: &str = "# Session commands

- `:next` / `:prev`: move between steps
- `:goto N`: jump to step N
- `:hint`: reveal the next hint
- `:hints`: show or hide hints
- `:step`: show the current step again
- `:status`: show progress for the whole lab
- `:history`: list the commands run so far
- `:complete [STEP_ID]`: mark a step done without checking it
- `:reset`: start the lab over
- `:quit`: leave the session

Anything else is run in the simulated terminal.
";

/// A `:`-prefixed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    Next,
    Previous,
    /// One-based step number
    Goto(usize),
    Hint,
    Hints,
    Step,
    Status,
    History,
    Complete(Option<String>),
    Reset,
    Help,
    Quit,
}

/// Parses a session command. Returns `None` for shell input.
pub fn parse_meta(line: &str) -> Option<std::result::Result<MetaCommand, String>> {
    let rest = line.trim().strip_prefix(':')?;
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let argument = parts.next();

    let command = match name {
        "next" | "n" => Ok(MetaCommand::Next),
        "prev" | "previous" | "p" => Ok(MetaCommand::Previous),
        "goto" | "g" => match argument.map(str::parse::<usize>) {
            Some(Ok(number)) if number > 0 => Ok(MetaCommand::Goto(number)),
            _ => Err("Usage: :goto N (steps are numbered from 1)".to_string()),
        },
        "hint" => Ok(MetaCommand::Hint),
        "hints" => Ok(MetaCommand::Hints),
        "step" => Ok(MetaCommand::Step),
        "status" | "s" => Ok(MetaCommand::Status),
        "history" => Ok(MetaCommand::History),
        "complete" => Ok(MetaCommand::Complete(argument.map(str::to_string))),
        "reset" => Ok(MetaCommand::Reset),
        "help" | "h" | "?" => Ok(MetaCommand::Help),
        "quit" | "q" | "exit" => Ok(MetaCommand::Quit),
        other => Err(format!("Unknown command ':{other}'; type :help")),
    };
    Some(command)
}

/// Drives one lab session from stdin.
pub struct Repl {
    runner: LabRunner,
    renderer: TerminalRenderer,
    interactive: bool,
    last_status: ValidationStatus,
}

impl Repl {
    pub fn new(runner: LabRunner, renderer: TerminalRenderer) -> Self {
        Self {
            runner,
            renderer,
            interactive: std::io::stdin().is_terminal(),
            last_status: ValidationStatus::Idle,
        }
    }

    /// Runs until `:quit` or end of input, then lets pending output finish.
    ///
    /// The runner is dropped on return, which lets a progress recorder
    /// flush its remaining writes.
    pub async fn run(mut self, mut events: EventReceiver) -> Result<()> {
        self.renderer
            .render(&format!("# {}\n", self.runner.session().lab_title()))?;
        self.render_current_step()?;
        if self.interactive {
            self.renderer.render("*Type `:help` for session commands.*\n")?;
            self.renderer.prompt()?;
        }

        let mut lines = BufReader::new(io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line? {
                        Some(line) => {
                            if !self.handle_line(&line, &mut events).await? {
                                break;
                            }
                            self.prompt_if_idle()?;
                        }
                        None => break,
                    }
                }
                Some(event) = events.recv() => {
                    let effects = self.runner.dispatch(event);
                    if self.render_effects(&effects)? {
                        self.prompt_if_idle()?;
                    }
                }
            }
        }

        let effects = self.runner.run_until_settled(&mut events).await;
        self.render_effects(&effects)?;
        self.renderer
            .render(&format!("\n{}\n", self.runner.session().progress()))?;
        debug!("Session for '{}' finished", self.runner.session().lab_id());
        Ok(())
    }

    /// Returns false when the session should end.
    async fn handle_line(&mut self, line: &str, events: &mut EventReceiver) -> Result<bool> {
        match parse_meta(line) {
            Some(Ok(MetaCommand::Quit)) => return Ok(false),
            Some(Ok(command)) => self.handle_meta(command)?,
            Some(Err(message)) => self.renderer.status(&message, false)?,
            None => {
                let effects = self.runner.submit(line);
                self.render_effects(&effects)?;
                if !self.interactive {
                    let effects = self.runner.run_until_settled(events).await;
                    self.render_effects(&effects)?;
                }
            }
        }
        Ok(true)
    }

    fn handle_meta(&mut self, command: MetaCommand) -> Result<()> {
        match command {
            MetaCommand::Next => self.move_to(Event::Next, "Already at the last step")?,
            MetaCommand::Previous => self.move_to(Event::Previous, "Already at the first step")?,
            MetaCommand::Goto(number) => {
                let effects = self.runner.dispatch(Event::Navigate(number - 1));
                if !self.render_effects(&effects)? {
                    self.render_current_step()?;
                }
            }
            MetaCommand::Hint => {
                self.runner.dispatch(Event::RevealHint);
                self.render_hints()?;
            }
            MetaCommand::Hints => {
                self.runner.dispatch(Event::ToggleHints);
                if self.runner.session().hints_visible() {
                    self.render_hints()?;
                } else {
                    self.renderer.status("Hints hidden", true)?;
                }
            }
            MetaCommand::Step => self.render_current_step()?,
            MetaCommand::Status => self.renderer.render(&self.runner.snapshot().to_string())?,
            MetaCommand::History => {
                let transcript = self.runner.session().transcript();
                if transcript.is_empty() {
                    self.renderer.status("No commands yet", true)?;
                } else {
                    for entry in transcript.entries() {
                        self.renderer.output(entry.to_string().trim_end())?;
                    }
                }
            }
            MetaCommand::Complete(step_id) => {
                let session = self.runner.session();
                let step_id = step_id.or_else(|| session.current_step().map(|s| s.id.clone()));
                let Some(id) = step_id else {
                    return self.renderer.status("This lab has no steps", false);
                };
                match self.runner.complete_step(&id) {
                    Ok(effects) => {
                        self.render_effects(&effects)?;
                    }
                    Err(e) => self.renderer.status(&e.to_string(), false)?,
                }
            }
            MetaCommand::Reset => {
                let effects = self.runner.dispatch(Event::Reset);
                self.render_effects(&effects)?;
            }
            MetaCommand::Help => self.renderer.render(HELP)?,
            MetaCommand::Quit => {}
        }
        Ok(())
    }

    fn move_to(&mut self, event: Event, at_edge: &str) -> Result<()> {
        let effects = self.runner.dispatch(event);
        if !self.render_effects(&effects)? {
            self.renderer.status(at_edge, false)?;
        }
        Ok(())
    }

    /// Renders effects and any validation status change. Returns true if
    /// anything was printed.
    fn render_effects(&mut self, effects: &[Effect]) -> Result<bool> {
        let mut printed = false;
        for effect in effects {
            match effect {
                Effect::Output(text) => {
                    if !text.is_empty() {
                        self.renderer.output(text)?;
                    }
                }
                Effect::ClearScreen => self.renderer.clear_screen()?,
                Effect::CommandQueued(command) => {
                    self.renderer.status(&format!("(queued) {command}"), true)?
                }
                Effect::CommandRejected(command) => self.renderer.status(
                    &format!("Too many pending commands; dropped '{command}'"),
                    false,
                )?,
                Effect::StepCompleted { step_id } => {
                    let title = self
                        .runner
                        .session()
                        .steps()
                        .iter()
                        .find(|step| &step.id == step_id)
                        .map_or(step_id.as_str(), |step| step.title.as_str());
                    self.renderer
                        .status(&format!("✓ Step complete: {title}"), true)?;
                }
                Effect::LabCompleted => {
                    self.renderer.render(&format!(
                        "\n# 🏆 Lab complete!\n\n{}\n",
                        self.runner.session().progress()
                    ))?;
                }
                Effect::StepChanged { .. } => self.render_current_step()?,
                Effect::SessionReset => {
                    self.renderer.status("Lab reset", true)?;
                    self.render_current_step()?;
                }
                Effect::CommandAccepted(_) | Effect::Schedule(_) => continue,
            }
            printed = true;
        }

        let status = self.runner.session().validation_status();
        if status != self.last_status {
            self.last_status = status;
            if let (Some(message), ValidationStatus::Success | ValidationStatus::Error) =
                (status.message(), status)
            {
                self.renderer
                    .status(message, status == ValidationStatus::Success)?;
                printed = true;
            }
        }
        Ok(printed)
    }

    fn render_current_step(&self) -> Result<()> {
        let snapshot = self.runner.snapshot();
        let Some(step) = self.runner.session().current_step() else {
            return Ok(());
        };
        self.renderer.render(&format!(
            "\n{}  Step {} of {}\n\n{step}",
            StepBar(&snapshot),
            snapshot.current_step_index + 1,
            snapshot.steps.len()
        ))
    }

    fn render_hints(&self) -> Result<()> {
        let session = self.runner.session();
        let total = session.current_step().map_or(0, |step| step.hints.len());
        if total == 0 {
            return self.renderer.status("No hints for this step", false);
        }
        let mut text = String::from("## Hints\n\n");
        for (index, hint) in session.revealed_hints().iter().enumerate() {
            text.push_str(&format!("{}. {hint}\n", index + 1));
        }
        text.push_str(&format!(
            "\n*Hint {} of {}*\n",
            session.revealed_hints().len(),
            total
        ));
        self.renderer.render(&text)
    }

    fn prompt_if_idle(&self) -> Result<()> {
        if self.interactive && !self.runner.session().is_busy() {
            self.renderer.prompt()?;
        }
        Ok(())
    }
}
