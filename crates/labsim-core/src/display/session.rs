//! Display for session snapshots.

use std::fmt;

use crate::{models::StepStatus, session::SessionSnapshot};

/// Step navigation bar: one icon per step, the current one bracketed.
///
/// ```rust
/// use labsim_core::{
///     display::StepBar,
///     models::{LabDefinition, Step},
///     session::LabSession,
/// };
///
/// let lab = LabDefinition::new("demo", "Demo", vec![Step::new("a", "A"), Step::new("b", "B")]);
/// let snapshot = LabSession::new(&lab).snapshot();
/// assert_eq!(StepBar(&snapshot).to_string(), "[○] ○");
/// ```
pub struct StepBar<'a>(pub &'a SessionSnapshot);

impl fmt::Display for StepBar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icons: Vec<String> = self
            .0
            .steps
            .iter()
            .map(|step| {
                if step.index == self.0.current_step_index {
                    format!("[{}]", step.status.icon())
                } else {
                    step.status.icon().to_string()
                }
            })
            .collect();
        write!(f, "{}", icons.join(" "))
    }
}

impl fmt::Display for SessionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.lab_title)?;
        writeln!(f)?;
        writeln!(f, "- Status: {}", self.status)?;
        writeln!(f, "- {}", self.progress)?;
        writeln!(f, "- Steps: {}", StepBar(self))?;
        if let Some(message) = self.validation.message() {
            writeln!(f, "- Validation: {message}")?;
        }
        if self.queued_commands > 0 {
            writeln!(f, "- Queued commands: {}", self.queued_commands)?;
        }
        writeln!(f)?;

        for step in &self.steps {
            let marker = if step.index == self.current_step_index {
                "▶"
            } else {
                " "
            };
            let title = if step.status == StepStatus::Completed {
                format!("~~{}~~", step.title)
            } else {
                step.title.clone()
            };
            writeln!(
                f,
                "{marker} {}. {} {title} ({} points)",
                step.index + 1,
                step.status.icon(),
                step.points
            )?;
        }

        if self.hints.visible && !self.hints.revealed.is_empty() {
            writeln!(f, "\n## Hints")?;
            writeln!(f)?;
            for (index, hint) in self.hints.revealed.iter().enumerate() {
                writeln!(f, "{}. {hint}", index + 1)?;
            }
            if self.hints.revealed.len() < self.hints.total {
                writeln!(
                    f,
                    "\n*Hint {} of {}; use `:hint` for the next one.*",
                    self.hints.revealed.len(),
                    self.hints.total
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        models::{LabDefinition, Step, ValidationRule},
        session::{Event, LabSession},
    };

    use super::*;

    fn session() -> LabSession {
        let lab = LabDefinition::new(
            "demo",
            "Demo Lab",
            vec![
                Step::new("a", "First")
                    .with_rule(ValidationRule::command("pwd"))
                    .with_hint("one")
                    .with_hint("two"),
                Step::new("b", "Second"),
            ],
        );
        LabSession::new(&lab)
    }

    #[test]
    fn test_snapshot_display_marks_current_step() {
        let mut session = session();
        session.handle(Event::Next);
        let text = session.snapshot().to_string();
        assert!(text.starts_with("# Demo Lab"));
        assert!(text.contains("▶ 2. ○ Second"));
        assert!(text.contains("  1. ○ First"));
        assert!(!text.contains("## Hints"));
    }

    #[test]
    fn test_snapshot_display_shows_revealed_hints() {
        let mut session = session();
        session.handle(Event::RevealHint);
        let text = session.snapshot().to_string();
        assert!(text.contains("## Hints"));
        assert!(text.contains("1. one"));
        assert!(text.contains("Hint 1 of 2"));
    }
}
