//! Display implementations for domain models.
//!
//! Output is markdown so the CLI can render it with termimad and the MCP
//! server can return it verbatim.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    catalog::LabSummary,
    models::{
        Achievement, LabDefinition, LabProgress, ProgressSummary, SessionStatus, Step, StepStatus,
        TranscriptEntry, ValidationStatus,
    },
};

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl fmt::Display for LabDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.title)?;
        writeln!(f)?;

        writeln!(f, "- ID: {}", self.id)?;
        if let Some(difficulty) = &self.difficulty {
            writeln!(f, "- Difficulty: {difficulty}")?;
        }
        if let Some(minutes) = self.estimated_minutes {
            writeln!(f, "- Estimated time: {minutes} min")?;
        }
        writeln!(
            f,
            "- Steps: {} ({} points)",
            self.steps.len(),
            self.total_points()
        )?;
        if !self.tags.is_empty() {
            writeln!(f, "- Tags: {}", self.tags.join(", "))?;
        }

        if !self.description.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.description)?;
        }

        writeln!(f, "\n## Steps")?;
        writeln!(f)?;
        for (index, step) in self.steps.iter().enumerate() {
            writeln!(
                f,
                "{}. **{}** ({} points)",
                index + 1,
                step.title,
                step.points
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} ({})", self.title, self.status().with_icon())?;
        writeln!(f)?;

        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
            writeln!(f)?;
        }

        if !self.instructions.is_empty() {
            writeln!(f, "### Instructions")?;
            writeln!(f)?;
            for (index, instruction) in self.instructions.iter().enumerate() {
                writeln!(f, "{}. {instruction}", index + 1)?;
            }
            writeln!(f)?;
        }

        if !self.is_validatable() {
            writeln!(f, "*This step is checked manually; use `:complete` when done.*")?;
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Display for LabSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (`{}`)", self.title, self.id)?;
        writeln!(f)?;

        if let Some(difficulty) = &self.difficulty {
            writeln!(f, "- **Difficulty**: {difficulty}")?;
        }
        writeln!(
            f,
            "- **Steps**: {} ({} points)",
            self.total_steps, self.total_points
        )?;
        if let Some(minutes) = self.estimated_minutes {
            writeln!(f, "- **Estimated**: {minutes} min")?;
        }
        if !self.tags.is_empty() {
            writeln!(f, "- **Tags**: {}", self.tags.join(", "))?;
        }
        writeln!(f)?;

        Ok(())
    }
}

impl fmt::Display for ProgressSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Progress: {}/{} steps ({}%), {}/{} points",
            self.completed, self.total, self.percentage, self.points_earned, self.points_total
        )?;
        if !self.achievements.is_empty() {
            let labels: Vec<&str> = self.achievements.iter().map(|a| a.label()).collect();
            write!(f, " | {}", labels.join(" "))?;
        }
        Ok(())
    }
}

impl fmt::Display for LabProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} ({})", self.lab_id, self.status)?;
        writeln!(f)?;

        writeln!(f, "- **Steps completed**: {}", self.steps_completed)?;
        writeln!(f, "- **Points**: {}", self.points_earned)?;
        writeln!(f, "- **Commands**: {}", self.commands_executed)?;
        writeln!(f, "- **Started**: {}", LocalDateTime(&self.started_at))?;
        writeln!(f, "- **Updated**: {}", LocalDateTime(&self.updated_at))?;
        if let Some(completed_at) = &self.completed_at {
            writeln!(f, "- **Completed**: {}", LocalDateTime(completed_at))?;
        }

        if !self.completed_steps.is_empty() {
            writeln!(f)?;
            for step in &self.completed_steps {
                writeln!(
                    f,
                    "- ✓ `{}` at {}",
                    step.step_id,
                    LocalDateTime(&step.completed_at)
                )?;
            }
        }
        writeln!(f)?;

        Ok(())
    }
}

impl fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "$ {}", self.command)?;
        if !self.output.is_empty() {
            writeln!(f, "{}", self.output)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidationRule;

    #[test]
    fn test_step_display_lists_instructions() {
        let mut step = Step::new("perm", "Make it executable")
            .with_rule(ValidationRule::command("chmod"));
        step.instructions = vec!["Add u+x".to_string(), "Keep others".to_string()];

        let text = step.to_string();
        assert!(text.starts_with("## Make it executable (○ Pending)"));
        assert!(text.contains("1. Add u+x"));
        assert!(text.contains("2. Keep others"));
        assert!(!text.contains(":complete"));
    }

    #[test]
    fn test_manual_step_mentions_complete() {
        let text = Step::new("read", "Read the docs").to_string();
        assert!(text.contains(":complete"));
    }

    #[test]
    fn test_progress_summary_line() {
        let mut steps = vec![Step::new("a", "A"), Step::new("b", "B")];
        steps[0].completed = true;
        let text = ProgressSummary::from_steps(&steps).to_string();
        assert_eq!(
            text,
            "Progress: 1/2 steps (50%), 10/20 points | First Step! 🎯 Halfway There! 🌟"
        );
    }

    #[test]
    fn test_transcript_entry_omits_empty_output() {
        let entry = TranscriptEntry {
            command: "cd /tmp".to_string(),
            output: String::new(),
            recorded_at: jiff::Timestamp::now(),
            check: None,
        };
        assert_eq!(entry.to_string(), "$ cd /tmp\n");
    }
}
