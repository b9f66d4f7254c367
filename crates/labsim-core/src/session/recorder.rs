//! Command transcript for a session.

use jiff::Timestamp;

use crate::models::{StepCheck, TranscriptEntry};

/// Append-only record of interpreted commands.
///
/// The transcript is the single source of "what just happened" for the
/// evaluator. Only [`Transcript::clear`] (called on session reset) removes
/// entries.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command/output pair, which also becomes the last pair.
    pub fn record(&mut self, command: impl Into<String>, output: impl Into<String>) {
        self.entries.push(TranscriptEntry {
            command: command.into(),
            output: output.into(),
            recorded_at: Timestamp::now(),
            check: None,
        });
    }

    /// Attaches a validation outcome to the most recent entry.
    pub fn record_check(&mut self, check: StepCheck) {
        if let Some(entry) = self.entries.last_mut() {
            entry.check = Some(check);
        }
    }

    /// Raw commands in submission order.
    pub fn history(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.command.clone()).collect()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Most recent command, or `""` before the first one.
    pub fn last_command(&self) -> &str {
        self.entries.last().map_or("", |e| e.command.as_str())
    }

    /// Most recent output, or `""` before the first command.
    pub fn last_output(&self) -> &str {
        self.entries.last().map_or("", |e| e.output.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_overwrites_last_pair() {
        let mut transcript = Transcript::new();
        assert_eq!(transcript.last_command(), "");
        assert_eq!(transcript.last_output(), "");

        transcript.record("pwd", "/home/student");
        transcript.record("whoami", "student");

        assert_eq!(transcript.last_command(), "whoami");
        assert_eq!(transcript.last_output(), "student");
        assert_eq!(transcript.history(), vec!["pwd", "whoami"]);
    }

    #[test]
    fn test_check_attaches_to_last_entry() {
        let mut transcript = Transcript::new();
        transcript.record_check(StepCheck {
            step_id: "ignored".to_string(),
            passed: true,
        });
        assert!(transcript.is_empty());

        transcript.record("pwd", "/home/student");
        transcript.record("whoami", "student");
        transcript.record_check(StepCheck {
            step_id: "who".to_string(),
            passed: false,
        });

        let entries = transcript.entries();
        assert_eq!(entries[0].check, None);
        assert_eq!(
            entries[1].check,
            Some(StepCheck {
                step_id: "who".to_string(),
                passed: false,
            })
        );
    }

    #[test]
    fn test_clear_empties_history() {
        let mut transcript = Transcript::new();
        transcript.record("ls", "my-lab");
        transcript.clear();
        assert!(transcript.is_empty());
        assert_eq!(transcript.last_command(), "");
    }

    #[test]
    fn test_entries_carry_timestamps_in_order() {
        let mut transcript = Transcript::new();
        transcript.record("a", "");
        transcript.record("b", "");
        let entries = transcript.entries();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].recorded_at <= entries[1].recorded_at);
    }
}
