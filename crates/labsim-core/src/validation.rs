//! Validation rule evaluation.
//!
//! A step passes when every one of its rules passes against the most recent
//! command/output pair. Evaluation has no side effects; the session decides
//! what a verdict means.

use log::warn;
use regex::RegexBuilder;
use serde::Serialize;

use crate::models::{RuleKind, Step, ValidationRule};

/// Outcome of evaluating a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The step has no rules; it can only be completed explicitly
    Unvalidatable,
    Passed,
    Failed,
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Passed)
    }
}

/// Evaluates all of `step`'s rules (logical AND).
///
/// A step without rules yields [`Verdict::Unvalidatable`] rather than a
/// vacuous pass.
pub fn evaluate(step: &Step, last_command: &str, last_output: &str) -> Verdict {
    if !step.is_validatable() {
        return Verdict::Unvalidatable;
    }
    let all = step
        .validation_rules
        .iter()
        .all(|rule| rule_passes(rule, last_command, last_output));
    if all {
        Verdict::Passed
    } else {
        Verdict::Failed
    }
}

/// Boolean form of [`evaluate`]; unvalidatable steps never pass.
pub fn passes(step: &Step, last_command: &str, last_output: &str) -> bool {
    evaluate(step, last_command, last_output).is_pass()
}

/// Tests a single rule.
///
/// `file_exists` is a heuristic: any command containing `touch` or `mkdir`
/// counts, whatever path it names. The rule's pattern is not consulted.
pub fn rule_passes(rule: &ValidationRule, last_command: &str, last_output: &str) -> bool {
    match rule.kind {
        RuleKind::Command => matches_pattern(&rule.pattern, last_command),
        RuleKind::Output => matches_pattern(&rule.pattern, last_output),
        RuleKind::FileExists => last_command.contains("touch") || last_command.contains("mkdir"),
    }
}

fn matches_pattern(pattern: &str, haystack: &str) -> bool {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(re) => re.is_match(haystack),
        Err(e) => {
            warn!("Ignoring invalid validation pattern '{pattern}': {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_with(rules: Vec<ValidationRule>) -> Step {
        let mut step = Step::new("s", "Step");
        step.validation_rules = rules;
        step
    }

    #[test]
    fn test_command_rule_is_case_insensitive() {
        let step = step_with(vec![ValidationRule::command("pwd")]);
        assert_eq!(evaluate(&step, "pwd", ""), Verdict::Passed);
        assert_eq!(evaluate(&step, "PWD", ""), Verdict::Passed);
        assert_eq!(evaluate(&step, "ls", ""), Verdict::Failed);
    }

    #[test]
    fn test_chmod_rule_rejects_wrong_mode() {
        let step = step_with(vec![ValidationRule::command(r"chmod.*u\+x.*backup\.sh")]);
        assert!(!passes(&step, "chmod 777 x", ""));
        assert!(passes(&step, "chmod u+x backup.sh", ""));
    }

    #[test]
    fn test_output_rule_matches_last_output() {
        let step = step_with(vec![ValidationRule::output("^/home/student$")]);
        assert!(passes(&step, "pwd", "/home/student"));
        assert!(!passes(&step, "pwd", "/root"));
    }

    #[test]
    fn test_file_exists_heuristic_ignores_pattern() {
        let step = step_with(vec![ValidationRule::file_exists("notes.txt")]);
        assert!(passes(&step, "touch something-else.txt", ""));
        assert!(passes(&step, "mkdir dir", ""));
        assert!(!passes(&step, "ls notes.txt", ""));
    }

    #[test]
    fn test_all_rules_must_pass() {
        let step = step_with(vec![
            ValidationRule::command("^cat"),
            ValidationRule::output("ERROR"),
        ]);
        assert!(passes(&step, "cat server.log", "ERROR: Connection failed"));
        assert!(!passes(&step, "cat notes.txt", "Learning Linux commands"));
        assert!(!passes(&step, "grep ERROR server.log", "ERROR: Connection failed"));
    }

    #[test]
    fn test_empty_rules_are_unvalidatable() {
        let step = step_with(Vec::new());
        assert_eq!(evaluate(&step, "pwd", "/home/student"), Verdict::Unvalidatable);
        assert!(!passes(&step, "pwd", "/home/student"));
    }

    #[test]
    fn test_invalid_pattern_fails_rule() {
        let step = step_with(vec![ValidationRule::command("chmod (")]);
        assert_eq!(evaluate(&step, "chmod (", ""), Verdict::Failed);
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let step = step_with(vec![ValidationRule::command("pwd")]);
        let first = evaluate(&step, "pwd", "/home/student");
        let second = evaluate(&step, "pwd", "/home/student");
        assert_eq!(first, second);
        assert!(!step.completed);
    }
}
