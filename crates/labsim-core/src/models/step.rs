//! Step model definition and validation rules.

use serde::{Deserialize, Serialize};

use super::StepStatus;

fn default_points() -> u32 {
    10
}

/// One instructional unit of an interactive lab.
///
/// Steps are deserialized from lab definition files using camelCase keys
/// (`expectedCommands`, `validationRules`). A session works on its own copy;
/// only `completed` ever changes at runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Identifier, unique within the lab
    pub id: String,

    /// Brief title of the step
    pub title: String,

    /// Longer description of the goal
    #[serde(default)]
    pub description: String,

    /// Ordered instructions, display only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instructions: Vec<String>,

    /// Hints, revealed one at a time
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,

    /// Reference commands shown to the learner; never enforced
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected_commands: Vec<String>,

    /// Rules that must all pass for the step to complete
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_rules: Vec<ValidationRule>,

    /// Score awarded on completion
    #[serde(default = "default_points")]
    pub points: u32,

    /// Whether the step has been solved in this session
    #[serde(default)]
    pub completed: bool,
}

impl Step {
    /// Creates a pending step with no rules, instructions or hints.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            instructions: Vec::new(),
            hints: Vec::new(),
            expected_commands: Vec::new(),
            validation_rules: Vec::new(),
            points: default_points(),
            completed: false,
        }
    }

    /// Appends a validation rule.
    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.validation_rules.push(rule);
        self
    }

    /// Appends a hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn status(&self) -> StepStatus {
        if self.completed {
            StepStatus::Completed
        } else {
            StepStatus::Pending
        }
    }

    /// True if the step carries at least one rule and can therefore be
    /// solved by submitting commands.
    pub fn is_validatable(&self) -> bool {
        !self.validation_rules.is_empty()
    }
}

/// What a validation rule is tested against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Regex against the last command
    Command,
    /// Regex against the last output
    Output,
    /// Heuristic: the last command created something (`touch`/`mkdir`).
    /// The pattern is not checked against the created path.
    FileExists,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Command => "command",
            RuleKind::Output => "output",
            RuleKind::FileExists => "file_exists",
        }
    }
}

/// A single pattern-based check attached to a step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationRule {
    #[serde(rename = "type")]
    pub kind: RuleKind,

    /// Regex source, matched case-insensitively
    pub pattern: String,

    /// Human description of what the rule checks
    #[serde(default)]
    pub description: String,
}

impl ValidationRule {
    pub fn command(pattern: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Command,
            pattern: pattern.into(),
            description: String::new(),
        }
    }

    pub fn output(pattern: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Output,
            pattern: pattern.into(),
            description: String::new(),
        }
    }

    pub fn file_exists(pattern: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::FileExists,
            pattern: pattern.into(),
            description: String::new(),
        }
    }
}
