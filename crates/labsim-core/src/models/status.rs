//! Status enumerations for steps, sessions and validation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Completion state of a single step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Step has not been solved yet
    #[default]
    Pending,

    /// Step has been solved
    Completed,
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(StepStatus::Pending),
            "completed" | "done" => Ok(StepStatus::Completed),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl StepStatus {
    /// Convert to the string representation used in storage and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Completed => "completed",
        }
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// ```rust
    /// use labsim_core::models::StepStatus;
    ///
    /// assert_eq!(StepStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(StepStatus::Pending.with_icon(), "○ Pending");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepStatus::Completed => "✓ Completed",
            StepStatus::Pending => "○ Pending",
        }
    }

    /// Single-character icon used in compact navigation bars.
    pub fn icon(&self) -> &'static str {
        match self {
            StepStatus::Completed => "✓",
            StepStatus::Pending => "○",
        }
    }
}

/// Overall state of a lab session (or a stored progress record).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// At least one step is still pending
    #[default]
    InProgress,

    /// Every step is completed; only a reset leaves this state
    Complete,
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_progress" | "inprogress" => Ok(SessionStatus::InProgress),
            "complete" | "completed" => Ok(SessionStatus::Complete),
            _ => Err(format!("Invalid session status: {s}")),
        }
    }
}

impl SessionStatus {
    /// Convert to the string representation used in storage and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Complete => "complete",
        }
    }
}

/// Transient outcome of the most recent validation attempt.
///
/// `Success` and `Error` settle back to `Idle` after a fixed delay.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    #[default]
    Idle,
    /// A command is in flight and its output will be validated
    Checking,
    Success,
    Error,
}

impl ValidationStatus {
    /// Convert to the string representation used in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Idle => "idle",
            ValidationStatus::Checking => "checking",
            ValidationStatus::Success => "success",
            ValidationStatus::Error => "error",
        }
    }

    /// User-facing message for the status, if any is shown.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            ValidationStatus::Idle => None,
            ValidationStatus::Checking => Some("Checking your solution..."),
            ValidationStatus::Success => Some("Great job! Moving to next step..."),
            ValidationStatus::Error => Some("Not quite right. Try again or check the hints."),
        }
    }
}
