//! Transcript entry model.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Outcome of checking a command against the step that was current when its
/// output arrived.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StepCheck {
    pub step_id: String,
    pub passed: bool,
}

/// One interpreted command and the output it produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptEntry {
    pub command: String,
    pub output: String,
    pub recorded_at: Timestamp,
    /// Absent when the command was not checked (completed or manual step, `clear`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<StepCheck>,
}
