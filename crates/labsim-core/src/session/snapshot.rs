//! Read-only session view for renderers and the MCP server.

use serde::Serialize;

use super::LabSession;
use crate::models::{ProgressSummary, SessionStatus, StepStatus, TranscriptEntry, ValidationStatus};

/// Per-step line of the step list.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub status: StepStatus,
    pub points: u32,
}

/// Hint state of the current step.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HintState {
    pub visible: bool,
    pub revealed: Vec<String>,
    pub total: usize,
}

/// Everything a UI needs to draw a session, detached from the session.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub lab_id: String,
    pub lab_title: String,
    pub status: SessionStatus,
    pub current_step_index: usize,
    pub current_step_id: Option<String>,
    pub validation: ValidationStatus,
    pub steps: Vec<StepView>,
    pub hints: HintState,
    pub history: Vec<TranscriptEntry>,
    pub progress: ProgressSummary,
    pub queued_commands: usize,
}

impl SessionSnapshot {
    pub(super) fn from_session(session: &LabSession) -> Self {
        let steps = session
            .steps()
            .iter()
            .enumerate()
            .map(|(index, step)| StepView {
                index,
                id: step.id.clone(),
                title: step.title.clone(),
                status: step.status(),
                points: step.points,
            })
            .collect();

        Self {
            lab_id: session.lab_id().to_string(),
            lab_title: session.lab_title().to_string(),
            status: session.session_status(),
            current_step_index: session.current_index(),
            current_step_id: session.current_step().map(|s| s.id.clone()),
            validation: session.validation_status(),
            steps,
            hints: HintState {
                visible: session.hints_visible(),
                revealed: session.revealed_hints().to_vec(),
                total: session.current_step().map_or(0, |s| s.hints.len()),
            },
            history: session.transcript().entries().to_vec(),
            progress: session.progress(),
            queued_commands: session.queued_commands(),
        }
    }
}
