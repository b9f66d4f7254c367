//! Progress summaries, achievements and stored progress records.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{SessionStatus, Step};

/// Milestones reached while working through a lab.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Achievement {
    /// At least one step completed
    FirstStep,
    /// At least half of the steps completed (labs with two or more steps)
    Halfway,
    /// Every step completed
    Complete,
}

impl Achievement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Achievement::FirstStep => "first-step",
            Achievement::Halfway => "halfway",
            Achievement::Complete => "complete",
        }
    }

    /// Celebration label shown when the achievement is reached.
    pub fn label(&self) -> &'static str {
        match self {
            Achievement::FirstStep => "First Step! 🎯",
            Achievement::Halfway => "Halfway There! 🌟",
            Achievement::Complete => "Lab Complete! 🏆",
        }
    }
}

/// Point-in-time view of completion across a session's steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub completed: usize,
    pub total: usize,
    /// Rounded completion percentage, 0..=100
    pub percentage: u8,
    pub points_earned: u32,
    pub points_total: u32,
    pub achievements: Vec<Achievement>,
}

impl ProgressSummary {
    /// Computes the summary for a slice of steps.
    pub fn from_steps(steps: &[Step]) -> Self {
        let total = steps.len();
        let completed = steps.iter().filter(|s| s.completed).count();
        let percentage = if total == 0 {
            0
        } else {
            ((completed * 100 + total / 2) / total) as u8
        };
        let points_earned = steps.iter().filter(|s| s.completed).map(|s| s.points).sum();
        let points_total = steps.iter().map(|s| s.points).sum();

        let mut achievements = Vec::new();
        if completed >= 1 {
            achievements.push(Achievement::FirstStep);
        }
        // Rounds down: 1 of 3 steps counts
        if total >= 2 && completed >= total / 2 {
            achievements.push(Achievement::Halfway);
        }
        if total > 0 && completed == total {
            achievements.push(Achievement::Complete);
        }

        Self {
            completed,
            total,
            percentage,
            points_earned,
            points_total,
            achievements,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Stored progress of one lab, as written by the progress recorder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabProgress {
    pub lab_id: String,
    pub status: SessionStatus,
    pub steps_completed: u32,
    pub commands_executed: u32,
    pub points_earned: u32,
    pub started_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
    /// Completed step IDs, oldest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub completed_steps: Vec<StepCompletion>,
}

/// A stored step completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepCompletion {
    pub step_id: String,
    pub completed_at: Timestamp,
}
