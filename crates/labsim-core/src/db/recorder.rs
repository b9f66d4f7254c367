//! Observer that persists session progress.

use std::collections::HashMap;

use log::{debug, warn};
use tokio::{sync::mpsc, task::JoinHandle};

use super::ProgressStore;
use crate::{models::LabDefinition, runner::LabObserver};

#[derive(Debug)]
enum ProgressWrite {
    Command,
    StepCompleted { step_id: String, points: u32 },
    LabCompleted,
}

/// [`LabObserver`] that writes commands and completions to a
/// [`ProgressStore`].
///
/// Callbacks only enqueue; a background task applies the writes in order.
/// The task finishes once every clone of the recorder is dropped, so
/// awaiting its handle after dropping the runner flushes all writes.
#[derive(Debug, Clone)]
pub struct ProgressRecorder {
    writes: mpsc::UnboundedSender<ProgressWrite>,
    points: HashMap<String, u32>,
}

impl ProgressRecorder {
    /// Starts the writer task for `lab`. Must be called inside a tokio
    /// runtime.
    pub fn spawn(store: ProgressStore, lab: &LabDefinition) -> (Self, JoinHandle<()>) {
        let (writes, mut rx) = mpsc::unbounded_channel();
        let lab_id = lab.id.clone();
        let handle = tokio::spawn(async move {
            while let Some(write) = rx.recv().await {
                debug!("Recording {write:?} for '{lab_id}'");
                let result = match write {
                    ProgressWrite::Command => store.record_command(&lab_id).await,
                    ProgressWrite::StepCompleted { step_id, points } => store
                        .record_step_completion(&lab_id, &step_id, points)
                        .await
                        .map(|_| ()),
                    ProgressWrite::LabCompleted => store.record_lab_completion(&lab_id).await,
                };
                if let Err(e) = result {
                    warn!("Failed to record progress for '{lab_id}': {e}");
                }
            }
        });

        let points = lab
            .steps
            .iter()
            .map(|s| (s.id.clone(), s.points))
            .collect();
        (Self { writes, points }, handle)
    }

    fn send(&self, write: ProgressWrite) {
        if self.writes.send(write).is_err() {
            warn!("Progress writer has stopped; dropping update");
        }
    }
}

impl LabObserver for ProgressRecorder {
    fn on_command(&self, _lab_id: &str, _command: &str) {
        self.send(ProgressWrite::Command);
    }

    fn on_step_complete(&self, _lab_id: &str, step_id: &str) {
        let points = self.points.get(step_id).copied().unwrap_or_default();
        self.send(ProgressWrite::StepCompleted {
            step_id: step_id.to_string(),
            points,
        });
    }

    fn on_lab_complete(&self, _lab_id: &str) {
        self.send(ProgressWrite::LabCompleted);
    }
}
