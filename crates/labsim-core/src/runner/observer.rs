//! Collaborator callbacks.

use log::{debug, info};

/// Receives notifications from a [`LabRunner`](super::LabRunner).
///
/// Callbacks run synchronously on the runner's task and must not block.
/// Every method has an empty default so observers implement only what they
/// need.
pub trait LabObserver: Send + Sync {
    /// A command started executing.
    fn on_command(&self, _lab_id: &str, _command: &str) {}

    /// A command finished; `output` is empty for `clear`.
    fn on_output(&self, _lab_id: &str, _command: &str, _output: &str) {}

    /// Exactly once per step completion.
    fn on_step_complete(&self, _lab_id: &str, _step_id: &str) {}

    /// Exactly once when the last pending step is completed.
    fn on_lab_complete(&self, _lab_id: &str) {}
}

/// Logs every callback through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl LabObserver for LogObserver {
    fn on_command(&self, lab_id: &str, command: &str) {
        debug!("[{lab_id}] $ {command}");
    }

    fn on_output(&self, lab_id: &str, command: &str, output: &str) {
        debug!("[{lab_id}] {command} -> {} bytes", output.len());
    }

    fn on_step_complete(&self, lab_id: &str, step_id: &str) {
        info!("[{lab_id}] step '{step_id}' complete");
    }

    fn on_lab_complete(&self, lab_id: &str) {
        info!("[{lab_id}] lab complete");
    }
}
