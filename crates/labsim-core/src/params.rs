//! Parameter structures shared by the CLI and the MCP server.
//!
//! These structs carry no framework derives beyond serde. The CLI converts
//! its clap `Args` into them; the MCP server wraps them transparently and
//! derives JSON schemas when the `schema` feature is enabled.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for operations on a single lab.
///
/// Used for show_lab, start_lab and the progress operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct LabRef {
    /// Catalog ID of the lab (e.g. `linux-basics-lab`)
    pub lab_id: String,
}

/// Parameters for submitting a shell command to the active session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct RunCommand {
    /// The command line, as the learner would type it
    pub command: String,
}

/// Parameters for jumping to a step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Navigate {
    /// Zero-based step index; out-of-range values are clamped to the last
    /// step
    pub index: usize,
}

/// Parameters for completing a step without validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CompleteStep {
    /// Step ID to complete; defaults to the current step
    #[serde(default)]
    pub step_id: Option<String>,
}
