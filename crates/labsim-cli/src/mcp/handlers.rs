//! MCP tool handler implementations

use std::{sync::Arc, time::Duration};

use labsim_core::{
    display::{LabSummaries, OperationStatus, StepBar},
    params as core,
    runner::{EventReceiver, LabRunner, LabRunnerBuilder, LogObserver, Timing},
    session::{Effect, Event},
    Catalog, ProgressRecorder, ProgressStore, ValidationStatus,
};
use log::{debug, warn};
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::{sync::Mutex, task::JoinHandle, time::timeout};

use super::errors::{no_active_lab, to_mcp_error};

/// Longest a `run_command` call waits for its output.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Generic Parameter Wrapper
// ============================================================================
//
// Core parameter types stay free of MCP concerns. This transparent wrapper
// adds the JsonSchema impl rmcp needs by delegating to the wrapped type.

/// Generic MCP wrapper for core parameter types
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type LabRef = McpParams<core::LabRef>;
pub type RunCommand = McpParams<core::RunCommand>;
pub type Navigate = McpParams<core::Navigate>;
pub type CompleteStep = McpParams<core::CompleteStep>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text_result(text: impl Into<String>) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(text.into())]))
}

// ============================================================================
// Shared Server State
// ============================================================================

/// The session currently driven over MCP.
///
/// A background task feeds timer events into the runner. Dropping the lab
/// stops that task, which releases the runner and any progress recorder.
pub struct ActiveLab {
    runner: Arc<Mutex<LabRunner>>,
    pump: JoinHandle<()>,
}

impl Drop for ActiveLab {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

async fn pump_events(runner: Arc<Mutex<LabRunner>>, mut events: EventReceiver) {
    while let Some(event) = events.recv().await {
        runner.lock().await.dispatch(event);
    }
}

/// State shared by every tool call.
pub struct ServerState {
    pub catalog: Catalog,
    pub store: Option<ProgressStore>,
    pub timing: Timing,
    pub active: Mutex<Option<ActiveLab>>,
}

impl ServerState {
    pub fn new(catalog: Catalog, store: Option<ProgressStore>, timing: Timing) -> Self {
        Self {
            catalog,
            store,
            timing,
            active: Mutex::new(None),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Handler implementations for the MCP server
pub struct McpHandlers {
    state: Arc<ServerState>,
}

impl McpHandlers {
    pub fn new(state: Arc<ServerState>) -> Self {
        Self { state }
    }

    async fn runner(&self) -> Result<Arc<Mutex<LabRunner>>, ErrorData> {
        self.state
            .active
            .lock()
            .await
            .as_ref()
            .map(|active| active.runner.clone())
            .ok_or_else(no_active_lab)
    }

    pub async fn list_labs(&self) -> McpResult {
        let summaries = LabSummaries(self.state.catalog.summaries());
        text_result(format!("# Labs\n\n{summaries}"))
    }

    pub async fn start_lab(&self, Parameters(params): Parameters<LabRef>) -> McpResult {
        debug!("start_lab: {:?}", params);

        let lab = self
            .state
            .catalog
            .get(&params.as_ref().lab_id)
            .map_err(|e| to_mcp_error("Failed to start lab", &e))?
            .clone();

        let mut builder = LabRunnerBuilder::new(lab.clone())
            .with_timing(self.state.timing)
            .with_observer(Arc::new(LogObserver));
        if let Some(store) = &self.state.store {
            // The writer stops once the runner, and with it the recorder, is dropped
            let (recorder, _writer) = ProgressRecorder::spawn(store.clone(), &lab);
            builder = builder.with_observer(Arc::new(recorder));
        }
        let (runner, events) = builder
            .build()
            .map_err(|e| to_mcp_error("Failed to start lab", &e))?;

        let runner = Arc::new(Mutex::new(runner));
        let pump = tokio::spawn(pump_events(runner.clone(), events));
        let previous = self.state.active.lock().await.replace(ActiveLab {
            runner: runner.clone(),
            pump,
        });
        if let Some(previous) = previous {
            // Resetting releases any run_command still waiting on the old session
            let mut previous = previous.runner.lock().await;
            debug!("Replacing active lab '{}'", previous.session().lab_id());
            previous.dispatch(Event::Reset);
        }

        let runner = runner.lock().await;
        text_result(format!("{lab}\n{}", current_step_panel(&runner)))
    }

    pub async fn run_command(&self, Parameters(params): Parameters<RunCommand>) -> McpResult {
        debug!("run_command: {:?}", params);

        let command = params.as_ref().command.trim().to_string();
        if command.is_empty() {
            return Err(ErrorData::invalid_params("command must not be empty", None));
        }

        let runner = self.runner().await?;
        let (mut finished, mut resets, target, entry_index) = {
            let mut runner = runner.lock().await;
            let session = runner.session();
            let ahead = if session.is_busy() {
                1 + session.queued_commands()
            } else {
                0
            };
            // Only a reset shrinks the transcript, and a reset ends the wait
            let entry_index = session.transcript().len() + ahead;
            let finished = runner.finished_commands();
            let target = *finished.borrow() + ahead as u64 + 1;
            let resets = runner.resets();

            let effects = runner.submit(command.clone());
            if effects.iter().any(|e| matches!(e, Effect::CommandRejected(_))) {
                return Err(ErrorData::invalid_request(
                    "Too many pending commands; wait for earlier ones to finish",
                    None,
                ));
            }
            (finished, resets, target, entry_index)
        };

        let waited = timeout(COMMAND_TIMEOUT, async {
            tokio::select! {
                done = finished.wait_for(|count| *count >= target) => done.is_ok(),
                _ = resets.changed() => false,
            }
        })
        .await;
        match waited {
            Ok(true) => {}
            Ok(false) => {
                return Err(ErrorData::invalid_request(
                    format!("The lab was reset before '{command}' finished"),
                    None,
                ));
            }
            Err(_) => {
                warn!("run_command timed out waiting for '{command}'");
                return Err(ErrorData::internal_error(
                    format!("Timed out waiting for output of '{command}'"),
                    None,
                ));
            }
        }

        let runner = runner.lock().await;
        let session = runner.session();
        let entry = session.transcript().entries().get(entry_index);
        let mut text = entry
            .map(|entry| entry.to_string())
            .unwrap_or_else(|| format!("$ {command}\n"));

        if let Some(check) = entry.and_then(|entry| entry.check.as_ref()) {
            if check.passed {
                let title = session
                    .step_index(&check.step_id)
                    .map_or(check.step_id.as_str(), |index| {
                        session.steps()[index].title.as_str()
                    });
                text.push_str(&format!("\n**✓ Step complete: {title}**\n"));
            } else if let Some(message) = ValidationStatus::Error.message() {
                text.push_str(&format!("\n*{message}*\n"));
            }
        }
        if session.is_complete() {
            text.push_str("\n# 🏆 Lab complete!\n");
        }
        text.push_str(&format!("\n{}\n", session.progress()));

        text_result(text)
    }

    pub async fn show_step(&self) -> McpResult {
        let runner = self.runner().await?;
        let runner = runner.lock().await;
        text_result(current_step_panel(&runner))
    }

    pub async fn navigate(&self, Parameters(params): Parameters<Navigate>) -> McpResult {
        debug!("navigate: {:?}", params);

        let runner = self.runner().await?;
        let mut runner = runner.lock().await;
        runner.dispatch(Event::Navigate(params.as_ref().index));
        text_result(current_step_panel(&runner))
    }

    pub async fn reveal_hint(&self) -> McpResult {
        let runner = self.runner().await?;
        let mut runner = runner.lock().await;
        runner.dispatch(Event::RevealHint);

        let session = runner.session();
        let total = session.current_step().map_or(0, |step| step.hints.len());
        if total == 0 {
            return text_result("No hints for this step.");
        }
        let mut text = String::from("## Hints\n\n");
        for (index, hint) in session.revealed_hints().iter().enumerate() {
            text.push_str(&format!("{}. {hint}\n", index + 1));
        }
        text.push_str(&format!(
            "\nHint {} of {}\n",
            session.revealed_hints().len(),
            total
        ));
        text_result(text)
    }

    pub async fn complete_step(&self, Parameters(params): Parameters<CompleteStep>) -> McpResult {
        debug!("complete_step: {:?}", params);

        let runner = self.runner().await?;
        let mut runner = runner.lock().await;
        let step_id = match &params.as_ref().step_id {
            Some(id) => id.clone(),
            None => runner
                .session()
                .current_step()
                .map(|step| step.id.clone())
                .ok_or_else(|| ErrorData::invalid_request("This lab has no steps", None))?,
        };

        let effects = runner
            .complete_step(&step_id)
            .map_err(|e| to_mcp_error("Failed to complete step", &e))?;
        let status = if effects.is_empty() {
            OperationStatus::success(format!("Step '{step_id}' was already complete"))
        } else {
            OperationStatus::success(format!("Completed step '{step_id}'"))
        };
        text_result(format!("{status}\n\n{}\n", runner.session().progress()))
    }

    pub async fn reset_lab(&self) -> McpResult {
        let runner = self.runner().await?;
        let mut runner = runner.lock().await;
        runner.dispatch(Event::Reset);
        let status = OperationStatus::success(format!(
            "Reset lab '{}'",
            runner.session().lab_id()
        ));
        text_result(format!("{status}\n\n{}", current_step_panel(&runner)))
    }

    pub async fn lab_status(&self) -> McpResult {
        let runner = self.runner().await?;
        let runner = runner.lock().await;
        text_result(runner.snapshot().to_string())
    }

    pub async fn show_progress(&self, Parameters(params): Parameters<LabRef>) -> McpResult {
        debug!("show_progress: {:?}", params);

        let Some(store) = &self.state.store else {
            return text_result("Progress recording is disabled.");
        };
        let lab_id = &params.as_ref().lab_id;
        let progress = store
            .get_progress(lab_id)
            .await
            .map_err(|e| to_mcp_error("Failed to load progress", &e))?;
        match progress {
            Some(progress) => text_result(progress.to_string()),
            None => text_result(format!("No progress recorded for '{lab_id}'.")),
        }
    }
}

/// Step bar followed by the current step.
fn current_step_panel(runner: &LabRunner) -> String {
    let snapshot = runner.snapshot();
    match runner.session().current_step() {
        Some(step) => format!(
            "{}  Step {} of {}\n\n{step}",
            StepBar(&snapshot),
            snapshot.current_step_index + 1,
            snapshot.steps.len()
        ),
        None => "This lab has no steps.\n".to_string(),
    }
}
