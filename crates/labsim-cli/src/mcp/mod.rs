//! MCP server for labsim
//!
//! Exposes one lab session at a time to AI assistants over stdio. Starting a
//! lab replaces any session already running.

use std::sync::Arc;

use anyhow::Result;
use labsim_core::{runner::Timing, Catalog, ProgressStore};
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::signal::unix::{signal, SignalKind};

pub mod errors;
pub mod handlers;

pub use handlers::{CompleteStep, LabRef, McpResult, Navigate, RunCommand};
use handlers::{McpHandlers, ServerState};

/// MCP server for labsim
#[derive(Clone)]
pub struct LabsimMcpServer {
    state: Arc<ServerState>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl LabsimMcpServer {
    pub fn new(catalog: Catalog, store: Option<ProgressStore>, timing: Timing) -> Self {
        Self {
            state: Arc::new(ServerState::new(catalog, store, timing)),
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> McpHandlers {
        McpHandlers::new(self.state.clone())
    }

    #[tool(
        name = "list_labs",
        description = "List the available labs with their IDs, difficulty, step count and total points. Use an ID with start_lab."
    )]
    async fn list_labs(&self) -> McpResult {
        self.handlers().list_labs().await
    }

    #[tool(
        name = "start_lab",
        description = "Start a lab session by ID, replacing any session in progress. Returns the lab overview and the first step's instructions."
    )]
    async fn start_lab(&self, params: Parameters<LabRef>) -> McpResult {
        self.handlers().start_lab(params).await
    }

    #[tool(
        name = "run_command",
        description = "Run a shell command in the simulated terminal of the active lab. Waits for the output, then reports whether the current step was solved and the overall progress. Solved steps advance automatically."
    )]
    async fn run_command(&self, params: Parameters<RunCommand>) -> McpResult {
        self.handlers().run_command(params).await
    }

    #[tool(
        name = "show_step",
        description = "Show the current step of the active lab: title, description, instructions and completion status."
    )]
    async fn show_step(&self) -> McpResult {
        self.handlers().show_step().await
    }

    #[tool(
        name = "navigate",
        description = "Jump to a step of the active lab by zero-based index. Indices past the end select the last step."
    )]
    async fn navigate(&self, params: Parameters<Navigate>) -> McpResult {
        self.handlers().navigate(params).await
    }

    #[tool(
        name = "reveal_hint",
        description = "Reveal the next hint for the current step and list all hints revealed so far."
    )]
    async fn reveal_hint(&self) -> McpResult {
        self.handlers().reveal_hint().await
    }

    #[tool(
        name = "complete_step",
        description = "Mark a step completed without running its checks. Defaults to the current step. Use for steps that are checked manually."
    )]
    async fn complete_step(&self, params: Parameters<CompleteStep>) -> McpResult {
        self.handlers().complete_step(params).await
    }

    #[tool(
        name = "reset_lab",
        description = "Reset the active lab: clears completion, command history and hints, and returns to the first step. Saved progress is kept."
    )]
    async fn reset_lab(&self) -> McpResult {
        self.handlers().reset_lab().await
    }

    #[tool(
        name = "lab_status",
        description = "Show the active lab's status: every step with its completion state, points, achievements and any visible hints."
    )]
    async fn lab_status(&self) -> McpResult {
        self.handlers().lab_status().await
    }

    #[tool(
        name = "show_progress",
        description = "Show saved progress for a lab by ID: completed steps, points, command count and timestamps."
    )]
    async fn show_progress(&self, params: Parameters<LabRef>) -> McpResult {
        self.handlers().show_progress(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for LabsimMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(r#"labsim runs interactive command-line labs in a simulated terminal.

## Core Concepts
- **Labs**: ordered steps, each asking for a command (e.g. `pwd`, `docker ps -a`)
- **Validation**: every command's output is checked against the current step's rules; a solved step is marked complete and the session moves on
- **Simulated shell**: commands are answered from canned output; nothing runs on the host

## Workflow
1. `list_labs` to pick a lab, then `start_lab`
2. Read the step, then `run_command` with the command it asks for
3. Use `reveal_hint` when stuck, `navigate` to move around, `lab_status` for an overview
4. `complete_step` finishes steps that have no automatic checks"#.to_string()),
        }
    }
}

/// Serves MCP on stdio until the client disconnects or a signal arrives.
pub async fn run_stdio_server(server: LabsimMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting labsim MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    /// Handlers on a fresh server whose commands take `latency` to finish.
    fn handlers_with_latency(latency: Duration) -> (Arc<ServerState>, McpHandlers) {
        let timing = Timing {
            latency_min: latency,
            latency_max: latency,
            ..Timing::immediate()
        };
        let catalog = Catalog::builtin().unwrap();
        let state = Arc::new(ServerState::new(catalog, None, timing));
        (state.clone(), McpHandlers::new(state))
    }

    async fn start_linux_lab(handlers: &McpHandlers) {
        handlers
            .start_lab(Parameters(
                serde_json::from_str(r#"{"lab_id":"linux-basics-lab"}"#).unwrap(),
            ))
            .await
            .unwrap();
    }

    /// Runs `command` on its own task so the caller can act while it waits.
    fn spawn_command(
        state: &Arc<ServerState>,
        command: &str,
    ) -> tokio::task::JoinHandle<McpResult> {
        let handlers = McpHandlers::new(state.clone());
        let params: RunCommand =
            serde_json::from_str(&format!(r#"{{"command":"{command}"}}"#)).unwrap();
        tokio::spawn(async move { handlers.run_command(Parameters(params)).await })
    }

    #[test]
    fn test_server_registers_all_tools() {
        let catalog = Catalog::builtin().unwrap();
        let server = LabsimMcpServer::new(catalog, None, Timing::immediate());
        let names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        for expected in [
            "list_labs",
            "start_lab",
            "run_command",
            "show_step",
            "navigate",
            "reveal_hint",
            "complete_step",
            "reset_lab",
            "lab_status",
            "show_progress",
        ] {
            assert!(names.iter().any(|name| name == expected), "missing {expected}");
        }
    }

    #[tokio::test]
    async fn test_run_command_reports_step_completion() {
        let catalog = Catalog::builtin().unwrap();
        let state = Arc::new(ServerState::new(catalog, None, Timing::immediate()));
        let handlers = McpHandlers::new(state);

        let started = handlers
            .start_lab(Parameters(
                serde_json::from_str(r#"{"lab_id":"linux-basics-lab"}"#).unwrap(),
            ))
            .await
            .unwrap();
        assert!(serde_json::to_string(&started)
            .unwrap()
            .contains("Linux Command Line Essentials"));

        let result = handlers
            .run_command(Parameters(
                serde_json::from_str(r#"{"command":"pwd"}"#).unwrap(),
            ))
            .await
            .unwrap();
        let text = serde_json::to_string(&result).unwrap();
        assert!(text.contains("/home/student"));
        assert!(text.contains("Step complete"));
    }

    #[tokio::test]
    async fn test_complete_step_rejects_unknown_step() {
        let (_state, handlers) = handlers_with_latency(Duration::ZERO);
        start_linux_lab(&handlers).await;

        let err = handlers
            .complete_step(Parameters(
                serde_json::from_str(r#"{"step_id":"no-such-step"}"#).unwrap(),
            ))
            .await
            .unwrap_err();
        assert!(err.message.contains("Step 'no-such-step' not found"));

        let done = handlers
            .complete_step(Parameters(serde_json::from_str("{}").unwrap()))
            .await
            .unwrap();
        assert!(serde_json::to_string(&done)
            .unwrap()
            .contains("Completed step 'print-working-directory'"));
    }

    #[tokio::test]
    async fn test_reset_releases_waiting_command() {
        let (state, handlers) = handlers_with_latency(Duration::from_secs(20));
        start_linux_lab(&handlers).await;

        let waiting = spawn_command(&state, "pwd");
        tokio::time::sleep(Duration::from_millis(50)).await;
        handlers.reset_lab().await.unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), waiting)
            .await
            .expect("run_command still waiting after reset")
            .unwrap();
        assert!(result.unwrap_err().message.contains("reset"));
    }

    #[tokio::test]
    async fn test_start_lab_releases_waiting_command() {
        let (state, handlers) = handlers_with_latency(Duration::from_secs(20));
        start_linux_lab(&handlers).await;

        let waiting = spawn_command(&state, "pwd");
        tokio::time::sleep(Duration::from_millis(50)).await;
        start_linux_lab(&handlers).await;

        let result = tokio::time::timeout(Duration::from_secs(5), waiting)
            .await
            .expect("run_command still waiting after start_lab")
            .unwrap();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_run_command_reports_step_checked_at_output_time() {
        let (state, handlers) = handlers_with_latency(Duration::from_millis(300));
        start_linux_lab(&handlers).await;
        handlers
            .navigate(Parameters(serde_json::from_str(r#"{"index":1}"#).unwrap()))
            .await
            .unwrap();

        // pwd is submitted on step 2 but its output arrives on step 1
        let waiting = spawn_command(&state, "pwd");
        tokio::time::sleep(Duration::from_millis(50)).await;
        handlers
            .navigate(Parameters(serde_json::from_str(r#"{"index":0}"#).unwrap()))
            .await
            .unwrap();

        let result = waiting.await.unwrap().unwrap();
        let text = serde_json::to_string(&result).unwrap();
        assert!(text.contains("Step complete: Find your location"));
        assert!(!text.contains("Not quite right"));
    }

    #[tokio::test]
    async fn test_tools_require_an_active_lab() {
        let catalog = Catalog::builtin().unwrap();
        let state = Arc::new(ServerState::new(catalog, None, Timing::immediate()));
        let handlers = McpHandlers::new(state);

        assert!(handlers.show_step().await.is_err());
        assert!(handlers.reset_lab().await.is_err());
    }
}
