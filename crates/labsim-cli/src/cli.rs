//! Command-line argument structures and their handlers.
//!
//! Each command has a clap `Args` struct that converts into the matching
//! core parameter type, so the core stays free of clap derives:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Catalog / Store / Runner
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use labsim_core::{
    catalog::read_lab_file,
    display::{LabSummaries, OperationStatus, ProgressRecords},
    params::LabRef,
    Catalog, LabDefinition, ProgressStore,
};
use log::debug;

use crate::renderer::TerminalRenderer;

// ============================================================================
// CLI Argument Wrappers
// ============================================================================

/// Arguments for showing a lab
#[derive(Args)]
pub struct ShowLabArgs {
    /// Catalog ID of the lab
    pub lab_id: String,

    /// Print the lab definition as JSON instead of markdown
    #[arg(long)]
    pub json: bool,
}

impl From<ShowLabArgs> for LabRef {
    fn from(val: ShowLabArgs) -> Self {
        LabRef {
            lab_id: val.lab_id,
        }
    }
}

/// Arguments for validating a lab definition file
#[derive(Args)]
pub struct CheckLabArgs {
    /// Path to a lab definition file (JSON)
    pub path: PathBuf,
}

/// Arguments for operations on one lab's saved progress
#[derive(Args)]
pub struct ProgressArgs {
    /// Catalog ID of the lab
    pub lab_id: String,
}

impl From<ProgressArgs> for LabRef {
    fn from(val: ProgressArgs) -> Self {
        LabRef {
            lab_id: val.lab_id,
        }
    }
}

/// Arguments for starting an interactive session
#[derive(Args)]
pub struct RunArgs {
    /// Catalog ID of the lab; may be omitted when --lab-file is given
    pub lab_id: Option<String>,

    /// Run a lab loaded from a definition file instead of the catalog
    #[arg(long, short = 'f')]
    pub lab_file: Option<PathBuf>,

    /// Show command output immediately instead of simulating latency
    #[arg(long)]
    pub no_delay: bool,

    /// Do not save progress to the database
    #[arg(long)]
    pub no_record: bool,
}

/// Arguments for the MCP server
#[derive(Args)]
pub struct ServeArgs {
    /// Answer commands immediately instead of simulating latency
    #[arg(long)]
    pub no_delay: bool,

    /// Do not save progress to the database
    #[arg(long)]
    pub no_record: bool,
}

/// Catalog operations
#[derive(Subcommand)]
pub enum LabCommands {
    /// List available labs
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show a lab with all of its steps
    #[command(alias = "s")]
    Show(ShowLabArgs),
    /// Validate a lab definition file without running it
    Check(CheckLabArgs),
}

/// Saved progress operations
#[derive(Subcommand)]
pub enum ProgressCommands {
    /// List progress for every lab that has been started
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show saved progress for one lab
    #[command(alias = "s")]
    Show(ProgressArgs),
    /// Forget saved progress for one lab
    #[command(alias = "rm")]
    Clear(ProgressArgs),
}

// ============================================================================
// Command Handlers
// ============================================================================

/// Handles the non-interactive commands.
pub struct Cli {
    catalog: Catalog,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(catalog: Catalog, renderer: TerminalRenderer) -> Self {
        Self { catalog, renderer }
    }

    pub fn handle_lab_command(&self, command: LabCommands) -> Result<()> {
        match command {
            LabCommands::List => self.list_labs(),
            LabCommands::Show(args) => {
                let json = args.json;
                self.show_lab(&args.into(), json)
            }
            LabCommands::Check(args) => self.check_lab(&args.path),
        }
    }

    pub async fn handle_progress_command(
        &self,
        store: &ProgressStore,
        command: ProgressCommands,
    ) -> Result<()> {
        match command {
            ProgressCommands::List => {
                let records = store
                    .list_progress()
                    .await
                    .context("Failed to list progress")?;
                self.renderer
                    .render(&format!("# Progress\n\n{}", ProgressRecords(records)))
            }
            ProgressCommands::Show(args) => {
                let params: LabRef = args.into();
                match store
                    .get_progress(&params.lab_id)
                    .await
                    .context("Failed to load progress")?
                {
                    Some(progress) => self.renderer.render(&progress.to_string()),
                    None => self.renderer.render(&format!(
                        "No progress recorded for '{}'.\n",
                        params.lab_id
                    )),
                }
            }
            ProgressCommands::Clear(args) => {
                let params: LabRef = args.into();
                let cleared = store
                    .clear_progress(&params.lab_id)
                    .await
                    .context("Failed to clear progress")?;
                let status = if cleared {
                    OperationStatus::success(format!("Progress cleared for '{}'", params.lab_id))
                } else {
                    OperationStatus::failure(format!(
                        "No progress recorded for '{}'",
                        params.lab_id
                    ))
                };
                self.renderer.render(&format!("{status}\n"))
            }
        }
    }

    pub fn list_labs(&self) -> Result<()> {
        let summaries = LabSummaries(self.catalog.summaries());
        debug!("Listing {} labs", summaries.len());
        self.renderer.render(&format!("# Labs\n\n{summaries}"))
    }

    fn show_lab(&self, params: &LabRef, json: bool) -> Result<()> {
        let lab = self.catalog.get(&params.lab_id)?;
        if json {
            println!("{}", serde_json::to_string_pretty(lab)?);
            return Ok(());
        }
        let mut text = lab.to_string();
        for (index, step) in lab.steps.iter().enumerate() {
            text.push_str(&format!("\n# Step {}\n\n{step}", index + 1));
        }
        self.renderer.render(&text)
    }

    fn check_lab(&self, path: &Path) -> Result<()> {
        let lab = read_lab_file(path)
            .with_context(|| format!("Invalid lab file {}", path.display()))?;
        let status = OperationStatus::success(format!(
            "'{}' is valid: {} steps, {} points",
            lab.id,
            lab.steps.len(),
            lab.total_points()
        ));
        self.renderer.render(&format!("{status}\n"))
    }
}

/// Picks the lab for `run`: a file if one is given, otherwise the catalog
/// entry.
pub fn resolve_lab(catalog: &Catalog, args: &RunArgs) -> Result<LabDefinition> {
    match (&args.lab_file, &args.lab_id) {
        (Some(path), _) => read_lab_file(path)
            .with_context(|| format!("Failed to load lab file {}", path.display())),
        (None, Some(lab_id)) => Ok(catalog.get(lab_id)?.clone()),
        (None, None) => bail!("Specify a lab ID or --lab-file; see `labsim lab list`"),
    }
}
