use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{LabCommands, ProgressCommands, RunArgs, ServeArgs};

/// Interactive command-line labs with a simulated terminal
///
/// A lab is a sequence of steps. Each step asks for a command; labsim
/// answers it with canned output and checks it against the step's rules.
/// Solved steps advance automatically. Progress is kept in a local SQLite
/// database. The `serve` command exposes the same sessions over MCP for AI
/// assistants.
#[derive(Parser)]
#[command(version, about, name = "labsim")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/labsim/progress.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Directory of additional lab definition files (*.json)
    #[arg(long, global = true)]
    pub labs_dir: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the labsim CLI
///
/// - `lab`: browse the lab catalog
/// - `run`: start an interactive session
/// - `progress`: inspect or clear saved progress
/// - `serve`: start the MCP server
#[derive(Subcommand)]
pub enum Commands {
    /// Browse available labs
    #[command(alias = "l")]
    Lab {
        #[command(subcommand)]
        command: LabCommands,
    },
    /// Start an interactive lab session
    #[command(alias = "r")]
    Run(RunArgs),
    /// Inspect or clear saved progress
    #[command(alias = "p")]
    Progress {
        #[command(subcommand)]
        command: ProgressCommands,
    },
    /// Start the MCP server
    Serve(ServeArgs),
}
