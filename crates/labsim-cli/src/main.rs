//! labsim CLI Application
//!
//! Command-line front end for labsim: browse the catalog, run labs in an
//! interactive terminal, inspect saved progress, or serve sessions over MCP.

mod args;
mod cli;
mod mcp;
mod renderer;
mod repl;

use std::sync::Arc;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::{resolve_lab, Cli};
use labsim_core::{
    runner::{LabRunnerBuilder, LogObserver, Timing},
    Catalog, ProgressRecorder, ProgressStore, ProgressStoreBuilder,
};
use log::info;
use mcp::{run_stdio_server, LabsimMcpServer};
use renderer::TerminalRenderer;
use repl::Repl;
use Commands::*;

async fn open_store(database_file: Option<std::path::PathBuf>) -> Result<ProgressStore> {
    ProgressStoreBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize progress database")
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        labs_dir,
        no_color,
        command,
    } = Args::parse();

    let mut catalog = Catalog::builtin().context("Failed to load built-in labs")?;
    if let Some(dir) = &labs_dir {
        let loaded = catalog
            .load_dir(dir)
            .with_context(|| format!("Failed to load labs from {}", dir.display()))?;
        info!("Loaded {loaded} labs from {}", dir.display());
    }

    let renderer = TerminalRenderer::new(!no_color);

    info!("labsim started");

    match command {
        Some(Lab { command }) => Cli::new(catalog, renderer).handle_lab_command(command),
        Some(Progress { command }) => {
            let store = open_store(database_file).await?;
            Cli::new(catalog, renderer)
                .handle_progress_command(&store, command)
                .await
        }
        Some(Run(args)) => {
            let lab = resolve_lab(&catalog, &args)?;
            let timing = if args.no_delay {
                Timing::immediate()
            } else {
                Timing::default()
            };

            let mut builder = LabRunnerBuilder::new(lab.clone())
                .with_timing(timing)
                .with_observer(Arc::new(LogObserver));
            let mut writer = None;
            if !args.no_record {
                let store = open_store(database_file).await?;
                let (recorder, handle) = ProgressRecorder::spawn(store, &lab);
                builder = builder.with_observer(Arc::new(recorder));
                writer = Some(handle);
            }
            let (runner, events) = builder.build().context("Failed to start lab")?;

            Repl::new(runner, renderer).run(events).await?;

            // The session is gone, so the recorder has no more senders
            if let Some(writer) = writer {
                writer.await.context("Progress writer failed")?;
            }
            Ok(())
        }
        Some(Serve(args)) => {
            info!("Starting labsim MCP server");
            let timing = if args.no_delay {
                Timing::immediate()
            } else {
                Timing::default()
            };
            let store = if args.no_record {
                None
            } else {
                Some(open_store(database_file).await?)
            };
            run_stdio_server(LabsimMcpServer::new(catalog, store, timing))
                .await
                .context("MCP server failed")
        }
        None => Cli::new(catalog, renderer).list_labs(),
    }
}
