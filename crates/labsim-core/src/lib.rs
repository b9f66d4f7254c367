//! Core library for labsim, an interactive lab exercise engine.
//!
//! A lab is an ordered list of steps. Learners type shell-like commands into
//! a simulated terminal; each command is answered from a fixed table of
//! canned outputs and then checked against the current step's validation
//! rules. Solved steps are marked completed and the session moves on.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌──────────────┐   ┌─────────────┐
//! │ interpreter │──▶│  transcript  │──▶│  validation  │──▶│   session   │
//! │ (canned out)│   │ (last pair)  │   │ (rule AND)   │   │ (progress)  │
//! └─────────────┘   └──────────────┘   └──────────────┘   └─────────────┘
//!                                                                │
//!                                          runner (tokio timers, observers)
//! ```
//!
//! - [`interpreter`]: ordered recognizers mapping commands to output
//! - [`validation`]: pure rule evaluation against the last command/output
//! - [`session`]: the step progression state machine (`event -> effects`)
//! - [`runner`]: applies effects with tokio timers and notifies observers
//! - [`catalog`]: built-in and file-based lab definitions
//! - [`db`]: SQLite progress store and the recording observer
//! - [`display`]: markdown `Display` implementations
//!
//! # Quick Start
//!
//! ```rust
//! use labsim_core::{
//!     catalog::Catalog,
//!     runner::{LabRunnerBuilder, Timing},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::builtin()?;
//! let lab = catalog.get("linux-basics-lab")?.clone();
//!
//! let (mut runner, mut events) = LabRunnerBuilder::new(lab)
//!     .with_timing(Timing::immediate())
//!     .build()?;
//!
//! runner.submit("pwd");
//! runner.run_until_settled(&mut events).await;
//!
//! println!("{}", runner.snapshot());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod db;
pub mod display;
pub mod error;
pub mod interpreter;
pub mod models;
pub mod params;
pub mod runner;
pub mod session;
pub mod validation;

pub use catalog::{Catalog, LabSummary};
pub use db::{Database, ProgressRecorder, ProgressStore, ProgressStoreBuilder};
pub use display::{LabSummaries, LocalDateTime, OperationStatus, ProgressRecords};
pub use error::{LabError, Result};
pub use interpreter::{CommandInterpreter, Interpretation};
pub use models::{
    LabDefinition, LabProgress, ProgressSummary, SessionStatus, Step, StepStatus,
    ValidationRule, ValidationStatus,
};
pub use runner::{LabObserver, LabRunner, LabRunnerBuilder, LogObserver, Timing};
pub use session::{Effect, Event, LabSession, SessionSnapshot};
