//! Display formatting for labs, sessions and progress.
//!
//! Domain models implement `Display` directly (see [`models`]); collections
//! and compound views use small wrapper types. Everything renders to
//! markdown, which the CLI passes through termimad and the MCP server
//! returns as text content.
//!
//! ```rust
//! use labsim_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Progress cleared for 'linux-basics-lab'");
//! assert!(status.to_string().starts_with("Success:"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod session;
pub mod status;

pub use collections::{LabSummaries, ProgressRecords};
pub use datetime::LocalDateTime;
pub use session::StepBar;
pub use status::OperationStatus;
