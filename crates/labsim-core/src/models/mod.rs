//! Data models for labs, steps and progress.
//!
//! This module contains the domain types the engine works on. Display
//! implementations live in [`crate::display::models`] so that data structures
//! and presentation stay separate.
//!
//! # Wire Format
//!
//! Lab definitions are JSON documents with camelCase keys. Validation rules
//! use a `type` key whose value is one of `command`, `output` or
//! `file_exists`:
//!
//! ```rust
//! use labsim_core::models::{LabDefinition, RuleKind};
//!
//! let lab = LabDefinition::from_json(r#"{
//!     "id": "demo",
//!     "title": "Demo",
//!     "steps": [{
//!         "id": "where",
//!         "title": "Find yourself",
//!         "validationRules": [
//!             { "type": "command", "pattern": "^pwd$", "description": "Run pwd" }
//!         ]
//!     }]
//! }"#).unwrap();
//!
//! assert_eq!(lab.steps[0].validation_rules[0].kind, RuleKind::Command);
//! assert!(!lab.steps[0].completed);
//! ```

pub mod lab;
pub mod progress;
pub mod status;
pub mod step;
pub mod transcript;


pub use lab::LabDefinition;
pub use progress::{Achievement, LabProgress, ProgressSummary, StepCompletion};
pub use status::{SessionStatus, StepStatus, ValidationStatus};
pub use step::{RuleKind, Step, ValidationRule};
pub use transcript::{StepCheck, TranscriptEntry};
