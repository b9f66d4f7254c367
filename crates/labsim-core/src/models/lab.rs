//! Lab definition model and load-time checks.

use std::collections::HashSet;

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use super::{RuleKind, Step};
use crate::error::{LabError, Result};

/// A complete interactive lab: metadata plus its ordered steps.
///
/// Definitions are read-only input. Sessions clone the steps into a working
/// copy so completion never leaks back into the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LabDefinition {
    /// Catalog identifier (e.g. `linux-basics-lab`)
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Free-form difficulty label (`beginner`, `intermediate`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    pub steps: Vec<Step>,
}

impl LabDefinition {
    /// Creates a lab with the given steps and no optional metadata.
    pub fn new(id: impl Into<String>, title: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            difficulty: None,
            estimated_minutes: None,
            tags: Vec::new(),
            steps,
        }
    }

    /// Parses and validates a lab from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let lab: LabDefinition = serde_json::from_str(json)?;
        lab.validate()?;
        Ok(lab)
    }

    /// Checks the structural invariants a session relies on.
    ///
    /// # Errors
    ///
    /// Returns `LabError::InvalidLab` for an empty lab, an empty or
    /// duplicated step ID, and `LabError::InvalidPattern` for a `command` or
    /// `output` rule whose regex does not compile.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(LabError::invalid_lab(&self.id, "lab id must not be empty"));
        }
        if self.steps.is_empty() {
            return Err(LabError::invalid_lab(&self.id, "lab has no steps"));
        }

        let mut seen = HashSet::new();
        for step in &self.steps {
            if step.id.trim().is_empty() {
                return Err(LabError::invalid_lab(&self.id, "step id must not be empty"));
            }
            if !seen.insert(step.id.as_str()) {
                return Err(LabError::invalid_lab(
                    &self.id,
                    format!("duplicate step id '{}'", step.id),
                ));
            }
            for rule in &step.validation_rules {
                if rule.kind == RuleKind::FileExists {
                    continue;
                }
                RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| LabError::InvalidPattern {
                        step_id: step.id.clone(),
                        pattern: rule.pattern.clone(),
                        source,
                    })?;
            }
        }
        Ok(())
    }

    /// Sum of the points of every step.
    pub fn total_points(&self) -> u32 {
        self.steps.iter().map(|s| s.points).sum()
    }
}
