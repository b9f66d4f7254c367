//! Lab catalog: built-in labs plus labs loaded from disk.
//!
//! Built-in definitions are embedded at compile time from `assets/labs/`.
//! Every lab entering a catalog is validated first, so sessions can assume
//! unique step IDs and compilable patterns.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde::Serialize;

use crate::{
    error::{LabError, Result},
    models::LabDefinition,
};


const BUILTIN_LABS: &[(&str, &str)] = &[
    (
        "linux-basics-lab",
        include_str!("../../assets/labs/linux-basics-lab.json"),
    ),
    (
        "docker-basics-lab",
        include_str!("../../assets/labs/docker-basics-lab.json"),
    ),
];

/// Short catalog entry for listings.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LabSummary {
    pub id: String,
    pub title: String,
    pub difficulty: Option<String>,
    pub estimated_minutes: Option<u32>,
    pub total_steps: usize,
    pub total_points: u32,
    pub tags: Vec<String>,
}

impl From<&LabDefinition> for LabSummary {
    fn from(lab: &LabDefinition) -> Self {
        Self {
            id: lab.id.clone(),
            title: lab.title.clone(),
            difficulty: lab.difficulty.clone(),
            estimated_minutes: lab.estimated_minutes,
            total_steps: lab.steps.len(),
            total_points: lab.total_points(),
            tags: lab.tags.clone(),
        }
    }
}

/// Ordered collection of validated lab definitions.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    labs: Vec<LabDefinition>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of the labs shipped with the crate.
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::new();
        for (id, json) in BUILTIN_LABS {
            debug!("Loading built-in lab '{id}'");
            catalog.insert(LabDefinition::from_json(json)?)?;
        }
        Ok(catalog)
    }

    /// Adds a lab, validating it first.
    ///
    /// # Errors
    ///
    /// Returns `LabError::InvalidLab` if the lab is malformed or a lab with
    /// the same ID is already present.
    pub fn insert(&mut self, lab: LabDefinition) -> Result<()> {
        lab.validate()?;
        if self.labs.iter().any(|l| l.id == lab.id) {
            return Err(LabError::invalid_lab(&lab.id, "duplicate lab id in catalog"));
        }
        self.labs.push(lab);
        Ok(())
    }

    /// Adds the lab stored in a JSON file, replacing any lab with that ID.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&LabDefinition> {
        let lab = read_lab_file(path.as_ref())?;
        self.labs.retain(|l| l.id != lab.id);
        self.labs.push(lab);
        let index = self.labs.len() - 1;
        Ok(&self.labs[index])
    }

    /// Adds every `*.json` lab in a directory, in file name order.
    ///
    /// Files that fail to parse are skipped with a warning.
    pub fn load_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<usize> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|source| LabError::FileSystem {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            match self.load_file(&path) {
                Ok(_) => loaded += 1,
                Err(e) => warn!("Skipping lab file {}: {e}", path.display()),
            }
        }
        Ok(loaded)
    }

    /// Looks up a lab by ID.
    pub fn get(&self, id: &str) -> Result<&LabDefinition> {
        self.labs
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| LabError::LabNotFound { id: id.to_string() })
    }

    pub fn labs(&self) -> &[LabDefinition] {
        &self.labs
    }

    pub fn summaries(&self) -> Vec<LabSummary> {
        self.labs.iter().map(LabSummary::from).collect()
    }

    pub fn len(&self) -> usize {
        self.labs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labs.is_empty()
    }
}

/// Returns a copy of a built-in lab.
pub fn builtin_lab(id: &str) -> Result<LabDefinition> {
    let json = BUILTIN_LABS
        .iter()
        .find(|(builtin_id, _)| *builtin_id == id)
        .map(|(_, json)| *json)
        .ok_or_else(|| LabError::LabNotFound { id: id.to_string() })?;
    LabDefinition::from_json(json)
}

/// Reads and validates a lab definition file.
pub fn read_lab_file(path: &Path) -> Result<LabDefinition> {
    let json = fs::read_to_string(path).map_err(|source| LabError::FileSystem {
        path: path.to_path_buf(),
        source,
    })?;
    LabDefinition::from_json(&json)
}
