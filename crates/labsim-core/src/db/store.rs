//! Async progress store.

use std::path::{Path, PathBuf};

use tokio::task;

use super::Database;
use crate::{
    error::{LabError, Result},
    models::LabProgress,
};

/// Builder for creating and configuring [`ProgressStore`] instances.
#[derive(Debug, Clone, Default)]
pub struct ProgressStoreBuilder {
    database_path: Option<PathBuf>,
}

impl ProgressStoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses the XDG Base Directory specification:
    /// `$XDG_DATA_HOME/labsim/progress.db` or
    /// `~/.local/share/labsim/progress.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Builds the store, creating the database file and schema if needed.
    ///
    /// # Errors
    ///
    /// Returns `LabError::FileSystem` if the parent directory cannot be
    /// created, `LabError::XdgDirectory` if no default path can be resolved
    /// and `LabError::Database` if initialization fails.
    pub async fn build(self) -> Result<ProgressStore> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| LabError::FileSystem {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), LabError>(())
        })
        .await
        .map_err(LabError::join)??;

        Ok(ProgressStore { db_path })
    }

    /// Returns the default database path following the XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("labsim")
            .place_data_file("progress.db")
            .map_err(|e| LabError::XdgDirectory(e.to_string()))
    }
}

/// Handle to the progress database.
///
/// Each operation opens its own connection on the blocking pool, so the
/// store is cheap to clone and safe to share across tasks.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    db_path: PathBuf,
}

impl ProgressStore {
    pub fn database_path(&self) -> &Path {
        &self.db_path
    }

    /// Counts one executed command for a lab.
    pub async fn record_command(&self, lab_id: &str) -> Result<()> {
        let lab_id = lab_id.to_string();
        self.with_db(move |db| db.record_command(&lab_id)).await
    }

    /// Stores a step completion; returns `false` if it was already stored.
    pub async fn record_step_completion(&self, lab_id: &str, step_id: &str, points: u32) -> Result<bool> {
        let lab_id = lab_id.to_string();
        let step_id = step_id.to_string();
        self.with_db(move |db| db.record_step_completion(&lab_id, &step_id, points))
            .await
    }

    /// Marks a lab completed.
    pub async fn record_lab_completion(&self, lab_id: &str) -> Result<()> {
        let lab_id = lab_id.to_string();
        self.with_db(move |db| db.record_lab_completion(&lab_id)).await
    }

    /// Retrieves the progress of one lab.
    pub async fn get_progress(&self, lab_id: &str) -> Result<Option<LabProgress>> {
        let lab_id = lab_id.to_string();
        self.with_db(move |db| db.get_progress(&lab_id)).await
    }

    /// Lists all progress records, most recently updated first.
    pub async fn list_progress(&self) -> Result<Vec<LabProgress>> {
        self.with_db(|db| db.list_progress()).await
    }

    /// Deletes a lab's progress; returns `false` if there was none.
    pub async fn clear_progress(&self, lab_id: &str) -> Result<bool> {
        let lab_id = lab_id.to_string();
        self.with_db(move |db| db.clear_progress(&lab_id)).await
    }

    async fn with_db<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            f(&mut db)
        })
        .await
        .map_err(LabError::join)?
    }
}
