//! Progress record operations and queries.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension, Row};

use crate::{
    error::{DatabaseResultExt, Result},
    models::{LabProgress, SessionStatus, StepCompletion},
};

const ENSURE_LAB_SQL: &str =
    "INSERT OR IGNORE INTO lab_progress (lab_id, started_at, updated_at) VALUES (?1, ?2, ?2)";
const COUNT_COMMAND_SQL: &str = "UPDATE lab_progress SET commands_executed = commands_executed + 1, updated_at = ?2 WHERE lab_id = ?1";
const INSERT_STEP_SQL: &str =
    "INSERT OR IGNORE INTO step_progress (lab_id, step_id, completed_at) VALUES (?1, ?2, ?3)";
const COUNT_STEP_SQL: &str = "UPDATE lab_progress SET steps_completed = steps_completed + 1, points_earned = points_earned + ?2, updated_at = ?3 WHERE lab_id = ?1";
const COMPLETE_LAB_SQL: &str = "UPDATE lab_progress SET status = ?2, completed_at = COALESCE(completed_at, ?3), updated_at = ?3 WHERE lab_id = ?1";
const SELECT_LAB_SQL: &str = "SELECT lab_id, status, steps_completed, commands_executed, points_earned, started_at, updated_at, completed_at FROM lab_progress WHERE lab_id = ?1";
const LIST_LABS_SQL: &str = "SELECT lab_id, status, steps_completed, commands_executed, points_earned, started_at, updated_at, completed_at FROM lab_progress ORDER BY updated_at DESC, lab_id";
const SELECT_STEPS_SQL: &str =
    "SELECT step_id, completed_at FROM step_progress WHERE lab_id = ?1 ORDER BY completed_at, step_id";
const DELETE_STEPS_SQL: &str = "DELETE FROM step_progress WHERE lab_id = ?1";
const DELETE_LAB_SQL: &str = "DELETE FROM lab_progress WHERE lab_id = ?1";

fn parse_timestamp(row: &Row<'_>, index: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(index)?
        .parse::<Timestamp>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

fn lab_progress_from_row(row: &Row<'_>) -> rusqlite::Result<LabProgress> {
    let status_str: String = row.get(1)?;
    let status = status_str.parse::<SessionStatus>().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            Type::Text,
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Invalid session status: {status_str}"),
            )),
        )
    })?;
    let completed_at = match row.get::<_, Option<String>>(7)? {
        Some(_) => Some(parse_timestamp(row, 7)?),
        None => None,
    };

    Ok(LabProgress {
        lab_id: row.get(0)?,
        status,
        steps_completed: row.get(2)?,
        commands_executed: row.get(3)?,
        points_earned: row.get(4)?,
        started_at: parse_timestamp(row, 5)?,
        updated_at: parse_timestamp(row, 6)?,
        completed_at,
        completed_steps: Vec::new(),
    })
}

impl super::Database {
    /// Counts one executed command, creating the record on first use.
    pub fn record_command(&mut self, lab_id: &str) -> Result<()> {
        let now = Timestamp::now().to_string();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        tx.execute(ENSURE_LAB_SQL, params![lab_id, &now])
            .db_context("Failed to create progress record")?;
        tx.execute(COUNT_COMMAND_SQL, params![lab_id, &now])
            .db_context("Failed to count command")?;
        tx.commit().db_context("Failed to commit transaction")
    }

    /// Stores a step completion.
    ///
    /// Returns `false` if the step was already stored; counters and points
    /// then stay unchanged.
    pub fn record_step_completion(&mut self, lab_id: &str, step_id: &str, points: u32) -> Result<bool> {
        let now = Timestamp::now().to_string();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        tx.execute(ENSURE_LAB_SQL, params![lab_id, &now])
            .db_context("Failed to create progress record")?;
        let inserted = tx
            .execute(INSERT_STEP_SQL, params![lab_id, step_id, &now])
            .db_context("Failed to insert step completion")?;
        if inserted > 0 {
            tx.execute(COUNT_STEP_SQL, params![lab_id, points, &now])
                .db_context("Failed to count step completion")?;
        }
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(inserted > 0)
    }

    /// Marks a lab completed. The first completion time is kept.
    pub fn record_lab_completion(&mut self, lab_id: &str) -> Result<()> {
        let now = Timestamp::now().to_string();
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        tx.execute(ENSURE_LAB_SQL, params![lab_id, &now])
            .db_context("Failed to create progress record")?;
        tx.execute(
            COMPLETE_LAB_SQL,
            params![lab_id, SessionStatus::Complete.as_str(), &now],
        )
        .db_context("Failed to mark lab complete")?;
        tx.commit().db_context("Failed to commit transaction")
    }

    /// Retrieves the progress of one lab, including completed steps.
    pub fn get_progress(&self, lab_id: &str) -> Result<Option<LabProgress>> {
        let mut progress = self
            .connection
            .query_row(SELECT_LAB_SQL, params![lab_id], lab_progress_from_row)
            .optional()
            .db_context("Failed to query progress")?;

        if let Some(ref mut progress) = progress {
            progress.completed_steps = self.get_step_completions(lab_id)?;
        }
        Ok(progress)
    }

    /// Lists every progress record, most recently updated first.
    pub fn list_progress(&self) -> Result<Vec<LabProgress>> {
        let mut stmt = self
            .connection
            .prepare(LIST_LABS_SQL)
            .db_context("Failed to prepare query")?;
        let records = stmt
            .query_map([], lab_progress_from_row)
            .db_context("Failed to list progress")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read progress row")?;
        Ok(records)
    }

    fn get_step_completions(&self, lab_id: &str) -> Result<Vec<StepCompletion>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_STEPS_SQL)
            .db_context("Failed to prepare query")?;
        let steps = stmt
            .query_map(params![lab_id], |row| {
                Ok(StepCompletion {
                    step_id: row.get(0)?,
                    completed_at: parse_timestamp(row, 1)?,
                })
            })
            .db_context("Failed to query step completions")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read step completion row")?;
        Ok(steps)
    }

    /// Deletes all progress for a lab. Returns `false` if there was none.
    pub fn clear_progress(&mut self, lab_id: &str) -> Result<bool> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        tx.execute(DELETE_STEPS_SQL, params![lab_id])
            .db_context("Failed to delete step progress")?;
        let deleted = tx
            .execute(DELETE_LAB_SQL, params![lab_id])
            .db_context("Failed to delete lab progress")?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(deleted > 0)
    }
}
