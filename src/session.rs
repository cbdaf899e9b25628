use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::schedule::countdown::CountdownStatus;
use crate::schedule::model::{ColumnLayout, Schedule, ScheduleError};
use crate::schedule::parser::parse;
use crate::store::{ScheduleStore, StorageError, load_snapshot, save_snapshot};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub accepted: usize,
    pub dropped: usize,
}

/// Owns the current schedule and mirrors every replacement to the store.
pub struct Session {
    schedule: Schedule,
    layout: ColumnLayout,
    store: Box<dyn ScheduleStore>,
    store_key: String,
    last_store_error: Option<String>,
}

impl Session {
    /// Never fails: an unreadable or corrupt snapshot starts an empty session.
    pub fn open(
        store: Box<dyn ScheduleStore>,
        store_key: impl Into<String>,
        layout: ColumnLayout,
    ) -> Self {
        let store_key = store_key.into();
        let mut last_store_error = None;
        let schedule = match load_snapshot(&*store, &store_key) {
            Ok(Some(schedule)) => {
                debug!(key = %store_key, items = schedule.len(), "restored schedule");
                schedule
            }
            Ok(None) => Schedule::empty(),
            Err(err) => {
                warn!(key = %store_key, error = %err, "ignoring unreadable stored schedule");
                last_store_error = Some(err.to_string());
                Schedule::empty()
            }
        };
        Self {
            schedule,
            layout,
            store,
            store_key,
            last_store_error,
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn last_store_error(&self) -> Option<&str> {
        self.last_store_error.as_deref()
    }

    pub fn import_text(&mut self, text: &str) -> ImportSummary {
        let outcome = parse(text, &self.layout);
        let summary = ImportSummary {
            accepted: outcome.schedule.len(),
            dropped: outcome.dropped,
        };
        info!(
            accepted = summary.accepted,
            dropped = summary.dropped,
            "imported schedule"
        );
        self.replace(outcome.schedule);
        summary
    }

    /// A read failure leaves the current schedule untouched.
    pub fn import_file(&mut self, path: &Path) -> Result<ImportSummary, ScheduleError> {
        let bytes = fs::read(path).map_err(|source| ScheduleError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(self.import_text(&text))
    }

    /// Drops the stored snapshot so the next open starts empty.
    pub fn clear(&mut self) {
        info!("cleared schedule");
        self.schedule = Schedule::empty();
        match self.store.remove(&self.store_key) {
            Ok(()) => self.last_store_error = None,
            Err(err) => {
                warn!(key = %self.store_key, error = %err, "failed to remove stored schedule");
                self.last_store_error = Some(err.to_string());
            }
        }
    }

    pub fn status(&self, query_sec: u32) -> CountdownStatus {
        CountdownStatus::at(&self.schedule, query_sec)
    }

    fn replace(&mut self, schedule: Schedule) {
        self.schedule = schedule;
        match self.persist() {
            Ok(()) => self.last_store_error = None,
            Err(err) => {
                warn!(key = %self.store_key, error = %err, "failed to persist schedule");
                self.last_store_error = Some(err.to_string());
            }
        }
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        save_snapshot(&mut *self.store, &self.store_key, &self.schedule)
    }
}
