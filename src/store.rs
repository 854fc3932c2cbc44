//! In-memory log store
//!
//! Holds daily logs per subject, keyed by calendar date so each (subject,
//! day) pair has exactly one entry. Serializable so hosts can persist it
//! between sessions.

use crate::error::ComputeError;
use crate::types::DailyLog;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Per-subject daily log storage with upsert-on-date semantics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogStore {
    subjects: HashMap<String, BTreeMap<String, DailyLog>>,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the log for (subject, log.date).
    ///
    /// Returns the previous log for that date, if any.
    pub fn upsert(&mut self, subject_id: &str, log: DailyLog) -> Option<DailyLog> {
        self.subjects
            .entry(subject_id.to_string())
            .or_default()
            .insert(log.date.clone(), log)
    }

    /// Log for one specific date
    pub fn get(&self, subject_id: &str, date: &str) -> Option<&DailyLog> {
        self.subjects.get(subject_id)?.get(date)
    }

    /// Remove the log for one date, returning it if present
    pub fn delete(&mut self, subject_id: &str, date: &str) -> Option<DailyLog> {
        self.subjects.get_mut(subject_id)?.remove(date)
    }

    /// All logs for a subject, newest-first. This is the slice shape the
    /// pipeline consumes.
    pub fn logs_desc(&self, subject_id: &str) -> Vec<DailyLog> {
        match self.subjects.get(subject_id) {
            Some(days) => days.values().rev().cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Logs on or after `start_date`, oldest-first
    pub fn logs_since(&self, subject_id: &str, start_date: &str) -> Vec<DailyLog> {
        match self.subjects.get(subject_id) {
            Some(days) => days
                .range(start_date.to_string()..)
                .map(|(_, log)| log.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Number of logged days for a subject
    pub fn log_count(&self, subject_id: &str) -> usize {
        self.subjects.get(subject_id).map_or(0, BTreeMap::len)
    }

    /// All known subject IDs, sorted for stable iteration
    pub fn subjects(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.subjects.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Serialize the full store to JSON
    pub fn to_json(&self) -> Result<String, ComputeError> {
        serde_json::to_string(self).map_err(ComputeError::JsonError)
    }

    /// Restore a store from JSON produced by [`to_json`](Self::to_json)
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        serde_json::from_str(json).map_err(ComputeError::JsonError)
    }
}
