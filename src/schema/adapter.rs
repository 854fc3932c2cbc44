//! Raw input adapter
//!
//! Turns NDJSON or JSON-array input into validated, deduplicated,
//! newest-first log slices. Duplicate dates keep the last occurrence, so
//! re-submitting a day overwrites the earlier entry.

use crate::error::ComputeError;
use crate::schema::daily_log::{LogRecord, ValidationError};
use crate::types::DailyLog;
use std::collections::BTreeMap;

/// Validation outcome for one record in a batch
#[derive(Debug, Clone)]
pub struct RecordValidation {
    /// Zero-based position in the input
    pub index: usize,
    pub record_id: Option<String>,
    pub error: Option<ValidationError>,
}

impl RecordValidation {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Adapter for the wellness.daily_log.v1 wire formats
pub struct LogAdapter;

impl LogAdapter {
    /// Parse newline-delimited JSON, one record per non-blank line
    pub fn parse_ndjson(input: &str) -> Result<Vec<LogRecord>, ComputeError> {
        input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| serde_json::from_str(line).map_err(ComputeError::JsonError))
            .collect()
    }

    /// Parse a JSON array of records
    pub fn parse_array(input: &str) -> Result<Vec<LogRecord>, ComputeError> {
        serde_json::from_str(input).map_err(ComputeError::JsonError)
    }

    /// Validate every record, returning one report per input record
    pub fn validate_records(records: &[LogRecord]) -> Vec<RecordValidation> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| RecordValidation {
                index,
                record_id: record.record_id.clone(),
                error: record.validate().err(),
            })
            .collect()
    }

    /// Validate, dedupe by date (last occurrence wins) and sort
    /// newest-first, producing the slice the pipeline consumes.
    ///
    /// The first invalid record aborts the whole batch.
    pub fn to_logs(records: Vec<LogRecord>) -> Result<Vec<DailyLog>, ComputeError> {
        let mut by_date: BTreeMap<String, DailyLog> = BTreeMap::new();
        for record in records {
            record
                .validate()
                .map_err(|e| ComputeError::InvalidLog(e.to_string()))?;
            let log = record.into_log();
            by_date.insert(log.date.clone(), log);
        }

        // BTreeMap iterates ascending; the pipeline wants newest-first
        Ok(by_date.into_values().rev().collect())
    }
}
