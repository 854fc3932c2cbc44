//! wellness.daily_log.v1 schema definition
//!
//! One record per (subject, calendar day). Numeric fields are non-negative,
//! mood is bounded to 1-5, and height/weight must be positive so BMI stays
//! derivable.

use crate::types::DailyLog;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current schema version
pub const SCHEMA_VERSION: &str = "wellness.daily_log.v1";

/// Validation failure for a single log record
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchemaVersion(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Field '{field}' must be non-negative, got {value}")]
    NegativeValue { field: &'static str, value: f64 },

    #[error("Mood must be in 1-5, got {0}")]
    MoodOutOfRange(u8),

    #[error("Field '{field}' must be positive, got {value}")]
    NonPositiveValue { field: &'static str, value: f64 },
}

/// A daily log as it arrives on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// Must equal [`SCHEMA_VERSION`]
    pub schema_version: String,
    /// Optional client-assigned record ID, echoed in validation reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    /// Subject the log belongs to; callers may also scope a whole batch
    /// to one subject and omit this
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    #[serde(flatten)]
    pub log: DailyLog,
}

impl LogRecord {
    /// New record for the current schema version
    pub fn new(log: DailyLog) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            record_id: None,
            subject_id: None,
            log,
        }
    }

    /// Validate the record against the schema rules
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(ValidationError::UnsupportedSchemaVersion(
                self.schema_version.clone(),
            ));
        }

        if NaiveDate::parse_from_str(&self.log.date, "%Y-%m-%d").is_err() {
            return Err(ValidationError::InvalidDate(self.log.date.clone()));
        }

        check_non_negative("water_ml", self.log.water_ml)?;
        check_non_negative("sleep_hours", self.log.sleep_hours)?;

        if !(1..=5).contains(&self.log.mood) {
            return Err(ValidationError::MoodOutOfRange(self.log.mood));
        }

        check_positive("height_cm", self.log.height_cm)?;
        check_positive("weight_kg", self.log.weight_kg)?;

        for (field, value) in [
            ("waist_cm", self.log.waist_cm),
            ("hip_cm", self.log.hip_cm),
            ("chest_cm", self.log.chest_cm),
            ("body_fat_pct", self.log.body_fat_pct),
        ] {
            if let Some(v) = value {
                check_non_negative(field, v)?;
            }
        }

        Ok(())
    }

    /// Consume the record, returning the inner log
    pub fn into_log(self) -> DailyLog {
        self.log
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value < 0.0 {
        Err(ValidationError::NegativeValue { field, value })
    } else {
        Ok(())
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value <= 0.0 {
        Err(ValidationError::NonPositiveValue { field, value })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> LogRecord {
        LogRecord::new(DailyLog::new(
            "2024-01-15",
            2000.0,
            7.5,
            4,
            45,
            175.0,
            70.0,
        ))
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(record().validate().is_ok());
    }

    #[test]
    fn test_rejects_wrong_schema_version() {
        let mut r = record();
        r.schema_version = "wellness.daily_log.v0".to_string();
        assert!(matches!(
            r.validate(),
            Err(ValidationError::UnsupportedSchemaVersion(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_date() {
        let mut r = record();
        r.log.date = "15/01/2024".to_string();
        assert!(matches!(r.validate(), Err(ValidationError::InvalidDate(_))));
    }

    #[test]
    fn test_rejects_mood_out_of_range() {
        let mut r = record();
        r.log.mood = 0;
        assert_eq!(r.validate(), Err(ValidationError::MoodOutOfRange(0)));
        r.log.mood = 6;
        assert_eq!(r.validate(), Err(ValidationError::MoodOutOfRange(6)));
    }

    #[test]
    fn test_rejects_negative_water() {
        let mut r = record();
        r.log.water_ml = -1.0;
        assert!(matches!(
            r.validate(),
            Err(ValidationError::NegativeValue { field: "water_ml", .. })
        ));
    }

    #[test]
    fn test_rejects_zero_height() {
        let mut r = record();
        r.log.height_cm = 0.0;
        assert!(matches!(
            r.validate(),
            Err(ValidationError::NonPositiveValue { field: "height_cm", .. })
        ));
    }

    #[test]
    fn test_wire_shape_is_flattened() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["schema_version"], SCHEMA_VERSION);
        assert_eq!(json["date"], "2024-01-15");
        assert_eq!(json["water_ml"], 2000.0);
        // unset optionals stay off the wire
        assert!(json.get("waist_cm").is_none());
    }
}
