//! Pipeline orchestration
//!
//! This module provides the public API for Vitamorph. It runs the full
//! pipeline from a newest-first log slice to an avatar frame:
//! aggregation → parameter mapping → frame encoding.

use crate::aggregator::MetricAggregator;
use crate::encoder::AvatarEncoder;
use crate::error::ComputeError;
use crate::mapper::{BodyWidthMode, ParameterMapper};
use crate::types::{AvatarFrame, AvatarParameters, DailyLog};

/// Compute an avatar frame from logs ordered newest-first.
///
/// Uses the fixed body-width configuration. An empty slice produces the
/// new-subject default frame, not an error.
///
/// # Example
/// ```ignore
/// let frame = logs_to_frame(&logs, "subject-123");
/// assert_eq!(frame.frame_version, "avatar.frame.v1");
/// ```
pub fn logs_to_frame(logs: &[DailyLog], subject_id: &str) -> AvatarFrame {
    AvatarProcessor::new().process(logs, subject_id)
}

/// Compute an avatar frame and serialize it to JSON
pub fn logs_to_frame_json(logs: &[DailyLog], subject_id: &str) -> Result<String, ComputeError> {
    AvatarProcessor::new().process_to_json(logs, subject_id)
}

/// Configured processor holding a parameter mapper and a frame encoder.
///
/// Use this when computing many frames so they share one encoder
/// instance ID.
pub struct AvatarProcessor {
    mapper: ParameterMapper,
    encoder: AvatarEncoder,
}

impl Default for AvatarProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl AvatarProcessor {
    /// Processor with the fixed body-width configuration
    pub fn new() -> Self {
        Self::with_body_width_mode(BodyWidthMode::Fixed)
    }

    /// Processor with an explicit body-width configuration
    pub fn with_body_width_mode(mode: BodyWidthMode) -> Self {
        Self {
            mapper: ParameterMapper::new(mode),
            encoder: AvatarEncoder::new(),
        }
    }

    pub fn body_width_mode(&self) -> BodyWidthMode {
        self.mapper.body_width_mode()
    }

    /// Run the pipeline over logs ordered newest-first
    pub fn process(&self, logs: &[DailyLog], subject_id: &str) -> AvatarFrame {
        match MetricAggregator::aggregate(logs) {
            Some(summary) => {
                let params = self.mapper.map(&summary);
                self.encoder
                    .encode(subject_id, params, Some(summary), logs.len())
            }
            None => self
                .encoder
                .encode(subject_id, AvatarParameters::default(), None, 0),
        }
    }

    /// Run the pipeline and serialize the frame to JSON
    pub fn process_to_json(
        &self,
        logs: &[DailyLog],
        subject_id: &str,
    ) -> Result<String, ComputeError> {
        let frame = self.process(logs, subject_id);
        serde_json::to_string_pretty(&frame).map_err(ComputeError::JsonError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn uniform_week() -> Vec<DailyLog> {
        (0..7)
            .map(|i| {
                DailyLog::new(
                    format!("2024-01-{:02}", 16 - i),
                    2000.0,
                    8.0,
                    5,
                    100,
                    175.0,
                    70.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_logs_yield_exact_default_parameters() {
        let frame = logs_to_frame(&[], "subject-1");

        assert_eq!(frame.parameters, AvatarParameters::default());
        assert!((frame.parameters.body_width - 80.0).abs() < f64::EPSILON);
        assert!((frame.parameters.muscle_definition - 30.0).abs() < f64::EPSILON);
        assert!((frame.parameters.hydration_level - 50.0).abs() < f64::EPSILON);
        assert!((frame.parameters.energy_level - 60.0).abs() < f64::EPSILON);
        assert!((frame.parameters.avg_sleep - 7.0).abs() < f64::EPSILON);
        assert!((frame.parameters.avg_mood - 3.0).abs() < f64::EPSILON);
        assert!(frame.summary.is_none());
    }

    #[test]
    fn test_uniform_week_end_to_end() {
        let frame = logs_to_frame(&uniform_week(), "subject-1");
        let p = &frame.parameters;

        assert!((p.hydration_level - 100.0).abs() < f64::EPSILON);
        assert!((p.energy_level - 100.0).abs() < f64::EPSILON);
        // 7 * 100 = 700 exercise minutes -> 70, below the 1000-minute cap
        assert!((p.muscle_definition - 70.0).abs() < f64::EPSILON);

        let summary = frame.summary.as_ref().unwrap();
        let bmi = summary.bmi.unwrap();
        assert!((bmi - 22.857).abs() < 0.001);

        let f = &frame.features;
        assert!(f.energy_aura);
        assert!(f.radiant_glow);
        assert!(f.sparkles);
        assert!(f.hydration_wave);
        assert!(f.chest_muscle);
        assert!(f.arm_boost);
        assert!(!f.sweat_drops); // 70 does not clear the strict > 70 bar
        assert!(!f.dark_circles);
    }

    #[test]
    fn test_old_logs_beyond_window_do_not_change_output() {
        let week = uniform_week();
        let mut padded = week.clone();
        for i in 0..5 {
            padded.push(DailyLog::new(
                format!("2024-01-{:02}", 9 - i),
                0.0,
                0.0,
                1,
                0,
                175.0,
                70.0,
            ));
        }

        let processor = AvatarProcessor::new();
        let a = processor.process(&week, "subject-1");
        let b = processor.process(&padded, "subject-1");

        assert_eq!(a.parameters, b.parameters);
        assert_eq!(a.features, b.features);
        assert_eq!(a.style, b.style);
    }

    #[test]
    fn test_idempotent_over_same_input() {
        let logs = uniform_week();
        let processor = AvatarProcessor::new();

        let a = processor.process(&logs, "subject-1");
        let b = processor.process(&logs, "subject-1");

        assert_eq!(a.parameters, b.parameters);
        assert_eq!(a.features, b.features);
        assert_eq!(a.style, b.style);
        assert_eq!(a.summary, b.summary);
    }

    #[test]
    fn test_body_width_modes_diverge_only_on_width() {
        let logs = uniform_week();
        let fixed = AvatarProcessor::new().process(&logs, "s");
        let derived =
            AvatarProcessor::with_body_width_mode(BodyWidthMode::BmiDerived).process(&logs, "s");

        assert!((fixed.parameters.body_width - 80.0).abs() < f64::EPSILON);
        // 80 + (22.857 - 22) * 8 = 86.857...
        assert!((derived.parameters.body_width - 86.857).abs() < 0.01);
        assert_eq!(
            fixed.parameters.muscle_definition,
            derived.parameters.muscle_definition
        );
        assert_eq!(
            fixed.parameters.hydration_level,
            derived.parameters.hydration_level
        );
    }

    #[test]
    fn test_process_to_json_round_trips() {
        let json = logs_to_frame_json(&uniform_week(), "subject-1").unwrap();
        let frame: AvatarFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(frame.provenance.subject_id, "subject-1");
        assert_eq!(frame.provenance.log_count, 7);
        assert_eq!(frame.provenance.latest_date.as_deref(), Some("2024-01-16"));
    }
}
