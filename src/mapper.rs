//! Parameter mapping
//!
//! Maps a metric summary onto the four bounded avatar parameters using
//! fixed linear formulas. Pure and deterministic; the only configuration
//! is how the body width is chosen.

use crate::types::{AvatarParameters, MetricSummary};
use serde::{Deserialize, Serialize};

/// Neutral body width in SVG units
pub const NEUTRAL_BODY_WIDTH: f64 = 80.0;

/// Daily water intake treated as 100% hydration (ml)
pub const HYDRATION_FULL_ML: f64 = 2000.0;

/// Sleep baseline for the energy formula (hours)
pub const SLEEP_BASELINE_HOURS: f64 = 8.0;

/// Maximum of the mood scale
pub const MOOD_SCALE_MAX: f64 = 5.0;

/// How the torso width is derived. Both behaviors ship in the product:
/// the compact avatar keeps a fixed width, the detailed one scales it
/// with BMI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyWidthMode {
    /// Always the neutral width
    #[default]
    Fixed,
    /// 80 + (bmi - 22) * 8, clamped to 60-120
    BmiDerived,
}

/// Mapper from metric summaries to avatar parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterMapper {
    body_width_mode: BodyWidthMode,
}

impl ParameterMapper {
    pub fn new(body_width_mode: BodyWidthMode) -> Self {
        Self { body_width_mode }
    }

    pub fn body_width_mode(&self) -> BodyWidthMode {
        self.body_width_mode
    }

    /// Map an aggregated summary to avatar parameters.
    ///
    /// The percentage-like outputs have no explicit lower clamp; they stay
    /// non-negative because the inputs are.
    pub fn map(&self, summary: &MetricSummary) -> AvatarParameters {
        let body_width = match (self.body_width_mode, summary.bmi) {
            (BodyWidthMode::BmiDerived, Some(bmi)) => {
                (NEUTRAL_BODY_WIDTH + (bmi - 22.0) * 8.0).clamp(60.0, 120.0)
            }
            // Fixed mode, or BMI undefined (zero height)
            _ => NEUTRAL_BODY_WIDTH,
        };

        let muscle_definition = (summary.total_exercise_minutes / 10.0).min(100.0);
        let hydration_level = ((summary.avg_water_ml / HYDRATION_FULL_ML) * 100.0).min(100.0);
        let energy_level = ((summary.avg_sleep_hours / SLEEP_BASELINE_HOURS
            + summary.avg_mood / MOOD_SCALE_MAX)
            * 50.0)
            .min(100.0);

        AvatarParameters {
            body_width,
            muscle_definition,
            hydration_level,
            energy_level,
            avg_sleep: summary.avg_sleep_hours,
            avg_mood: summary.avg_mood,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(
        total_exercise: f64,
        avg_water: f64,
        avg_sleep: f64,
        avg_mood: f64,
        bmi: Option<f64>,
    ) -> MetricSummary {
        MetricSummary {
            window_len: 7,
            total_exercise_minutes: total_exercise,
            avg_water_ml: avg_water,
            avg_sleep_hours: avg_sleep,
            avg_mood,
            bmi,
            latest_date: "2024-01-15".to_string(),
            latest_height_cm: 175.0,
            latest_weight_kg: 70.0,
        }
    }

    #[test]
    fn test_muscle_saturates_at_1000_minutes() {
        let mapper = ParameterMapper::default();
        let below = mapper.map(&summary(700.0, 0.0, 0.0, 0.0, None));
        assert!((below.muscle_definition - 70.0).abs() < f64::EPSILON);

        let at = mapper.map(&summary(1000.0, 0.0, 0.0, 0.0, None));
        assert!((at.muscle_definition - 100.0).abs() < f64::EPSILON);

        let above = mapper.map(&summary(5000.0, 0.0, 0.0, 0.0, None));
        assert!((above.muscle_definition - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hydration_scale() {
        let mapper = ParameterMapper::default();
        let half = mapper.map(&summary(0.0, 1000.0, 0.0, 0.0, None));
        assert!((half.hydration_level - 50.0).abs() < f64::EPSILON);

        let full = mapper.map(&summary(0.0, 2000.0, 0.0, 0.0, None));
        assert!((full.hydration_level - 100.0).abs() < f64::EPSILON);

        let over = mapper.map(&summary(0.0, 3500.0, 0.0, 0.0, None));
        assert!((over.hydration_level - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_energy_two_term_formula() {
        let mapper = ParameterMapper::default();
        // Full sleep + full mood saturates at 100
        let full = mapper.map(&summary(0.0, 0.0, 8.0, 5.0, None));
        assert!((full.energy_level - 100.0).abs() < f64::EPSILON);

        // Sleep-only: 8h sleep, mood 0 contributes exactly 50
        let sleep_only = mapper.map(&summary(0.0, 0.0, 8.0, 0.0, None));
        assert!((sleep_only.energy_level - 50.0).abs() < f64::EPSILON);

        // Half sleep, no mood: (4/8) * 50 = 25
        let low = mapper.map(&summary(0.0, 0.0, 4.0, 0.0, None));
        assert!((low.energy_level - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fixed_body_width_ignores_bmi() {
        let mapper = ParameterMapper::new(BodyWidthMode::Fixed);
        let params = mapper.map(&summary(0.0, 0.0, 0.0, 0.0, Some(35.0)));
        assert!((params.body_width - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bmi_derived_body_width_and_clamps() {
        let mapper = ParameterMapper::new(BodyWidthMode::BmiDerived);

        // Neutral BMI maps to neutral width
        let neutral = mapper.map(&summary(0.0, 0.0, 0.0, 0.0, Some(22.0)));
        assert!((neutral.body_width - 80.0).abs() < f64::EPSILON);

        // 80 + (25 - 22) * 8 = 104
        let heavier = mapper.map(&summary(0.0, 0.0, 0.0, 0.0, Some(25.0)));
        assert!((heavier.body_width - 104.0).abs() < f64::EPSILON);

        // Clamped to the 60-120 band
        let high = mapper.map(&summary(0.0, 0.0, 0.0, 0.0, Some(40.0)));
        assert!((high.body_width - 120.0).abs() < f64::EPSILON);
        let low = mapper.map(&summary(0.0, 0.0, 0.0, 0.0, Some(10.0)));
        assert!((low.body_width - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bmi_derived_falls_back_when_bmi_undefined() {
        let mapper = ParameterMapper::new(BodyWidthMode::BmiDerived);
        let params = mapper.map(&summary(0.0, 0.0, 0.0, 0.0, None));
        assert!((params.body_width - 80.0).abs() < f64::EPSILON);
    }
}
