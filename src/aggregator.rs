//! Metric aggregation
//!
//! Reduces the most recent daily logs (newest first, at most 7) into the
//! scalar averages and sums the parameter mapper consumes. BMI comes from
//! the single most recent log only, never averaged.

use crate::types::{DailyLog, MetricSummary};

/// Number of most-recent logs the avatar computation reads
pub const WINDOW_DAYS: usize = 7;

/// Aggregator for reducing a log window into a metric summary
pub struct MetricAggregator;

impl MetricAggregator {
    /// Aggregate logs ordered newest-first.
    ///
    /// Returns None for an empty slice; the pipeline substitutes the
    /// new-subject default parameters in that case, so no division by
    /// zero can occur here.
    pub fn aggregate(logs: &[DailyLog]) -> Option<MetricSummary> {
        let latest = logs.first()?;
        let recent = &logs[..logs.len().min(WINDOW_DAYS)];
        let n = recent.len() as f64;

        let total_exercise_minutes: f64 =
            recent.iter().map(|log| f64::from(log.exercise_minutes)).sum();
        let avg_water_ml = recent.iter().map(|log| log.water_ml).sum::<f64>() / n;
        let avg_sleep_hours = recent.iter().map(|log| log.sleep_hours).sum::<f64>() / n;
        let avg_mood = recent.iter().map(|log| f64::from(log.mood)).sum::<f64>() / n;

        Some(MetricSummary {
            window_len: recent.len(),
            total_exercise_minutes,
            avg_water_ml,
            avg_sleep_hours,
            avg_mood,
            bmi: compute_bmi(latest),
            latest_date: latest.date.clone(),
            latest_height_cm: latest.height_cm,
            latest_weight_kg: latest.weight_kg,
        })
    }
}

/// BMI = weight (kg) / height (m)^2, from one log.
/// Undefined for non-positive height.
fn compute_bmi(log: &DailyLog) -> Option<f64> {
    if log.height_cm > 0.0 {
        let height_m = log.height_cm / 100.0;
        Some(log.weight_kg / (height_m * height_m))
    } else {
        None
    }
}
