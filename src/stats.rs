//! Period statistics and health insights
//!
//! Rolling 30-day summaries and the rule-based advice strings derived from
//! them. Operates on oldest-first slices, the shape the store's range
//! queries produce.

use crate::types::DailyLog;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Length of the statistics window in days
pub const STATS_WINDOW_DAYS: usize = 30;

/// First date included in the statistics window ending `today`.
/// Pair with [`LogStore::logs_since`](crate::store::LogStore::logs_since)
/// to fetch the window's logs oldest-first.
pub fn stats_window_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(STATS_WINDOW_DAYS as i64 - 1)
}

/// Daily water intake below which the hydration advice fires (ml)
const WATER_TARGET_ML: f64 = 2000.0;
/// Sleep average below which the sleep advice fires (hours)
const SLEEP_TARGET_HOURS: f64 = 7.0;
/// Daily exercise average below which the activity advice fires (minutes)
const EXERCISE_TARGET_MINUTES: f64 = 30.0;
/// BMI above which the weight advice fires
const BMI_ADVICE_MAX: f64 = 25.0;

/// Aggregated statistics over one logging period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub days_logged: usize,
    pub avg_water_ml: f64,
    pub avg_sleep_hours: f64,
    pub avg_mood: f64,
    pub total_exercise_minutes: f64,
    pub avg_weight_kg: f64,
    /// Latest weight minus oldest weight within the period
    pub weight_change_kg: f64,
}

/// Compute period statistics over logs ordered oldest-first.
///
/// Returns `None` for an empty slice.
pub fn period_stats(logs_asc: &[DailyLog]) -> Option<PeriodStats> {
    let first = logs_asc.first()?;
    let last = logs_asc.last()?;
    let n = logs_asc.len() as f64;

    Some(PeriodStats {
        days_logged: logs_asc.len(),
        avg_water_ml: logs_asc.iter().map(|l| l.water_ml).sum::<f64>() / n,
        avg_sleep_hours: logs_asc.iter().map(|l| l.sleep_hours).sum::<f64>() / n,
        avg_mood: logs_asc.iter().map(|l| l.mood as f64).sum::<f64>() / n,
        total_exercise_minutes: logs_asc.iter().map(|l| l.exercise_minutes as f64).sum(),
        avg_weight_kg: logs_asc.iter().map(|l| l.weight_kg).sum::<f64>() / n,
        weight_change_kg: last.weight_kg - first.weight_kg,
    })
}

/// WHO-style BMI bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Normal
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }
}

/// BMI plus advice strings derived from a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthInsights {
    pub bmi: Option<f64>,
    pub category: Option<BmiCategory>,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub advice: Vec<String>,
}

/// Derive insights from logs ordered oldest-first. BMI comes from the
/// latest log; advice from the period averages.
pub fn health_insights(logs_asc: &[DailyLog]) -> Option<HealthInsights> {
    let stats = period_stats(logs_asc)?;
    let latest = logs_asc.last()?;

    let bmi = if latest.height_cm > 0.0 {
        let height_m = latest.height_cm / 100.0;
        Some(latest.weight_kg / (height_m * height_m))
    } else {
        None
    };
    let category = bmi.map(BmiCategory::from_bmi);

    let daily_exercise = stats.total_exercise_minutes / stats.days_logged as f64;

    let mut advice = Vec::new();
    if stats.avg_water_ml < WATER_TARGET_ML {
        advice.push("Try to drink at least 2L of water daily".to_string());
    }
    if stats.avg_sleep_hours < SLEEP_TARGET_HOURS {
        advice.push("Aim for 7-9 hours of sleep per night".to_string());
    }
    if daily_exercise < EXERCISE_TARGET_MINUTES {
        advice.push("Aim for at least 30 minutes of exercise daily".to_string());
    }
    if bmi.is_some_and(|b| b > BMI_ADVICE_MAX) {
        advice.push("Consider a balanced diet and regular exercise".to_string());
    }

    Some(HealthInsights {
        bmi,
        category,
        height_cm: latest.height_cm,
        weight_kg: latest.weight_kg,
        advice,
    })
}
