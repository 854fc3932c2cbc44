//! Core types for the Vitamorph pipeline
//!
//! This module defines the data structures that flow through each stage of
//! the pipeline: daily logs, metric summaries, avatar parameters, and the
//! frame payload handed to the rendering layer.

use serde::{Deserialize, Serialize};

/// A single day's wellness log for one subject.
///
/// At most one log exists per (subject, date); the store enforces this with
/// upsert-on-date semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    /// Calendar day key (YYYY-MM-DD)
    pub date: String,
    /// Water intake (ml)
    pub water_ml: f64,
    /// Sleep duration (hours)
    pub sleep_hours: f64,
    /// Mood on a 1-5 scale
    pub mood: u8,
    /// Exercise duration (minutes)
    pub exercise_minutes: u32,
    /// Height (cm)
    pub height_cm: f64,
    /// Weight (kg)
    pub weight_kg: f64,
    /// Kind of exercise logged (free text)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise_type: Option<String>,
    /// Waist circumference (cm), carried but unused by the core
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waist_cm: Option<f64>,
    /// Hip circumference (cm), carried but unused by the core
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hip_cm: Option<f64>,
    /// Chest circumference (cm), carried but unused by the core
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chest_cm: Option<f64>,
    /// Body fat (percentage), carried but unused by the core
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_fat_pct: Option<f64>,
}

impl DailyLog {
    /// Minimal log with the fields the core computation reads
    pub fn new(
        date: impl Into<String>,
        water_ml: f64,
        sleep_hours: f64,
        mood: u8,
        exercise_minutes: u32,
        height_cm: f64,
        weight_kg: f64,
    ) -> Self {
        Self {
            date: date.into(),
            water_ml,
            sleep_hours,
            mood,
            exercise_minutes,
            height_cm,
            weight_kg,
            exercise_type: None,
            waist_cm: None,
            hip_cm: None,
            chest_cm: None,
            body_fat_pct: None,
        }
    }
}

/// Scalar reduction of the most recent log window (newest first, at most 7
/// entries). Produced by the aggregator, consumed by the mapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    /// Number of logs actually in the window (1-7)
    pub window_len: usize,
    /// Sum of exercise minutes over the window
    pub total_exercise_minutes: f64,
    /// Mean water intake (ml/day) over the window
    pub avg_water_ml: f64,
    /// Mean sleep (hours/day) over the window
    pub avg_sleep_hours: f64,
    /// Mean mood over the window
    pub avg_mood: f64,
    /// Body mass index from the single most recent log.
    /// None when the latest height is not positive.
    pub bmi: Option<f64>,
    /// Date of the most recent log
    pub latest_date: String,
    /// Height from the most recent log (cm)
    pub latest_height_cm: f64,
    /// Weight from the most recent log (kg)
    pub latest_weight_kg: f64,
}

/// Bounded avatar parameters derived from a metric summary.
///
/// Ephemeral: recomputed on every read, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarParameters {
    /// Torso width in SVG units, 60-120
    pub body_width: f64,
    /// Muscle definition, 0-100
    pub muscle_definition: f64,
    /// Hydration level, 0-100
    pub hydration_level: f64,
    /// Energy level, 0-100
    pub energy_level: f64,
    /// Pass-through mean sleep, drives discrete visual toggles
    pub avg_sleep: f64,
    /// Pass-through mean mood, drives discrete visual toggles
    pub avg_mood: f64,
}

impl Default for AvatarParameters {
    /// New-subject placeholder appearance, used when no logs exist.
    /// Not an error path; the values are part of the product contract.
    fn default() -> Self {
        Self {
            body_width: 80.0,
            muscle_definition: 30.0,
            hydration_level: 50.0,
            energy_level: 60.0,
            avg_sleep: 7.0,
            avg_mood: 3.0,
        }
    }
}

/// Mouth expression driven by the mood average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouthShape {
    Smile,
    Frown,
}

/// Boolean feature toggles for the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarFeatures {
    /// Dashed ring around the figure (energy > 70)
    pub energy_aura: bool,
    /// Radiant glow behind the head (hydration > 80)
    pub radiant_glow: bool,
    /// Sparkle dots above the head (hydration > 90)
    pub sparkles: bool,
    /// Primary hydration wave across the torso (hydration > 60)
    pub hydration_wave: bool,
    /// Dark circles under the eyes (sleep < 6)
    pub dark_circles: bool,
    /// Desaturated body fill (sleep < 6)
    pub tired_fill: bool,
    /// Chest muscle path (muscle > 40)
    pub chest_muscle: bool,
    /// Widened arm rectangles (muscle > 50)
    pub arm_boost: bool,
    /// Sweat-drop marks (muscle > 70)
    pub sweat_drops: bool,
}

/// Continuous style attributes for the rendering layer.
///
/// Opacities are linear in the driving parameter (value / 100) regardless
/// of whether the associated feature flag is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarStyle {
    pub energy_aura_opacity: f64,
    pub hydration_wave_opacity: f64,
    pub chest_muscle_opacity: f64,
    /// 1.0 when mood > 3, dimmed otherwise
    pub eye_opacity: f64,
    pub mouth: MouthShape,
    /// Torso width, mirrors the body_width parameter
    pub body_width: f64,
    /// Arm rectangle width, includes the muscle boost when active
    pub arm_width: f64,
    /// Arm rectangle corner radius, includes the muscle boost when active
    pub arm_radius: f64,
}

/// Frame producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Frame provenance information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameProvenance {
    /// Subject whose logs produced this frame
    pub subject_id: String,
    /// Total logs supplied (the window may be smaller)
    pub log_count: usize,
    /// Date of the most recent log, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_date: Option<String>,
    pub computed_at_utc: String,
}

/// Complete avatar render frame (avatar.frame.v1)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarFrame {
    pub frame_version: String,
    pub producer: FrameProducer,
    pub provenance: FrameProvenance,
    /// Aggregated metrics behind the parameters; absent for the
    /// new-subject default frame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<MetricSummary>,
    pub parameters: AvatarParameters,
    pub features: AvatarFeatures,
    pub style: AvatarStyle,
}
