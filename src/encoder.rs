//! Frame encoding
//!
//! Encodes avatar parameters into an `avatar.frame.v1` payload: boolean
//! feature flags, continuous style attributes, producer metadata and
//! provenance. The flag thresholds are the product's visual contract and
//! must hold bit-for-bit; every comparison is strict.

use crate::error::ComputeError;
use crate::types::{
    AvatarFeatures, AvatarFrame, AvatarParameters, AvatarStyle, FrameProducer, FrameProvenance,
    MetricSummary, MouthShape,
};
use crate::{MORPH_VERSION, PRODUCER_NAME};
use chrono::Utc;
use uuid::Uuid;

/// Current frame schema version
pub const FRAME_VERSION: &str = "avatar.frame.v1";

/// Energy level above which the dashed aura ring appears
pub const ENERGY_AURA_MIN: f64 = 70.0;
/// Hydration level above which the radiant glow appears
pub const GLOW_MIN: f64 = 80.0;
/// Hydration level above which sparkles appear
pub const SPARKLE_MIN: f64 = 90.0;
/// Hydration level above which the primary wave appears
pub const WAVE_MIN: f64 = 60.0;
/// Sleep average below which dark circles and the tired fill appear
pub const TIRED_SLEEP_MAX: f64 = 6.0;
/// Mood average above which the avatar smiles
pub const SMILE_MOOD_MIN: f64 = 3.0;
/// Muscle definition above which the chest path appears
pub const CHEST_MIN: f64 = 40.0;
/// Muscle definition above which the arms widen
pub const ARM_BOOST_MIN: f64 = 50.0;
/// Muscle definition above which sweat drops appear
pub const SWEAT_MIN: f64 = 70.0;

/// Base arm rectangle width (SVG units)
const ARM_BASE_WIDTH: f64 = 15.0;
/// Base arm rectangle corner radius
const ARM_BASE_RADIUS: f64 = 7.5;
/// Fixed width increment applied when the arm boost is active
const ARM_WIDTH_BOOST: f64 = 3.0;
/// Fixed radius increment applied when the arm boost is active
const ARM_RADIUS_BOOST: f64 = 1.5;
/// Eye opacity when the mood average does not clear the smile threshold
const EYE_DIM_OPACITY: f64 = 0.7;

/// Derive the boolean feature flags from avatar parameters
pub fn derive_features(params: &AvatarParameters) -> AvatarFeatures {
    let tired = params.avg_sleep < TIRED_SLEEP_MAX;
    AvatarFeatures {
        energy_aura: params.energy_level > ENERGY_AURA_MIN,
        radiant_glow: params.hydration_level > GLOW_MIN,
        sparkles: params.hydration_level > SPARKLE_MIN,
        hydration_wave: params.hydration_level > WAVE_MIN,
        dark_circles: tired,
        tired_fill: tired,
        chest_muscle: params.muscle_definition > CHEST_MIN,
        arm_boost: params.muscle_definition > ARM_BOOST_MIN,
        sweat_drops: params.muscle_definition > SWEAT_MIN,
    }
}

/// Derive the continuous style attributes from avatar parameters.
///
/// Opacities are always value/100 of the driving parameter, independent of
/// the feature flags; the renderer decides what to draw.
pub fn derive_style(params: &AvatarParameters) -> AvatarStyle {
    let smiling = params.avg_mood > SMILE_MOOD_MIN;
    let arm_boost = params.muscle_definition > ARM_BOOST_MIN;

    AvatarStyle {
        energy_aura_opacity: params.energy_level / 100.0,
        hydration_wave_opacity: params.hydration_level / 100.0,
        chest_muscle_opacity: params.muscle_definition / 100.0,
        eye_opacity: if smiling { 1.0 } else { EYE_DIM_OPACITY },
        mouth: if smiling {
            MouthShape::Smile
        } else {
            MouthShape::Frown
        },
        body_width: params.body_width,
        arm_width: ARM_BASE_WIDTH + if arm_boost { ARM_WIDTH_BOOST } else { 0.0 },
        arm_radius: ARM_BASE_RADIUS + if arm_boost { ARM_RADIUS_BOOST } else { 0.0 },
    }
}

/// Encoder for producing complete frame payloads
pub struct AvatarEncoder {
    instance_id: String,
}

impl Default for AvatarEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl AvatarEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Encode parameters (and the summary behind them, when one exists)
    /// into a frame payload
    pub fn encode(
        &self,
        subject_id: &str,
        params: AvatarParameters,
        summary: Option<MetricSummary>,
        log_count: usize,
    ) -> AvatarFrame {
        let producer = FrameProducer {
            name: PRODUCER_NAME.to_string(),
            version: MORPH_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        let provenance = FrameProvenance {
            subject_id: subject_id.to_string(),
            log_count,
            latest_date: summary.as_ref().map(|s| s.latest_date.clone()),
            computed_at_utc: Utc::now().to_rfc3339(),
        };

        let features = derive_features(&params);
        let style = derive_style(&params);

        AvatarFrame {
            frame_version: FRAME_VERSION.to_string(),
            producer,
            provenance,
            summary,
            parameters: params,
            features,
            style,
        }
    }

    /// Encode to a JSON string
    pub fn encode_to_json(
        &self,
        subject_id: &str,
        params: AvatarParameters,
        summary: Option<MetricSummary>,
        log_count: usize,
    ) -> Result<String, ComputeError> {
        let frame = self.encode(subject_id, params, summary, log_count);
        serde_json::to_string_pretty(&frame).map_err(ComputeError::JsonError)
    }
}
