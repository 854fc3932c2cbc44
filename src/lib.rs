//! Vitamorph - On-device compute engine for adaptive wellness avatars
//!
//! Vitamorph transforms a subject's daily wellness logs into a deterministic
//! avatar render frame through a small pipeline: metric aggregation →
//! parameter mapping → visual encoding.
//!
//! ## Modules
//!
//! - **Core Pipeline**: Reduce recent daily logs into bounded avatar
//!   parameters and encode them as an `avatar.frame.v1` payload for any
//!   SVG renderer
//! - **Trackers**: Streaks, goals, challenges, achievements, leaderboards
//!   and the friends roster, computed as plain query+reduce passes over
//!   the log store

pub mod achievements;
pub mod aggregator;
pub mod challenges;
pub mod encoder;
pub mod error;
pub mod feed;
pub mod goals;
pub mod leaderboard;
pub mod mapper;
pub mod pipeline;
pub mod schema;
pub mod social;
pub mod stats;
pub mod store;
pub mod streaks;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use error::ComputeError;
pub use pipeline::{logs_to_frame, logs_to_frame_json, AvatarProcessor};

// Schema exports
pub use schema::{LogAdapter, LogRecord, SCHEMA_VERSION};

// Core type exports
pub use types::{AvatarFrame, AvatarParameters, DailyLog};

/// Vitamorph version embedded in all frame payloads
pub const MORPH_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for frame payloads
pub const PRODUCER_NAME: &str = "vitamorph";
