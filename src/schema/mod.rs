//! Unified wellness.daily_log.v1 schema
//!
//! This module defines the input schema for daily wellness logs: the wire
//! record, its validation rules, and the adapter that turns raw NDJSON or
//! JSON-array input into the newest-first log slices the pipeline expects.

mod adapter;
mod daily_log;

pub use adapter::*;
pub use daily_log::*;
