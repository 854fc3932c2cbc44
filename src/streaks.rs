//! Streak tracking
//!
//! Consecutive-day streaks per (subject, kind). Logging twice on the same
//! day is a no-op, a log on the day after the last one extends the streak,
//! and any other gap resets it to 1. Crossing 7, 30 or 100 days reports a
//! milestone.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Streak day counts that count as milestones
pub const MILESTONES: [u32; 3] = [7, 30, 100];

/// What a streak counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakKind {
    DailyLog,
    Workout,
    Hydration,
}

/// One subject's streak state for one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub longest: u32,
    pub last_log_date: NaiveDate,
}

/// Outcome of recording one day's activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub streak: Streak,
    /// Set when this update moved the current streak onto a milestone
    pub milestone: Option<u32>,
}

/// All streaks, keyed by (subject, kind)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreakBook {
    streaks: HashMap<String, HashMap<StreakKind, Streak>>,
}

impl StreakBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current streak state, if the subject has ever logged this kind
    pub fn get(&self, subject_id: &str, kind: StreakKind) -> Option<Streak> {
        self.streaks.get(subject_id)?.get(&kind).copied()
    }

    /// Current streak length, 0 when never logged
    pub fn current(&self, subject_id: &str, kind: StreakKind) -> u32 {
        self.get(subject_id, kind).map_or(0, |s| s.current)
    }

    /// Longest streak ever reached, 0 when never logged
    pub fn longest(&self, subject_id: &str, kind: StreakKind) -> u32 {
        self.get(subject_id, kind).map_or(0, |s| s.longest)
    }

    /// Record activity for `date` and return the updated state
    pub fn record(&mut self, subject_id: &str, kind: StreakKind, date: NaiveDate) -> StreakUpdate {
        let by_kind = self.streaks.entry(subject_id.to_string()).or_default();

        let updated = match by_kind.get(&kind) {
            Some(existing) if existing.last_log_date == date => *existing,
            Some(existing) => {
                let current = if date == existing.last_log_date.succ_opt().unwrap_or(date) {
                    existing.current + 1
                } else {
                    1
                };
                Streak {
                    current,
                    longest: existing.longest.max(current),
                    last_log_date: date,
                }
            }
            None => Streak {
                current: 1,
                longest: 1,
                last_log_date: date,
            },
        };

        let previous = by_kind.insert(kind, updated);
        let crossed = previous.map_or(true, |p| p.current != updated.current);
        let milestone = if crossed && MILESTONES.contains(&updated.current) {
            Some(updated.current)
        } else {
            None
        };

        StreakUpdate {
            streak: updated,
            milestone,
        }
    }
}
