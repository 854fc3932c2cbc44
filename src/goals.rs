//! Goal tracking
//!
//! One active goal per (subject, kind). Setting a goal that already exists
//! replaces it, and a freshly set goal starts with its progress at the
//! target, matching the log-driven flows where the triggering value is the
//! current reading.

use serde::{Deserialize, Serialize};

/// What a goal measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    Weight,
    DailyWater,
    DailySleep,
    WeeklyExercise,
}

/// One subject's goal for one kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub kind: GoalKind,
    pub target: f64,
    pub current: f64,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub active: bool,
}

impl Goal {
    /// Progress toward the target as a percentage, 0 when the target is
    /// not positive
    pub fn completion_pct(&self) -> f64 {
        if self.target <= 0.0 {
            0.0
        } else {
            self.current / self.target * 100.0
        }
    }
}

/// All goals, keyed by subject
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalBook {
    goals: std::collections::HashMap<String, Vec<Goal>>,
}

impl GoalBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a goal, deactivating any active goal of the same kind first.
    /// The new goal starts with `current` equal to `target`.
    pub fn set_goal(
        &mut self,
        subject_id: &str,
        kind: GoalKind,
        target: f64,
        start_date: &str,
        end_date: Option<&str>,
    ) -> Goal {
        let goals = self.goals.entry(subject_id.to_string()).or_default();
        for goal in goals.iter_mut() {
            if goal.kind == kind && goal.active {
                goal.active = false;
            }
        }
        let goal = Goal {
            kind,
            target,
            current: target,
            start_date: start_date.to_string(),
            end_date: end_date.map(str::to_string),
            active: true,
        };
        goals.push(goal.clone());
        goal
    }

    /// Update progress on the active goal of this kind, returning the
    /// updated goal when one exists
    pub fn update_progress(
        &mut self,
        subject_id: &str,
        kind: GoalKind,
        current: f64,
    ) -> Option<&Goal> {
        let goal = self
            .goals
            .get_mut(subject_id)?
            .iter_mut()
            .find(|g| g.kind == kind && g.active)?;
        goal.current = current;
        Some(goal)
    }

    /// Deactivate the active goal of this kind, returning whether one was
    /// deactivated
    pub fn deactivate(&mut self, subject_id: &str, kind: GoalKind) -> bool {
        if let Some(goals) = self.goals.get_mut(subject_id) {
            for goal in goals.iter_mut() {
                if goal.kind == kind && goal.active {
                    goal.active = false;
                    return true;
                }
            }
        }
        false
    }

    /// All currently active goals for a subject
    pub fn active_goals(&self, subject_id: &str) -> Vec<&Goal> {
        match self.goals.get(subject_id) {
            Some(goals) => goals.iter().filter(|g| g.active).collect(),
            None => Vec::new(),
        }
    }

    /// The active goal of one kind, if set
    pub fn active_goal(&self, subject_id: &str, kind: GoalKind) -> Option<&Goal> {
        self.goals
            .get(subject_id)?
            .iter()
            .find(|g| g.kind == kind && g.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_goal_starts_at_target() {
        let mut book = GoalBook::new();
        let goal = book.set_goal("s1", GoalKind::Weight, 70.0, "2024-01-15", None);

        assert!((goal.current - 70.0).abs() < f64::EPSILON);
        assert!(goal.active);
        assert!((goal.completion_pct() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_setting_same_kind_replaces_active() {
        let mut book = GoalBook::new();
        book.set_goal("s1", GoalKind::Weight, 70.0, "2024-01-01", None);
        book.set_goal("s1", GoalKind::Weight, 68.0, "2024-01-15", None);

        let active = book.active_goals("s1");
        assert_eq!(active.len(), 1);
        assert!((active[0].target - 68.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_different_kinds_coexist() {
        let mut book = GoalBook::new();
        book.set_goal("s1", GoalKind::Weight, 70.0, "2024-01-01", None);
        book.set_goal("s1", GoalKind::DailyWater, 2500.0, "2024-01-01", None);

        assert_eq!(book.active_goals("s1").len(), 2);
    }

    #[test]
    fn test_update_progress() {
        let mut book = GoalBook::new();
        book.set_goal("s1", GoalKind::DailyWater, 2000.0, "2024-01-01", None);

        let goal = book
            .update_progress("s1", GoalKind::DailyWater, 1500.0)
            .unwrap();
        assert!((goal.current - 1500.0).abs() < f64::EPSILON);
        assert!((goal.completion_pct() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_progress_without_goal() {
        let mut book = GoalBook::new();
        assert!(book.update_progress("s1", GoalKind::Weight, 70.0).is_none());
    }

    #[test]
    fn test_deactivate() {
        let mut book = GoalBook::new();
        book.set_goal("s1", GoalKind::Weight, 70.0, "2024-01-01", None);

        assert!(book.deactivate("s1", GoalKind::Weight));
        assert!(book.active_goals("s1").is_empty());
        assert!(!book.deactivate("s1", GoalKind::Weight));
    }

    #[test]
    fn test_completion_pct_with_zero_target() {
        let goal = Goal {
            kind: GoalKind::Weight,
            target: 0.0,
            current: 5.0,
            start_date: "2024-01-01".to_string(),
            end_date: None,
            active: true,
        };
        assert!((goal.completion_pct() - 0.0).abs() < f64::EPSILON);
    }
}
