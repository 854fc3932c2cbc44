//! Achievements
//!
//! A fixed catalog of awards tied to streaks, goals, workouts, friends and
//! logging consistency. Each achievement is awarded at most once per
//! subject; points come from the catalog entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Activity an achievement watches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    Streak,
    GoalsCompleted,
    Workouts,
    Friends,
    DaysLogged,
}

/// One catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AchievementDef {
    pub id: &'static str,
    pub kind: AchievementKind,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// Progress value at which the achievement unlocks
    pub target: u32,
    pub points: u32,
}

/// The full achievement catalog
pub const CATALOG: [AchievementDef; 12] = [
    AchievementDef {
        id: "streak_7",
        kind: AchievementKind::Streak,
        title: "Week Warrior",
        description: "Log your wellness data 7 days in a row",
        icon: "🔥",
        target: 7,
        points: 50,
    },
    AchievementDef {
        id: "streak_30",
        kind: AchievementKind::Streak,
        title: "Monthly Master",
        description: "Log your wellness data 30 days in a row",
        icon: "⭐",
        target: 30,
        points: 100,
    },
    AchievementDef {
        id: "streak_100",
        kind: AchievementKind::Streak,
        title: "Century Club",
        description: "Log your wellness data 100 days in a row",
        icon: "👑",
        target: 100,
        points: 500,
    },
    AchievementDef {
        id: "goal_complete",
        kind: AchievementKind::GoalsCompleted,
        title: "Goal Getter",
        description: "Complete your first goal",
        icon: "🎯",
        target: 1,
        points: 25,
    },
    AchievementDef {
        id: "goal_master",
        kind: AchievementKind::GoalsCompleted,
        title: "Goal Master",
        description: "Complete 5 goals",
        icon: "🏆",
        target: 5,
        points: 150,
    },
    AchievementDef {
        id: "workout_first",
        kind: AchievementKind::Workouts,
        title: "First Steps",
        description: "Log your first workout",
        icon: "💪",
        target: 1,
        points: 25,
    },
    AchievementDef {
        id: "workout_10",
        kind: AchievementKind::Workouts,
        title: "Dedicated",
        description: "Log 10 workouts",
        icon: "🏋️",
        target: 10,
        points: 75,
    },
    AchievementDef {
        id: "workout_50",
        kind: AchievementKind::Workouts,
        title: "Fitness Fanatic",
        description: "Log 50 workouts",
        icon: "🚀",
        target: 50,
        points: 300,
    },
    AchievementDef {
        id: "friend_first",
        kind: AchievementKind::Friends,
        title: "Social Butterfly",
        description: "Add your first friend",
        icon: "👥",
        target: 1,
        points: 25,
    },
    AchievementDef {
        id: "friend_5",
        kind: AchievementKind::Friends,
        title: "Team Player",
        description: "Add 5 friends",
        icon: "🤝",
        target: 5,
        points: 100,
    },
    AchievementDef {
        id: "log_week",
        kind: AchievementKind::DaysLogged,
        title: "Consistent",
        description: "Log your wellness data on 7 different days",
        icon: "📅",
        target: 7,
        points: 50,
    },
    AchievementDef {
        id: "log_month",
        kind: AchievementKind::DaysLogged,
        title: "Dedicated Logger",
        description: "Log your wellness data on 30 different days",
        icon: "📊",
        target: 30,
        points: 150,
    },
];

/// An awarded achievement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Awarded {
    pub achievement_id: String,
    pub awarded_at: DateTime<Utc>,
}

/// Per-subject record of awarded achievements
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AchievementLog {
    awarded: HashMap<String, Vec<Awarded>>,
}

impl AchievementLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Award every not-yet-held achievement of `kind` whose target the
    /// given progress reaches, returning the newly unlocked definitions.
    pub fn check_and_award(
        &mut self,
        subject_id: &str,
        kind: AchievementKind,
        progress: u32,
        now: DateTime<Utc>,
    ) -> Vec<AchievementDef> {
        let held: HashSet<String> = self
            .awarded
            .get(subject_id)
            .map(|list| list.iter().map(|a| a.achievement_id.clone()).collect())
            .unwrap_or_default();

        let mut unlocked = Vec::new();
        for def in CATALOG.iter() {
            if def.kind == kind && progress >= def.target && !held.contains(def.id) {
                self.awarded
                    .entry(subject_id.to_string())
                    .or_default()
                    .push(Awarded {
                        achievement_id: def.id.to_string(),
                        awarded_at: now,
                    });
                unlocked.push(*def);
            }
        }
        unlocked
    }

    /// Everything the subject has been awarded
    pub fn achievements(&self, subject_id: &str) -> &[Awarded] {
        self.awarded
            .get(subject_id)
            .map_or(&[], |list| list.as_slice())
    }

    /// Total catalog points the subject has earned
    pub fn points(&self, subject_id: &str) -> u32 {
        self.achievements(subject_id)
            .iter()
            .filter_map(|a| {
                CATALOG
                    .iter()
                    .find(|def| def.id == a.achievement_id)
                    .map(|def| def.points)
            })
            .sum()
    }
}
