//! Leaderboards
//!
//! Ranked top-10 boards computed over the log store, streak book and
//! achievement log. Scores sort descending with subject ID as the
//! tiebreaker so rankings are stable.

use crate::achievements::AchievementLog;
use crate::store::LogStore;
use crate::streaks::{StreakBook, StreakKind};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of entries a board holds
pub const TOP_N: usize = 10;

/// Days in the consistency window
const CONSISTENCY_WINDOW_DAYS: i64 = 30;

/// Period a board covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Week,
    Month,
    AllTime,
}

impl Timeframe {
    /// First date included in the timeframe ending today
    pub fn start_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Timeframe::Week => Some(today - Duration::days(6)),
            Timeframe::Month => Some(today - Duration::days(29)),
            Timeframe::AllTime => None,
        }
    }
}

/// One row of a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: usize,
    pub subject_id: String,
    pub score: f64,
}

/// Which board to rank on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardKind {
    ExerciseMinutes,
    WorkoutCount,
    LongestStreak,
    Consistency,
    AchievementPoints,
}

fn sorted(mut scores: Vec<(String, f64)>) -> Vec<(String, f64)> {
    scores.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    scores
}

fn ranked(scores: Vec<(String, f64)>) -> Vec<LeaderboardEntry> {
    sorted(scores)
        .into_iter()
        .take(TOP_N)
        .enumerate()
        .map(|(i, (subject_id, score))| LeaderboardEntry {
            rank: i + 1,
            subject_id,
            score,
        })
        .collect()
}

fn timeframe_logs(
    store: &LogStore,
    subject_id: &str,
    timeframe: Timeframe,
    today: NaiveDate,
) -> Vec<crate::types::DailyLog> {
    match timeframe.start_date(today) {
        Some(start) => store.logs_since(subject_id, &start.format("%Y-%m-%d").to_string()),
        None => store.logs_desc(subject_id),
    }
}

fn exercise_scores(store: &LogStore, timeframe: Timeframe, today: NaiveDate) -> Vec<(String, f64)> {
    store
        .subjects()
        .into_iter()
        .map(|id| {
            let total: f64 = timeframe_logs(store, &id, timeframe, today)
                .iter()
                .map(|l| l.exercise_minutes as f64)
                .sum();
            (id, total)
        })
        .collect()
}

fn workout_scores(store: &LogStore, timeframe: Timeframe, today: NaiveDate) -> Vec<(String, f64)> {
    store
        .subjects()
        .into_iter()
        .map(|id| {
            let count = timeframe_logs(store, &id, timeframe, today)
                .iter()
                .filter(|l| l.exercise_minutes > 0)
                .count();
            (id, count as f64)
        })
        .collect()
}

fn streak_scores(store: &LogStore, streaks: &StreakBook) -> Vec<(String, f64)> {
    store
        .subjects()
        .into_iter()
        .map(|id| {
            let longest = streaks.longest(&id, StreakKind::DailyLog);
            (id, longest as f64)
        })
        .collect()
}

fn consistency_scores(store: &LogStore, today: NaiveDate) -> Vec<(String, f64)> {
    let start = today - Duration::days(CONSISTENCY_WINDOW_DAYS - 1);
    let start_str = start.format("%Y-%m-%d").to_string();

    store
        .subjects()
        .into_iter()
        .map(|id| {
            // Dates are unique per subject, so the count is distinct days
            let days = store.logs_since(&id, &start_str).len();
            let pct = days as f64 / CONSISTENCY_WINDOW_DAYS as f64 * 100.0;
            (id, pct)
        })
        .collect()
}

fn points_scores(store: &LogStore, achievements: &AchievementLog) -> Vec<(String, f64)> {
    store
        .subjects()
        .into_iter()
        .map(|id| {
            let points = achievements.points(&id);
            (id, points as f64)
        })
        .collect()
}

/// Total exercise minutes per subject within the timeframe
pub fn exercise_minutes(
    store: &LogStore,
    timeframe: Timeframe,
    today: NaiveDate,
) -> Vec<LeaderboardEntry> {
    ranked(exercise_scores(store, timeframe, today))
}

/// Days with a nonzero workout per subject within the timeframe
pub fn workout_count(
    store: &LogStore,
    timeframe: Timeframe,
    today: NaiveDate,
) -> Vec<LeaderboardEntry> {
    ranked(workout_scores(store, timeframe, today))
}

/// Longest daily-log streak per subject
pub fn longest_streaks(store: &LogStore, streaks: &StreakBook) -> Vec<LeaderboardEntry> {
    ranked(streak_scores(store, streaks))
}

/// Share of the last 30 days with a log, as a percentage
pub fn consistency(store: &LogStore, today: NaiveDate) -> Vec<LeaderboardEntry> {
    ranked(consistency_scores(store, today))
}

/// Total achievement points per subject
pub fn achievement_points(store: &LogStore, achievements: &AchievementLog) -> Vec<LeaderboardEntry> {
    ranked(points_scores(store, achievements))
}

/// A subject's own position on a board, whether or not it makes the
/// top 10. None when the subject has no logs.
pub fn rank_of(
    board: BoardKind,
    store: &LogStore,
    streaks: &StreakBook,
    achievements: &AchievementLog,
    timeframe: Timeframe,
    today: NaiveDate,
    subject_id: &str,
) -> Option<LeaderboardEntry> {
    let scores = match board {
        BoardKind::ExerciseMinutes => exercise_scores(store, timeframe, today),
        BoardKind::WorkoutCount => workout_scores(store, timeframe, today),
        BoardKind::LongestStreak => streak_scores(store, streaks),
        BoardKind::Consistency => consistency_scores(store, today),
        BoardKind::AchievementPoints => points_scores(store, achievements),
    };

    sorted(scores)
        .into_iter()
        .enumerate()
        .find(|(_, (id, _))| id == subject_id)
        .map(|(i, (subject_id, score))| LeaderboardEntry {
            rank: i + 1,
            subject_id,
            score,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::AchievementKind;
    use crate::types::DailyLog;
    use chrono::Utc;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn log(date: &str, exercise: u32) -> DailyLog {
        DailyLog::new(date, 2000.0, 7.5, 4, exercise, 175.0, 70.0)
    }

    fn seeded_store() -> LogStore {
        let mut store = LogStore::new();
        store.upsert("alice", log("2024-01-14", 60));
        store.upsert("alice", log("2024-01-15", 60));
        store.upsert("bob", log("2024-01-15", 90));
        store.upsert("carol", log("2024-01-01", 300));
        store
    }

    #[test]
    fn test_exercise_minutes_all_time() {
        let store = seeded_store();
        let board = exercise_minutes(&store, Timeframe::AllTime, d("2024-01-15"));

        assert_eq!(board[0].subject_id, "carol");
        assert!((board[0].score - 300.0).abs() < f64::EPSILON);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].subject_id, "alice");
        assert!((board[1].score - 120.0).abs() < f64::EPSILON);
        assert_eq!(board[2].subject_id, "bob");
    }

    #[test]
    fn test_exercise_minutes_week_excludes_old_logs() {
        let store = seeded_store();
        let board = exercise_minutes(&store, Timeframe::Week, d("2024-01-15"));

        // carol's only log is 2024-01-01, outside the 7-day window
        assert_eq!(board[0].subject_id, "alice");
        let carol = board.iter().find(|e| e.subject_id == "carol").unwrap();
        assert!((carol.score - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_workout_count_ignores_rest_days() {
        let mut store = seeded_store();
        store.upsert("bob", log("2024-01-14", 0));
        let board = workout_count(&store, Timeframe::AllTime, d("2024-01-15"));

        let bob = board.iter().find(|e| e.subject_id == "bob").unwrap();
        assert!((bob.score - 1.0).abs() < f64::EPSILON);
        let alice = board.iter().find(|e| e.subject_id == "alice").unwrap();
        assert!((alice.score - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ties_break_by_subject_id() {
        let mut store = LogStore::new();
        store.upsert("zed", log("2024-01-15", 50));
        store.upsert("amy", log("2024-01-15", 50));
        let board = exercise_minutes(&store, Timeframe::AllTime, d("2024-01-15"));

        assert_eq!(board[0].subject_id, "amy");
        assert_eq!(board[1].subject_id, "zed");
    }

    #[test]
    fn test_board_caps_at_top_n() {
        let mut store = LogStore::new();
        for i in 0..15 {
            store.upsert(&format!("s{i:02}"), log("2024-01-15", i * 10));
        }
        let board = exercise_minutes(&store, Timeframe::AllTime, d("2024-01-15"));
        assert_eq!(board.len(), TOP_N);
    }

    #[test]
    fn test_longest_streaks_board() {
        let store = seeded_store();
        let mut streaks = StreakBook::new();
        streaks.record("alice", StreakKind::DailyLog, d("2024-01-14"));
        streaks.record("alice", StreakKind::DailyLog, d("2024-01-15"));
        streaks.record("bob", StreakKind::DailyLog, d("2024-01-15"));

        let board = longest_streaks(&store, &streaks);
        assert_eq!(board[0].subject_id, "alice");
        assert!((board[0].score - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_consistency_counts_distinct_days() {
        let store = seeded_store();
        let board = consistency(&store, d("2024-01-15"));

        let alice = board.iter().find(|e| e.subject_id == "alice").unwrap();
        assert!((alice.score - (2.0 / 30.0 * 100.0)).abs() < 1e-9);
        // carol's 2024-01-01 lies within 30 days of 2024-01-15
        let carol = board.iter().find(|e| e.subject_id == "carol").unwrap();
        assert!((carol.score - (1.0 / 30.0 * 100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_rank_of_reaches_past_top_n() {
        let mut store = LogStore::new();
        for i in 0..15 {
            store.upsert(&format!("s{i:02}"), log("2024-01-15", (i + 1) * 10));
        }
        let streaks = StreakBook::new();
        let achievements = AchievementLog::new();

        // s02 scores 30 minutes, beaten by 12 subjects: rank 13, off the board
        let board = exercise_minutes(&store, Timeframe::AllTime, d("2024-01-15"));
        assert!(board.iter().all(|e| e.subject_id != "s02"));

        let entry = rank_of(
            BoardKind::ExerciseMinutes,
            &store,
            &streaks,
            &achievements,
            Timeframe::AllTime,
            d("2024-01-15"),
            "s02",
        )
        .unwrap();
        assert_eq!(entry.rank, 13);
        assert!((entry.score - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rank_of_unknown_subject() {
        let store = seeded_store();
        let streaks = StreakBook::new();
        let achievements = AchievementLog::new();

        assert!(rank_of(
            BoardKind::LongestStreak,
            &store,
            &streaks,
            &achievements,
            Timeframe::AllTime,
            d("2024-01-15"),
            "nobody",
        )
        .is_none());
    }

    #[test]
    fn test_achievement_points_board() {
        let store = seeded_store();
        let mut achievements = AchievementLog::new();
        achievements.check_and_award("bob", AchievementKind::Streak, 7, Utc::now());

        let board = achievement_points(&store, &achievements);
        assert_eq!(board[0].subject_id, "bob");
        assert!((board[0].score - 50.0).abs() < f64::EPSILON);
    }
}
