//! Group challenges
//!
//! Time-boxed competitions a subject creates and others join. The creator
//! is automatically the first participant. Progress is reported per
//! participant; reaching the target marks that participant completed, and
//! a per-challenge leaderboard ranks participants by progress.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Challenge operation failure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChallengeError {
    #[error("Challenge not found or inactive")]
    NotFound,

    #[error("Already participating in this challenge")]
    AlreadyJoined,

    #[error("Not participating in this challenge")]
    NotParticipating,
}

/// What a challenge measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    Streak,
    Workout,
    Goal,
    Weight,
}

/// Opaque challenge identifier
pub type ChallengeId = u64;

/// A time-boxed group challenge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub creator_id: String,
    pub title: String,
    pub description: String,
    pub kind: ChallengeKind,
    pub target: f64,
    pub duration_days: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewards: Option<String>,
}

/// One subject's standing in one challenge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub subject_id: String,
    pub joined_at: DateTime<Utc>,
    pub progress: f64,
    pub completed: bool,
}

/// A challenge joined with one subject's own standing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChallengeView {
    pub challenge: Challenge,
    pub participating: bool,
    pub progress: f64,
    pub completed: bool,
}

/// All challenges and their participants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChallengeBook {
    next_id: ChallengeId,
    challenges: HashMap<ChallengeId, Challenge>,
    participants: HashMap<ChallengeId, Vec<Participant>>,
}

impl ChallengeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a challenge running `duration_days` from `start_date`.
    /// The creator joins automatically with zero progress.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &mut self,
        creator_id: &str,
        title: &str,
        description: &str,
        kind: ChallengeKind,
        target: f64,
        duration_days: u32,
        start_date: NaiveDate,
        rewards: Option<&str>,
        now: DateTime<Utc>,
    ) -> ChallengeId {
        let id = self.next_id;
        self.next_id += 1;

        self.challenges.insert(
            id,
            Challenge {
                id,
                creator_id: creator_id.to_string(),
                title: title.to_string(),
                description: description.to_string(),
                kind,
                target,
                duration_days,
                start_date,
                end_date: start_date + Duration::days(i64::from(duration_days)),
                active: true,
                rewards: rewards.map(str::to_string),
            },
        );
        self.participants.insert(
            id,
            vec![Participant {
                subject_id: creator_id.to_string(),
                joined_at: now,
                progress: 0.0,
                completed: false,
            }],
        );

        id
    }

    /// Join an active challenge with zero progress
    pub fn join(
        &mut self,
        id: ChallengeId,
        subject_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ChallengeError> {
        let challenge = self
            .challenges
            .get(&id)
            .filter(|c| c.active)
            .ok_or(ChallengeError::NotFound)?;

        let participants = self.participants.entry(challenge.id).or_default();
        if participants.iter().any(|p| p.subject_id == subject_id) {
            return Err(ChallengeError::AlreadyJoined);
        }

        participants.push(Participant {
            subject_id: subject_id.to_string(),
            joined_at: now,
            progress: 0.0,
            completed: false,
        });
        Ok(())
    }

    /// Report a participant's progress. Returns whether the participant
    /// has now completed the challenge (progress >= target).
    pub fn update_progress(
        &mut self,
        id: ChallengeId,
        subject_id: &str,
        progress: f64,
    ) -> Result<bool, ChallengeError> {
        let target = self
            .challenges
            .get(&id)
            .ok_or(ChallengeError::NotFound)?
            .target;

        let participant = self
            .participants
            .get_mut(&id)
            .and_then(|ps| ps.iter_mut().find(|p| p.subject_id == subject_id))
            .ok_or(ChallengeError::NotParticipating)?;

        participant.progress = progress;
        participant.completed = progress >= target;
        Ok(participant.completed)
    }

    /// Retire a challenge so it no longer accepts joins
    pub fn deactivate(&mut self, id: ChallengeId) -> bool {
        match self.challenges.get_mut(&id) {
            Some(challenge) => {
                challenge.active = false;
                true
            }
            None => false,
        }
    }

    fn standing(&self, id: ChallengeId, subject_id: &str) -> Option<&Participant> {
        self.participants
            .get(&id)?
            .iter()
            .find(|p| p.subject_id == subject_id)
    }

    /// All active challenges, annotated with the subject's own standing.
    /// Sorted by ID so output is stable.
    pub fn active_challenges(&self, subject_id: &str) -> Vec<ChallengeView> {
        let mut views: Vec<ChallengeView> = self
            .challenges
            .values()
            .filter(|c| c.active)
            .map(|c| {
                let standing = self.standing(c.id, subject_id);
                ChallengeView {
                    challenge: c.clone(),
                    participating: standing.is_some(),
                    progress: standing.map_or(0.0, |p| p.progress),
                    completed: standing.is_some_and(|p| p.completed),
                }
            })
            .collect();
        views.sort_by_key(|v| v.challenge.id);
        views
    }

    /// Challenges the subject has completed
    pub fn completed_challenges(&self, subject_id: &str) -> Vec<ChallengeView> {
        let mut views: Vec<ChallengeView> = self
            .challenges
            .values()
            .filter_map(|c| {
                let standing = self.standing(c.id, subject_id)?;
                standing.completed.then(|| ChallengeView {
                    challenge: c.clone(),
                    participating: true,
                    progress: standing.progress,
                    completed: true,
                })
            })
            .collect();
        views.sort_by_key(|v| v.challenge.id);
        views
    }

    /// Participants of one challenge ranked by progress descending,
    /// subject ID as the tiebreaker
    pub fn challenge_leaderboard(&self, id: ChallengeId) -> Vec<Participant> {
        let mut ranked: Vec<Participant> = self
            .participants
            .get(&id)
            .map(|ps| ps.to_vec())
            .unwrap_or_default();
        ranked.sort_by(|a, b| {
            b.progress
                .partial_cmp(&a.progress)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.subject_id.cmp(&b.subject_id))
        });
        ranked
    }

    /// How many challenges the subject has completed, feeding the
    /// goal-completion style progress counters
    pub fn completed_count(&self, subject_id: &str) -> u32 {
        self.completed_challenges(subject_id).len() as u32
    }
}
