//! Friends roster
//!
//! Friend requests and the accepted-friend roster behind the social
//! achievements and shared leaderboards. A request is pending until the
//! recipient accepts or rejects it; accepting records the friendship in
//! both directions. The roster size is the progress value for the
//! friend-count achievements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Friend request operation failure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SocialError {
    #[error("Friend request already sent")]
    RequestAlreadySent,

    #[error("Already friends")]
    AlreadyFriends,

    #[error("No pending request from this subject")]
    RequestNotFound,
}

/// Outcome of responding to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestResponse {
    Accepted,
    Rejected,
}

/// A pending friend request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendRequest {
    pub from_subject_id: String,
    pub to_subject_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Friend requests plus the accepted roster, symmetric by construction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FriendBook {
    pending: Vec<FriendRequest>,
    friends: HashMap<String, BTreeSet<String>>,
}

impl FriendBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send a friend request. Duplicate pending requests and requests to
    /// existing friends are rejected.
    pub fn send_request(
        &mut self,
        from: &str,
        to: &str,
        message: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), SocialError> {
        if self.are_friends(from, to) {
            return Err(SocialError::AlreadyFriends);
        }
        if self
            .pending
            .iter()
            .any(|r| r.from_subject_id == from && r.to_subject_id == to)
        {
            return Err(SocialError::RequestAlreadySent);
        }

        self.pending.push(FriendRequest {
            from_subject_id: from.to_string(),
            to_subject_id: to.to_string(),
            message: message.map(str::to_string),
            created_at: now,
        });
        Ok(())
    }

    /// Requests waiting on this subject's response
    pub fn pending_requests(&self, subject_id: &str) -> Vec<&FriendRequest> {
        self.pending
            .iter()
            .filter(|r| r.to_subject_id == subject_id)
            .collect()
    }

    /// Accept or reject the pending request from `from` to `to`.
    /// Accepting records the friendship in both directions.
    pub fn respond(
        &mut self,
        from: &str,
        to: &str,
        response: RequestResponse,
    ) -> Result<(), SocialError> {
        let position = self
            .pending
            .iter()
            .position(|r| r.from_subject_id == from && r.to_subject_id == to)
            .ok_or(SocialError::RequestNotFound)?;
        self.pending.remove(position);

        if response == RequestResponse::Accepted {
            self.friends
                .entry(from.to_string())
                .or_default()
                .insert(to.to_string());
            self.friends
                .entry(to.to_string())
                .or_default()
                .insert(from.to_string());
        }
        Ok(())
    }

    /// Remove a friendship in both directions, returning whether one
    /// existed
    pub fn remove_friend(&mut self, subject_id: &str, friend_id: &str) -> bool {
        let removed = self
            .friends
            .get_mut(subject_id)
            .is_some_and(|set| set.remove(friend_id));
        if removed {
            if let Some(set) = self.friends.get_mut(friend_id) {
                set.remove(subject_id);
            }
        }
        removed
    }

    pub fn are_friends(&self, a: &str, b: &str) -> bool {
        self.friends.get(a).is_some_and(|set| set.contains(b))
    }

    /// Accepted friends, sorted
    pub fn friends(&self, subject_id: &str) -> Vec<String> {
        self.friends
            .get(subject_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Roster size; this is the progress value for the friend-count
    /// achievements
    pub fn friend_count(&self, subject_id: &str) -> u32 {
        self.friends.get(subject_id).map_or(0, |set| set.len() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::{AchievementKind, AchievementLog};

    #[test]
    fn test_request_accept_creates_symmetric_friendship() {
        let mut book = FriendBook::new();
        book.send_request("alice", "bob", Some("hi"), Utc::now())
            .unwrap();

        assert_eq!(book.pending_requests("bob").len(), 1);
        book.respond("alice", "bob", RequestResponse::Accepted)
            .unwrap();

        assert!(book.are_friends("alice", "bob"));
        assert!(book.are_friends("bob", "alice"));
        assert!(book.pending_requests("bob").is_empty());
    }

    #[test]
    fn test_reject_leaves_no_friendship() {
        let mut book = FriendBook::new();
        book.send_request("alice", "bob", None, Utc::now()).unwrap();
        book.respond("alice", "bob", RequestResponse::Rejected)
            .unwrap();

        assert!(!book.are_friends("alice", "bob"));
        assert_eq!(book.friend_count("alice"), 0);
    }

    #[test]
    fn test_duplicate_request_rejected() {
        let mut book = FriendBook::new();
        book.send_request("alice", "bob", None, Utc::now()).unwrap();

        assert_eq!(
            book.send_request("alice", "bob", None, Utc::now()),
            Err(SocialError::RequestAlreadySent)
        );
    }

    #[test]
    fn test_request_to_existing_friend_rejected() {
        let mut book = FriendBook::new();
        book.send_request("alice", "bob", None, Utc::now()).unwrap();
        book.respond("alice", "bob", RequestResponse::Accepted)
            .unwrap();

        assert_eq!(
            book.send_request("bob", "alice", None, Utc::now()),
            Err(SocialError::AlreadyFriends)
        );
    }

    #[test]
    fn test_respond_without_request() {
        let mut book = FriendBook::new();
        assert_eq!(
            book.respond("alice", "bob", RequestResponse::Accepted),
            Err(SocialError::RequestNotFound)
        );
    }

    #[test]
    fn test_remove_friend_both_directions() {
        let mut book = FriendBook::new();
        book.send_request("alice", "bob", None, Utc::now()).unwrap();
        book.respond("alice", "bob", RequestResponse::Accepted)
            .unwrap();

        assert!(book.remove_friend("alice", "bob"));
        assert!(!book.are_friends("bob", "alice"));
        assert!(!book.remove_friend("alice", "bob"));
    }

    #[test]
    fn test_friend_count_drives_social_achievements() {
        let mut book = FriendBook::new();
        let mut achievements = AchievementLog::new();

        book.send_request("alice", "bob", None, Utc::now()).unwrap();
        book.respond("alice", "bob", RequestResponse::Accepted)
            .unwrap();

        let unlocked = achievements.check_and_award(
            "alice",
            AchievementKind::Friends,
            book.friend_count("alice"),
            Utc::now(),
        );
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].id, "friend_first");

        for name in ["carol", "dan", "erin", "frank"] {
            book.send_request("alice", name, None, Utc::now()).unwrap();
            book.respond("alice", name, RequestResponse::Accepted)
                .unwrap();
        }

        let unlocked = achievements.check_and_award(
            "alice",
            AchievementKind::Friends,
            book.friend_count("alice"),
            Utc::now(),
        );
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].id, "friend_5");
    }
}
