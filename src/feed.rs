//! Change feed
//!
//! Couples the log store to the pipeline: every submitted log is upserted,
//! the subject's frame is recomputed from storage, and subscribers watching
//! that subject receive the fresh frame over a channel. Subscribers whose
//! receiver was dropped are pruned on the next delivery attempt.

use crate::error::ComputeError;
use crate::pipeline::AvatarProcessor;
use crate::store::LogStore;
use crate::types::{AvatarFrame, DailyLog};
use std::sync::mpsc::{channel, Receiver, Sender};

struct Subscriber {
    subject_id: String,
    sender: Sender<AvatarFrame>,
}

/// Store-backed feed that recomputes and broadcasts frames on every log
pub struct LogFeed {
    store: LogStore,
    processor: AvatarProcessor,
    subscribers: Vec<Subscriber>,
}

impl Default for LogFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl LogFeed {
    pub fn new() -> Self {
        Self::with_processor(AvatarProcessor::new())
    }

    /// Feed with a custom processor configuration
    pub fn with_processor(processor: AvatarProcessor) -> Self {
        Self {
            store: LogStore::new(),
            processor,
            subscribers: Vec::new(),
        }
    }

    /// Watch one subject. Every log submitted for that subject delivers
    /// a recomputed frame to the returned receiver.
    pub fn subscribe(&mut self, subject_id: &str) -> Receiver<AvatarFrame> {
        let (sender, receiver) = channel();
        self.subscribers.push(Subscriber {
            subject_id: subject_id.to_string(),
            sender,
        });
        receiver
    }

    /// Upsert a log, recompute the subject's frame from storage, notify
    /// subscribers, and return the frame to the caller.
    pub fn submit(&mut self, subject_id: &str, log: DailyLog) -> AvatarFrame {
        self.store.upsert(subject_id, log);
        let logs = self.store.logs_desc(subject_id);
        let frame = self.processor.process(&logs, subject_id);

        self.subscribers.retain(|sub| {
            sub.subject_id != subject_id || sub.sender.send(frame.clone()).is_ok()
        });

        frame
    }

    pub fn store(&self) -> &LogStore {
        &self.store
    }

    /// Serialize the backing store so hosts can persist it
    pub fn save_store(&self) -> Result<String, ComputeError> {
        self.store.to_json()
    }

    /// Replace the backing store from JSON produced by
    /// [`save_store`](Self::save_store)
    pub fn load_store(&mut self, json: &str) -> Result<(), ComputeError> {
        self.store = LogStore::from_json(json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(date: &str, water: f64) -> DailyLog {
        DailyLog::new(date, water, 8.0, 5, 60, 175.0, 70.0)
    }

    #[test]
    fn test_submit_returns_frame_over_full_history() {
        let mut feed = LogFeed::new();
        feed.submit("s1", log("2024-01-14", 2000.0));
        let frame = feed.submit("s1", log("2024-01-15", 2000.0));

        assert_eq!(frame.provenance.log_count, 2);
        assert_eq!(frame.provenance.latest_date.as_deref(), Some("2024-01-15"));
        assert!((frame.parameters.hydration_level - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_subscriber_receives_each_update() {
        let mut feed = LogFeed::new();
        let rx = feed.subscribe("s1");

        feed.submit("s1", log("2024-01-14", 1000.0));
        feed.submit("s1", log("2024-01-15", 2000.0));

        let first = rx.try_recv().unwrap();
        assert_eq!(first.provenance.log_count, 1);
        let second = rx.try_recv().unwrap();
        assert_eq!(second.provenance.log_count, 2);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_subscriber_only_sees_its_subject() {
        let mut feed = LogFeed::new();
        let rx = feed.subscribe("s1");

        feed.submit("s2", log("2024-01-15", 2000.0));
        assert!(rx.try_recv().is_err());

        feed.submit("s1", log("2024-01-15", 2000.0));
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut feed = LogFeed::new();
        let rx = feed.subscribe("s1");
        drop(rx);

        feed.submit("s1", log("2024-01-15", 2000.0));
        assert!(feed.subscribers.is_empty());
    }

    #[test]
    fn test_store_save_and_load_round_trip() {
        let mut feed = LogFeed::new();
        feed.submit("s1", log("2024-01-14", 1000.0));
        feed.submit("s1", log("2024-01-15", 2000.0));
        let json = feed.save_store().unwrap();

        let mut restored = LogFeed::new();
        restored.load_store(&json).unwrap();
        let frame = restored.submit("s1", log("2024-01-16", 2000.0));
        assert_eq!(frame.provenance.log_count, 3);
    }

    #[test]
    fn test_resubmitted_date_overwrites() {
        let mut feed = LogFeed::new();
        feed.submit("s1", log("2024-01-15", 500.0));
        let frame = feed.submit("s1", log("2024-01-15", 2000.0));

        assert_eq!(frame.provenance.log_count, 1);
        assert!((frame.parameters.hydration_level - 100.0).abs() < f64::EPSILON);
    }
}
