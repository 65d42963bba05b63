//! Non-blocking event publication (mechanics only).
//!
//! Producers on a latency-sensitive path (e.g. order placement) hand events to an
//! `EventPublisher` and move on. Implementations must never block the caller:
//! when the downstream buffer is full the message is dropped and the outcome says so.
//!
//! Delivery is **best-effort**. Consumers of auxiliary telemetry must tolerate loss.

use std::sync::{Arc, Mutex};

use crate::event::Event;

/// Result of a single non-blocking publish attempt.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The message was handed to the consumer side.
    Enqueued,
    /// The buffer was full; the message (the newest one) was dropped.
    DroppedFull,
    /// The consumer side is gone; the message was dropped.
    Closed,
}

impl PublishOutcome {
    pub fn is_enqueued(self) -> bool {
        matches!(self, PublishOutcome::Enqueued)
    }
}

/// Fire-and-forget publisher abstraction.
///
/// The trait requires `Send + Sync`: many concurrent producers share one publisher.
pub trait EventPublisher<E: Event>: Send + Sync {
    fn publish(&self, event: E) -> PublishOutcome;
}

impl<E, P> EventPublisher<E> for Arc<P>
where
    E: Event,
    P: EventPublisher<E> + ?Sized,
{
    fn publish(&self, event: E) -> PublishOutcome {
        (**self).publish(event)
    }
}

/// In-memory publisher that keeps every message (tests/dev).
#[derive(Debug)]
pub struct RecordingPublisher<E> {
    published: Mutex<Vec<E>>,
}

impl<E> RecordingPublisher<E> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: Clone> RecordingPublisher<E> {
    /// Snapshot of everything published so far, in publish order.
    pub fn published(&self) -> Vec<E> {
        match self.published.lock() {
            Ok(v) => v.clone(),
            Err(_) => vec![],
        }
    }
}

impl<E> Default for RecordingPublisher<E> {
    fn default() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
        }
    }
}

impl<E: Event> EventPublisher<E> for RecordingPublisher<E> {
    fn publish(&self, event: E) -> PublishOutcome {
        match self.published.lock() {
            Ok(mut v) => {
                v.push(event);
                PublishOutcome::Enqueued
            }
            Err(_) => PublishOutcome::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{DateTime, Utc};

    #[derive(Debug, Clone, PartialEq)]
    struct Counted(u32, DateTime<Utc>);

    impl Event for Counted {
        const EVENT_TYPE: &'static str = "test.counted";

        fn subject(&self) -> &str {
            "counter"
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            self.1
        }
    }

    #[test]
    fn recording_publisher_keeps_publish_order() {
        let now = Utc::now();
        let publisher: Arc<RecordingPublisher<Counted>> = Arc::new(RecordingPublisher::new());
        assert!(publisher.publish(Counted(1, now)).is_enqueued());
        assert!(publisher.publish(Counted(2, now)).is_enqueued());
        let seen: Vec<u32> = publisher.published().iter().map(|c| c.0).collect();
        assert_eq!(seen, vec![1, 2]);
    }
}
