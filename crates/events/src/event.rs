use chrono::{DateTime, Utc};

/// A fact handed to an [`EventPublisher`](crate::EventPublisher).
///
/// Delivery is best-effort, so an event must be self-describing: consumers
/// log and persist it without any other context.
pub trait Event: Clone + core::fmt::Debug + Send + 'static {
    /// Stable type name, emitted as the `event_type` log field.
    const EVENT_TYPE: &'static str;

    /// What the event is about (e.g. a SKU), for correlating log lines.
    fn subject(&self) -> &str;

    /// When the fact happened, as opposed to when it was delivered.
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Time between the fact and `now`, clamped at zero.
    fn age_at(&self, now: DateTime<Utc>) -> chrono::Duration {
        (now - self.occurred_at()).max(chrono::Duration::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Restocked {
        at: DateTime<Utc>,
    }

    impl Event for Restocked {
        const EVENT_TYPE: &'static str = "test.restocked";

        fn subject(&self) -> &str {
            "BRK-001"
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            self.at
        }
    }

    #[test]
    fn age_never_goes_negative() {
        let at = Utc::now();
        let event = Restocked { at };
        assert_eq!(event.age_at(at + chrono::Duration::seconds(3)), chrono::Duration::seconds(3));
        assert_eq!(event.age_at(at - chrono::Duration::seconds(3)), chrono::Duration::zero());
    }
}
