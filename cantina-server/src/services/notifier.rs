//! Notification sink
//!
//! Fire-and-forget broadcast of mutation events. Engines call
//! [`Notifier::notify`] after committing; delivery failures (including
//! the common "no subscribers" case) are logged and swallowed — a lost
//! notification must never fail the originating mutation.

use dashmap::DashMap;
use serde::Serialize;
use shared::event::{BusMessage, EventType};
use shared::util::now_millis;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Per-event version counters
///
/// Lock-free concurrent counters; each event type gets its own
/// monotonically increasing version so consumers can judge staleness.
#[derive(Debug, Default)]
struct EventVersions {
    versions: DashMap<&'static str, u64>,
}

impl EventVersions {
    fn increment(&self, event: EventType) -> u64 {
        let mut entry = self.versions.entry(event.as_str()).or_insert(0);
        *entry += 1;
        *entry
    }
}

/// Broadcast notification service
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<BusMessage>,
    versions: Arc<EventVersions>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            versions: Arc::new(EventVersions::default()),
        }
    }

    /// Subscribe to the event stream (used by streaming endpoints and tests)
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.tx.subscribe()
    }

    /// Publish an event, best effort.
    pub fn notify<T: Serialize>(&self, event: EventType, payload: &T) {
        let data = match serde_json::to_value(payload) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(%event, error = %e, "failed to serialize event payload");
                None
            }
        };
        let message = BusMessage {
            event,
            version: self.versions.increment(event),
            emitted_at: now_millis(),
            data,
        };
        if let Err(e) = self.tx.send(message) {
            // No active subscribers; nothing to deliver.
            tracing::debug!(%event, error = %e, "notification dropped");
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn versions_increase_per_event() {
        let notifier = Notifier::new(8);
        let mut rx = notifier.subscribe();
        notifier.notify(EventType::OrderCreated, &serde_json::json!({"id": 1}));
        notifier.notify(EventType::OrderCreated, &serde_json::json!({"id": 2}));
        notifier.notify(EventType::OrderUpdated, &serde_json::json!({"id": 2}));

        assert_eq!(rx.recv().await.unwrap().version, 1);
        assert_eq!(rx.recv().await.unwrap().version, 2);
        // Independent counter per event type
        assert_eq!(rx.recv().await.unwrap().version, 1);
    }

    #[test]
    fn notify_without_subscribers_is_silent() {
        let notifier = Notifier::new(8);
        notifier.notify(EventType::PaymentStatusChanged, &serde_json::json!({}));
    }
}
