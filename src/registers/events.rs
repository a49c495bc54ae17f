//! Register Change Events
//!
//! Broadcasts successful register writes to observing clients (UI,
//! logging). Delivery is fire-and-forget: a slow or disconnected
//! observer must never stall or fail a write.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::debug;

use crate::types::RegisterChange;

/// Default capacity of the change broadcast channel.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// A broadcast-based sink for register change notifications.
pub struct RegisterEvents {
    sender: broadcast::Sender<Arc<RegisterChange>>,
}

impl RegisterEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to register changes. Each subscriber receives every
    /// change published after this call; a lagging subscriber drops its
    /// oldest buffered events, never the writer.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<RegisterChange>> {
        self.sender.subscribe()
    }

    /// Publish a change. Never blocks and never surfaces a failure to
    /// the caller; with no active subscribers the event is dropped.
    pub fn publish(&self, change: RegisterChange) {
        if let Err(err) = self.sender.send(Arc::new(change)) {
            debug!(key = err.0.key.as_str(), "register change dropped, no subscribers");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for RegisterEvents {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn change(key: &str) -> RegisterChange {
        RegisterChange {
            key: key.to_string(),
            value: json!({"ok": true}),
            source: "test_tool".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_publish_without_subscribers_does_not_fail() {
        let events = RegisterEvents::default();
        events.publish(change("swap_quote"));
        assert_eq!(events.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_change() {
        let events = RegisterEvents::default();
        let mut rx = events.subscribe();

        events.publish(change("swap_quote"));

        let received = rx.recv().await.expect("receive change");
        assert_eq!(received.key, "swap_quote");
        assert_eq!(received.source, "test_tool");
    }

    #[tokio::test]
    async fn test_changes_arrive_in_publish_order() {
        let events = RegisterEvents::default();
        let mut rx = events.subscribe();

        events.publish(change("first"));
        events.publish(change("second"));

        assert_eq!(rx.recv().await.expect("first").key, "first");
        assert_eq!(rx.recv().await.expect("second").key, "second");
    }
}
