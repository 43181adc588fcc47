//! Change notifications.
//!
//! Every successful write publishes an [`Event`] named `<entity>:<action>`,
//! e.g. `product:created` or `waste:inventory:deleted`. Events are logged and
//! delivered to in-process subscribers; publishing with no subscriber is fine.

use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Buffered events per subscriber before the slowest one starts lagging.
pub const CHANNEL_CAPACITY: usize = 256;

/// A change notification.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Event {
    pub name: String,
    /// The written row, or `{"id": ...}` for deletes.
    pub payload: Value,
}

/// What happened to the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Created,
    Updated,
    Deleted,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Created => "created",
            Action::Updated => "updated",
            Action::Deleted => "deleted",
        }
    }
}

/// Broadcast side of the notification channel.
#[derive(Debug, Clone)]
pub struct Events {
    tx: broadcast::Sender<Event>,
}

impl Default for Events {
    fn default() -> Self {
        Self::new()
    }
}

impl Events {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Publish `<entity>:<action>` with `row` as the payload.
    pub fn publish<T: Serialize>(&self, entity: &str, action: Action, row: &T) {
        let payload = match serde_json::to_value(row) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(entity, error = %e, "event payload not serializable");
                Value::Null
            }
        };
        self.send(Event {
            name: format!("{entity}:{}", action.as_str()),
            payload,
        });
    }

    /// Publish `<entity>:deleted` carrying `{"id": id}`.
    pub fn deleted(&self, entity: &str, id: i64) {
        self.send(Event {
            name: format!("{entity}:{}", Action::Deleted.as_str()),
            payload: serde_json::json!({ "id": id }),
        });
    }

    fn send(&self, event: Event) {
        let receivers = self.tx.send(event.clone()).unwrap_or(0);
        info!(event = %event.name, receivers, "event published");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let events = Events::new();
        let mut rx = events.subscribe();

        events.publish("product", Action::Created, &serde_json::json!({"id": 1, "name": "Mango Jam"}));
        events.deleted("waste:inventory", 7);

        let created = rx.recv().await.unwrap();
        assert_eq!(created.name, "product:created");
        assert_eq!(created.payload["name"], "Mango Jam");

        let deleted = rx.recv().await.unwrap();
        assert_eq!(deleted.name, "waste:inventory:deleted");
        assert_eq!(deleted.payload, serde_json::json!({"id": 7}));
    }

    #[test]
    fn test_publish_without_subscribers() {
        let events = Events::new();
        events.publish("order", Action::Updated, &serde_json::json!({"id": 1}));
    }
}
