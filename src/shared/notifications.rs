use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::time::Clock;

/// Event types published by the device and scheduler paths
pub mod event_types {
    pub const DEVICE_ADDED: &str = "device_added";
    pub const DEVICE_REMOVED: &str = "device_removed";
    pub const DEVICE_TOGGLED: &str = "device_toggled";
    pub const DEVICE_CONFIGURED: &str = "device_configured";
    pub const BRIGHTNESS_CHANGED: &str = "brightness_changed";
    pub const POWER_CHANGED: &str = "power_changed";
    pub const RECORDING_STARTED: &str = "recording_started";
    pub const RECORDING_STOPPED: &str = "recording_stopped";
    pub const IMAGE_CAPTURED: &str = "image_captured";
    pub const TASK_SCHEDULED: &str = "task_scheduled";
    pub const TASK_EXECUTED: &str = "task_executed";
    pub const TASK_CANCELLED: &str = "task_cancelled";
}

/// A notification event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_type: String,
    pub device_id: String,
    pub message: String,
    #[serde(default)]
    pub data: serde_json::Value,
    pub timestamp: String,
}

/// Push-channel receiver. Notified synchronously for every published event.
pub trait Subscriber: Send + Sync {
    fn on_event(&self, event: &Event);
}

pub type SubscriberId = u64;

/// Publish/subscribe event log.
///
/// The history is append-only and unbounded; reads return a newest-first
/// suffix. The subscriber list is a secondary synchronous push channel,
/// independent of the pull-based history.
#[derive(Default)]
pub struct NotificationService {
    history: Mutex<Vec<Event>>,
    subscribers: Mutex<Vec<(SubscriberId, Arc<dyn Subscriber>)>>,
    next_subscriber_id: AtomicU64,
}

impl NotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an event stamped with the clock's now, append it to the
    /// history, and push it to all current subscribers.
    pub fn publish(
        &self,
        message: impl Into<String>,
        device_id: impl Into<String>,
        event_type: &str,
        data: serde_json::Value,
        clock: &dyn Clock,
    ) -> Event {
        let event = Event {
            event_type: event_type.to_string(),
            device_id: device_id.into(),
            message: message.into(),
            data,
            timestamp: clock.now_rfc3339(),
        };

        self.history
            .lock()
            .expect("notification history lock poisoned")
            .push(event.clone());

        self.notify(&event);
        event
    }

    /// The last `limit` events, newest first. The whole history when `limit`
    /// exceeds it.
    pub fn recent(&self, limit: usize) -> Vec<Event> {
        let history = self
            .history
            .lock()
            .expect("notification history lock poisoned");
        history.iter().rev().take(limit).cloned().collect()
    }

    pub fn history_len(&self) -> usize {
        self.history
            .lock()
            .expect("notification history lock poisoned")
            .len()
    }

    /// Register a subscriber on the push channel
    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber>) -> SubscriberId {
        let id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers
            .lock()
            .expect("subscriber list lock poisoned")
            .push((id, subscriber));
        id
    }

    /// Remove a subscriber, reporting whether it was registered
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut subscribers = self
            .subscribers
            .lock()
            .expect("subscriber list lock poisoned");
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        subscribers.len() < before
    }

    /// Push an event to every current subscriber, synchronously
    pub fn notify(&self, event: &Event) {
        let subscribers = self
            .subscribers
            .lock()
            .expect("subscriber list lock poisoned");
        for (_, subscriber) in subscribers.iter() {
            subscriber.on_event(event);
        }
    }
}
