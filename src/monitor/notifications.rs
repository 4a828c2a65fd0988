//! Best-effort notification broadcast to live subscribers
//!
//! A thin observer abstraction over `std::sync::mpsc`: subscribers get a
//! receiver handle, publishing is fire-and-forget. Slow or dropped
//! subscribers never block the monitor; delivery is at-most-once.

use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

/// Coarse-grained notification tags published on every monitor call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityNotification {
    DataAccessed,
    AnalyticsAccessed,
    StateChanged,
    DataModified,
}

/// Subscriber handle for receiving notifications.
pub struct NotificationSubscriber {
    receiver: Receiver<SecurityNotification>,
}

impl NotificationSubscriber {
    /// Try to receive a notification without blocking.
    pub fn try_recv(&mut self) -> Result<SecurityNotification, mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive a notification, blocking until one is available.
    pub fn recv(&mut self) -> Result<SecurityNotification, mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Receive a notification with a timeout.
    pub fn recv_timeout(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<SecurityNotification, mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Iterator over received notifications.
    pub fn iter(&mut self) -> mpsc::Iter<SecurityNotification> {
        self.receiver.iter()
    }
}

/// Broadcast bus for [`SecurityNotification`] values.
pub struct NotificationBus {
    subscribers: Mutex<Vec<Sender<SecurityNotification>>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> NotificationSubscriber {
        let (sender, receiver) = mpsc::channel();
        self.subscribers.lock().unwrap().push(sender);
        NotificationSubscriber { receiver }
    }

    /// Publish to all live subscribers. Disconnected subscribers are pruned;
    /// nothing blocks and no failure surfaces.
    pub fn publish(&self, notification: SecurityNotification) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|sender| sender.send(notification).is_ok());
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}
