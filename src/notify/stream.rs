use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Weak;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

use super::bus::BusInner;
use super::event::Notification;
use super::topic::Topic;

/// Unique identifier for a subscription.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new random subscription id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

fn disconnected() -> StoreError {
    StoreError::Disconnected {
        path: "subscription".to_string(),
    }
}

/// A live feed of notifications for one topic.
///
/// Only events published after the subscription was registered are seen.
/// Iterating blocks for the next event and ends once the engine is gone.
/// Dropping the stream unsubscribes it.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    topic: Topic,
    rx: Receiver<Notification>,
    bus: Weak<BusInner>,
    unregistered: AtomicBool,
}

impl Subscription {
    pub(crate) fn new(
        id: SubscriptionId,
        topic: Topic,
        rx: Receiver<Notification>,
        bus: Weak<BusInner>,
    ) -> Self {
        Self {
            id,
            topic,
            rx,
            bus,
            unregistered: AtomicBool::new(false),
        }
    }

    /// The subscription id.
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The topic this stream listens on.
    #[must_use]
    pub const fn topic(&self) -> Topic {
        self.topic
    }

    /// Stop delivery to this stream.
    ///
    /// Idempotent. The listener is detached before this returns, so no event
    /// published afterwards reaches it. Events already queued can still be
    /// drained with `try_recv`.
    pub fn unsubscribe(&self) {
        if self.unregistered.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(bus) = self.bus.upgrade() {
            bus.detach(self.topic, self.id);
        }
    }

    /// Receive the next event (blocking).
    pub fn recv(&self) -> StoreResult<Notification> {
        self.rx.recv().map_err(|_| disconnected())
    }

    /// Receive the next event with a timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> StoreResult<Notification> {
        self.rx.recv_timeout(timeout).map_err(|err| match err {
            RecvTimeoutError::Timeout => StoreError::Timeout {
                duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            },
            RecvTimeoutError::Disconnected => disconnected(),
        })
    }

    /// Receive an already-queued event without blocking.
    pub fn try_recv(&self) -> StoreResult<Option<Notification>> {
        match self.rx.try_recv() {
            Ok(n) => Ok(Some(n)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(disconnected()),
        }
    }

    /// Drain every queued event without blocking.
    #[must_use]
    pub fn drain(&self) -> Vec<Notification> {
        self.rx.try_iter().collect()
    }
}

impl Iterator for Subscription {
    type Item = Notification;

    fn next(&mut self) -> Option<Notification> {
        self.rx.recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
