//! Topic-keyed fan-out.
//!
//! Publishing is synchronous: by the time `publish` returns, the event sits
//! in the channel of every listener attached to its topic. Topics without
//! listeners drop the event; nothing is buffered for late subscribers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam_channel::{bounded, unbounded, Sender, TrySendError};
use tracing::{debug, warn};

use crate::error::StoreResult;

use super::event::{EventPayload, Notification};
use super::stream::{Subscription, SubscriptionId};
use super::topic::Topic;

#[derive(Debug)]
struct Listener {
    id: SubscriptionId,
    tx: Sender<Notification>,
}

#[derive(Debug)]
pub(crate) struct BusInner {
    listeners: Mutex<HashMap<Topic, Vec<Listener>>>,
    capacity: Option<usize>,
    dropped_events: AtomicU64,
}

impl BusInner {
    // Delivery and detach must keep working after a panic elsewhere; the map
    // holds no invariant a half-finished operation could break.
    fn listeners(&self) -> MutexGuard<'_, HashMap<Topic, Vec<Listener>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn detach(&self, topic: Topic, id: SubscriptionId) {
        let mut map = self.listeners();
        if let Some(list) = map.get_mut(&topic) {
            list.retain(|l| l.id != id);
            if list.is_empty() {
                map.remove(&topic);
            }
        }
        debug!(%topic, subscription = ?id, "listener detached");
    }
}

/// Publish/subscribe hub keyed by [`Topic`].
#[derive(Debug, Clone)]
pub struct NotificationBus {
    inner: Arc<BusInner>,
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(None)
    }
}

impl NotificationBus {
    /// Create a bus. `capacity` bounds each listener's queue; `None` leaves
    /// queues unbounded.
    #[must_use]
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            inner: Arc::new(BusInner {
                listeners: Mutex::new(HashMap::new()),
                capacity: capacity.map(|c| c.max(1)),
                dropped_events: AtomicU64::new(0),
            }),
        }
    }

    /// Attach a listener to `topic`.
    pub fn subscribe(&self, topic: Topic) -> StoreResult<Subscription> {
        let (tx, rx) = match self.inner.capacity {
            Some(cap) => bounded::<Notification>(cap),
            None => unbounded::<Notification>(),
        };
        let id = SubscriptionId::new();

        let mut map = self.inner.listeners();
        map.entry(topic).or_default().push(Listener { id, tx });
        drop(map);

        debug!(%topic, subscription = ?id, "listener attached");
        Ok(Subscription::new(id, topic, rx, Arc::downgrade(&self.inner)))
    }

    /// Deliver `payload` to every listener of its topic.
    ///
    /// Returns the number of listeners that received it. A full or closed
    /// listener queue only affects that listener; closed ones are pruned.
    pub fn publish(&self, payload: EventPayload) -> usize {
        let notification = Notification::new(payload);
        let topic = notification.topic;

        let mut map = self.inner.listeners();
        let Some(list) = map.get_mut(&topic) else {
            debug!(%topic, "no listeners, event dropped");
            return 0;
        };

        let mut delivered = 0usize;
        list.retain(|listener| match listener.tx.try_send(notification.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                self.inner.dropped_events.fetch_add(1, Ordering::Relaxed);
                warn!(%topic, subscription = ?listener.id, "listener queue full, event dropped");
                true
            }
            Err(TrySendError::Disconnected(_)) => {
                debug!(%topic, subscription = ?listener.id, "pruning disconnected listener");
                false
            }
        });
        if list.is_empty() {
            map.remove(&topic);
        }

        debug!(
            %topic,
            mutation = ?notification.mutation(),
            delivered,
            "notification published"
        );
        delivered
    }

    /// Number of listeners currently attached to `topic`.
    #[must_use]
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.inner.listeners().get(&topic).map_or(0, Vec::len)
    }

    /// Events dropped because a bounded listener queue was full.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.inner.dropped_events.load(Ordering::Relaxed)
    }
}
