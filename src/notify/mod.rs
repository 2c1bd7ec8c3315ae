//! Notification subsystem.
//!
//! Mutations publish visibility-filtered events onto structured topics;
//! subscribers hold a [`Subscription`] stream per topic. Delivery is an
//! in-process channel send, so a transport layer can forward the stream
//! without touching the store.

/// Topic-keyed fan-out.
pub mod bus;
/// Event and notification types.
pub mod event;
/// Subscriber stream handle.
pub mod stream;
/// Topic keys.
pub mod topic;

pub use bus::NotificationBus;
pub use event::{CommentEvent, EventPayload, MutationKind, Notification, PostEvent};
pub use stream::{Subscription, SubscriptionId};
pub use topic::Topic;
