//! Event types delivered to subscribers.
//!
//! These types are serializable so a transport can forward them verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::comment::Comment;
use crate::post::Post;

use super::topic::Topic;

/// What happened to the record, from the subscriber's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationKind {
    #[allow(missing_docs)]
    Created,
    #[allow(missing_docs)]
    Updated,
    #[allow(missing_docs)]
    Deleted,
}

/// A post entering, changing within, or leaving the published set.
///
/// `data` is the pre-mutation snapshot for `Deleted`, the post-mutation
/// snapshot otherwise.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEvent {
    pub mutation: MutationKind,
    pub data: Post,
}

/// A comment created, edited or removed under a post.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentEvent {
    pub mutation: MutationKind,
    pub data: Comment,
}

/// Event payload, one variant per topic kind.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    Post(PostEvent),
    Comment(CommentEvent),
}

impl EventPayload {
    /// The topic this payload is published on.
    #[must_use]
    pub const fn topic(&self) -> Topic {
        match self {
            Self::Post(_) => Topic::AllPosts,
            Self::Comment(ev) => Topic::CommentsForPost(ev.data.post),
        }
    }

    /// The mutation tag.
    #[must_use]
    pub const fn mutation(&self) -> MutationKind {
        match self {
            Self::Post(ev) => ev.mutation,
            Self::Comment(ev) => ev.mutation,
        }
    }
}

impl From<PostEvent> for EventPayload {
    fn from(ev: PostEvent) -> Self {
        Self::Post(ev)
    }
}

impl From<CommentEvent> for EventPayload {
    fn from(ev: CommentEvent) -> Self {
        Self::Comment(ev)
    }
}

/// A delivered notification.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub event_id: Uuid,
    pub topic: Topic,
    pub timestamp: DateTime<Utc>,
    pub payload: EventPayload,
}

impl Notification {
    /// Wrap a payload, deriving its topic.
    #[must_use]
    pub fn new(payload: EventPayload) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            topic: payload.topic(),
            timestamp: Utc::now(),
            payload,
        }
    }

    /// The mutation tag of the payload.
    #[must_use]
    pub const fn mutation(&self) -> MutationKind {
        self.payload.mutation()
    }

    /// The post snapshot, if this is a post event.
    #[must_use]
    pub const fn post(&self) -> Option<&Post> {
        match &self.payload {
            EventPayload::Post(ev) => Some(&ev.data),
            EventPayload::Comment(_) => None,
        }
    }

    /// The comment snapshot, if this is a comment event.
    #[must_use]
    pub const fn comment(&self) -> Option<&Comment> {
        match &self.payload {
            EventPayload::Comment(ev) => Some(&ev.data),
            EventPayload::Post(_) => None,
        }
    }
}
