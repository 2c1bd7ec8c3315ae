//! Visibility-transition detection.
//!
//! Subscribers observe published posts as a logical set. A post that
//! becomes published looks to them like a fresh creation; one that stops
//! being published looks like a deletion. The functions here map a
//! before/after pair to the single event (if any) a subscriber should see.
//! They never touch the store or the bus.

use serde::{Deserialize, Serialize};

use crate::comment::Comment;
use crate::notify::{CommentEvent, MutationKind, PostEvent};
use crate::post::Post;

/// Which mutation produced a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    #[allow(missing_docs)]
    Create,
    #[allow(missing_docs)]
    Update,
    #[allow(missing_docs)]
    Delete,
}

/// A committed record change: the state before and after one mutation.
///
/// Create has no `before`, delete has no `after`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change<R> {
    /// The mutation kind.
    pub kind: ChangeKind,
    /// Snapshot before the mutation.
    pub before: Option<R>,
    /// Snapshot after the mutation.
    pub after: Option<R>,
}

impl<R> Change<R> {
    /// A freshly inserted record.
    pub fn created(after: R) -> Self {
        Self {
            kind: ChangeKind::Create,
            before: None,
            after: Some(after),
        }
    }

    /// An in-place update.
    pub fn updated(before: R, after: R) -> Self {
        Self {
            kind: ChangeKind::Update,
            before: Some(before),
            after: Some(after),
        }
    }

    /// A removed record.
    pub fn deleted(before: R) -> Self {
        Self {
            kind: ChangeKind::Delete,
            before: Some(before),
            after: None,
        }
    }
}

fn post_event(mutation: MutationKind, data: &Post) -> Option<PostEvent> {
    Some(PostEvent {
        mutation,
        data: data.clone(),
    })
}

/// The event a post change produces on the posts topic.
///
/// | before | after | kind | event |
/// |---|---|---|---|
/// | - | published | create | `Created(after)` |
/// | - | draft | create | none |
/// | published | draft | update | `Deleted(before)` |
/// | draft | published | update | `Created(after)` |
/// | published | published | update | `Updated(after)` |
/// | draft | draft | update | none |
/// | published | - | delete | `Deleted(before)` |
/// | draft | - | delete | none |
#[must_use]
pub fn detect_post(change: &Change<Post>) -> Option<PostEvent> {
    match (change.kind, change.before.as_ref(), change.after.as_ref()) {
        (ChangeKind::Create, _, Some(after)) if after.published => {
            post_event(MutationKind::Created, after)
        }
        (ChangeKind::Update, Some(before), Some(after)) => {
            match (before.published, after.published) {
                (true, false) => post_event(MutationKind::Deleted, before),
                (false, true) => post_event(MutationKind::Created, after),
                (true, true) => post_event(MutationKind::Updated, after),
                (false, false) => None,
            }
        }
        (ChangeKind::Delete, Some(before), _) if before.published => {
            post_event(MutationKind::Deleted, before)
        }
        _ => None,
    }
}

/// The event a comment change produces on its post's comment topic.
///
/// Comments carry no visibility flag, so every change is reported.
#[must_use]
pub fn detect_comment(change: &Change<Comment>) -> Option<CommentEvent> {
    let (mutation, data) = match (change.kind, change.before.as_ref(), change.after.as_ref()) {
        (ChangeKind::Create, _, Some(after)) => (MutationKind::Created, after),
        (ChangeKind::Update, _, Some(after)) => (MutationKind::Updated, after),
        (ChangeKind::Delete, Some(before), _) => (MutationKind::Deleted, before),
        _ => return None,
    };
    Some(CommentEvent {
        mutation,
        data: data.clone(),
    })
}
