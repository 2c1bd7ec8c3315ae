//! Structured topic keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::post::PostId;

/// An addressable notification channel.
///
/// Comment topics are keyed by the parent post, so two posts can never
/// share a comment feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "topic", content = "post_id", rename_all = "snake_case")]
pub enum Topic {
    /// Visibility events for every post.
    AllPosts,
    /// Comment events under one post.
    CommentsForPost(PostId),
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllPosts => write!(f, "posts"),
            Self::CommentsForPost(id) => write!(f, "comments:{id}"),
        }
    }
}
