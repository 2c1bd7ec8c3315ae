//! Comments: attached to a post, written by a user.

use serde::{Deserialize, Serialize};

use crate::post::PostId;
use crate::record::{record_id, EntityKind, Record};
use crate::user::UserId;

record_id!(
    /// Stable comment identifier.
    CommentId
);

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier.
    pub id: CommentId,
    #[allow(missing_docs)]
    pub text: String,
    /// Author. Validated to exist when the comment is created.
    pub author: UserId,
    /// Parent post. Validated to exist and be published at creation time.
    pub post: PostId,
}

impl Record for Comment {
    type Id = CommentId;
    const KIND: EntityKind = EntityKind::Comment;

    fn id(&self) -> CommentId {
        self.id
    }
}

/// Input for creating a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateComment {
    #[allow(missing_docs)]
    pub text: String,
    #[allow(missing_docs)]
    pub author: UserId,
    #[allow(missing_docs)]
    pub post: PostId,
}

impl CreateComment {
    /// Creates an input.
    #[must_use]
    pub fn new(text: impl Into<String>, author: UserId, post: PostId) -> Self {
        Self {
            text: text.into(),
            author,
            post,
        }
    }

    pub(crate) fn into_comment(self, id: CommentId) -> Comment {
        Comment {
            id,
            text: self.text,
            author: self.author,
            post: self.post,
        }
    }
}

/// Partial update for a comment. Only the text is editable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPatch {
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CommentPatch {
    /// Patch that replaces the text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}
