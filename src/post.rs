//! Posts: the only records with a visibility flag.

use serde::{Deserialize, Serialize};

use crate::record::{record_id, EntityKind, Record};
use crate::user::UserId;

record_id!(
    /// Stable post identifier.
    PostId
);

/// A post written by a user.
///
/// Observers only ever see published posts; see [`crate::visibility`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier.
    pub id: PostId,
    #[allow(missing_docs)]
    pub title: String,
    #[allow(missing_docs)]
    pub body: String,
    /// Whether the post is visible to subscribers and commentable.
    pub published: bool,
    /// Author. Validated to exist when the post is created.
    pub author: UserId,
}

impl Post {
    /// Case-insensitive substring match against title or body.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.body.to_lowercase().contains(needle)
    }
}

impl Record for Post {
    type Id = PostId;
    const KIND: EntityKind = EntityKind::Post;

    fn id(&self) -> PostId {
        self.id
    }
}

/// Input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePost {
    #[allow(missing_docs)]
    pub title: String,
    #[allow(missing_docs)]
    pub body: String,
    #[allow(missing_docs)]
    pub published: bool,
    /// Must reference an existing user.
    pub author: UserId,
}

impl CreatePost {
    /// Creates an input.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        published: bool,
        author: UserId,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            published,
            author,
        }
    }

    pub(crate) fn into_post(self, id: PostId) -> Post {
        Post {
            id,
            title: self.title,
            body: self.body,
            published: self.published,
            author: self.author,
        }
    }
}

/// Partial update for a post. The author cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPatch {
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl PostPatch {
    /// Patch that only flips the published flag.
    #[must_use]
    pub fn published(published: bool) -> Self {
        Self {
            published: Some(published),
            ..Self::default()
        }
    }

    /// Patch that only changes the title.
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}
