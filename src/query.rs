//! Read path: filtered listings and relationship projections.
//!
//! A `ReadView` holds the store's shared lock for its lifetime. Any number
//! of views can coexist; mutations wait until they are dropped, so a view
//! never observes a half-applied cascade.

use std::sync::RwLockReadGuard;

use crate::comment::{Comment, CommentId};
use crate::post::{Post, PostId};
use crate::storage::Tables;
use crate::user::{User, UserId};

/// Lowercased search needle, or `None` when the query matches everything.
fn needle(query: Option<&str>) -> Option<String> {
    query.filter(|q| !q.is_empty()).map(str::to_lowercase)
}

/// Consistent read-only view over the store.
#[derive(Debug)]
pub struct ReadView<'a> {
    tables: RwLockReadGuard<'a, Tables>,
}

impl<'a> ReadView<'a> {
    pub(crate) fn new(tables: RwLockReadGuard<'a, Tables>) -> Self {
        Self { tables }
    }

    /// Users whose name contains `query` (case-insensitive), in creation
    /// order. `None` or an empty query lists every user.
    #[must_use]
    pub fn users(&self, query: Option<&str>) -> Vec<&User> {
        match needle(query) {
            None => self.tables.users.iter().collect(),
            Some(n) => self
                .tables
                .users
                .filter(move |u| u.name.to_lowercase().contains(&n))
                .collect(),
        }
    }

    /// Posts whose title or body contains `query` (case-insensitive), in
    /// creation order. `None` or an empty query lists every post.
    #[must_use]
    pub fn posts(&self, query: Option<&str>) -> Vec<&Post> {
        match needle(query) {
            None => self.tables.posts.iter().collect(),
            Some(n) => self
                .tables
                .posts
                .filter(move |p| p.matches_lowercase(&n))
                .collect(),
        }
    }

    /// Every comment, in creation order.
    #[must_use]
    pub fn comments(&self) -> Vec<&Comment> {
        self.tables.comments.iter().collect()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.tables.users.get(id)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn post(&self, id: PostId) -> Option<&Post> {
        self.tables.posts.get(id)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn comment(&self, id: CommentId) -> Option<&Comment> {
        self.tables.comments.get(id)
    }

    /// The post's author.
    #[must_use]
    pub fn post_author(&self, post: &Post) -> Option<&User> {
        self.tables.users.get(post.author)
    }

    /// Posts written by `user`.
    #[must_use]
    pub fn user_posts(&self, user: UserId) -> Vec<&Post> {
        self.tables.posts.filter(move |p| p.author == user).collect()
    }

    /// Comments written by `user`.
    #[must_use]
    pub fn user_comments(&self, user: UserId) -> Vec<&Comment> {
        self.tables
            .comments
            .filter(move |c| c.author == user)
            .collect()
    }

    /// Comments on `post`.
    #[must_use]
    pub fn post_comments(&self, post: PostId) -> Vec<&Comment> {
        self.tables.comments.filter(move |c| c.post == post).collect()
    }

    /// The comment's author.
    #[must_use]
    pub fn comment_author(&self, comment: &Comment) -> Option<&User> {
        self.tables.users.get(comment.author)
    }

    /// The post the comment belongs to.
    #[must_use]
    pub fn comment_post(&self, comment: &Comment) -> Option<&Post> {
        self.tables.posts.get(comment.post)
    }

    /// The underlying tables.
    #[must_use]
    pub fn tables(&self) -> &Tables {
        &self.tables
    }
}
