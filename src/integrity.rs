//! Referential integrity: validation and cascades for every mutation.
//!
//! Each function validates against the current tables first and only then
//! writes, so an `Err` always means the tables are untouched. On success it
//! returns the affected record together with every post/comment change the
//! mutation caused (direct change first, cascades after), which the engine
//! feeds to the visibility detector.
//!
//! Reference checks happen only when a reference is set. A comment is not
//! revalidated when its post is later unpublished.

use std::collections::HashSet;

use crate::comment::{Comment, CommentId, CommentPatch, CreateComment};
use crate::error::{StoreError, StoreResult};
use crate::patch::apply;
use crate::post::{CreatePost, Post, PostId, PostPatch};
use crate::record::EntityKind;
use crate::storage::Tables;
use crate::user::{CreateUser, User, UserId, UserPatch};
use crate::visibility::Change;

/// Post and comment changes produced by one mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects {
    /// Post changes, direct change first.
    pub posts: Vec<Change<Post>>,
    /// Comment changes, direct change first.
    pub comments: Vec<Change<Comment>>,
}

impl Effects {
    fn post(change: Change<Post>) -> Self {
        Self {
            posts: vec![change],
            comments: Vec::new(),
        }
    }

    fn comment(change: Change<Comment>) -> Self {
        Self {
            posts: Vec::new(),
            comments: vec![change],
        }
    }
}

/// A committed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed<R> {
    /// The record returned to the caller. For deletes, the pre-cascade
    /// snapshot of the removed record.
    pub record: R,
    /// Changes to report.
    pub effects: Effects,
}

impl<R> Committed<R> {
    fn new(record: R, effects: Effects) -> Self {
        Self { record, effects }
    }
}

fn email_taken(tables: &Tables, email: &str, except: Option<UserId>) -> bool {
    tables
        .users
        .any(|u| u.email == email && Some(u.id) != except)
}

fn require_user(tables: &Tables, id: UserId) -> StoreResult<()> {
    if tables.users.contains(id) {
        Ok(())
    } else {
        Err(StoreError::not_found(EntityKind::User, id))
    }
}

/// Insert a user. Fails with `Conflict` if the email is already used.
pub fn create_user(tables: &mut Tables, data: CreateUser) -> StoreResult<Committed<User>> {
    if email_taken(tables, &data.email, None) {
        return Err(StoreError::email_taken(data.email));
    }

    let user = data.into_user(UserId::new());
    tables.users.insert(user.clone())?;
    Ok(Committed::new(user, Effects::default()))
}

/// Patch a user. A new email may not collide with another user's.
pub fn update_user(
    tables: &mut Tables,
    id: UserId,
    patch: UserPatch,
) -> StoreResult<Committed<User>> {
    if !tables.users.contains(id) {
        return Err(StoreError::not_found(EntityKind::User, id));
    }
    if let Some(email) = patch.email.as_deref() {
        if email_taken(tables, email, Some(id)) {
            return Err(StoreError::email_taken(email));
        }
    }

    let user = tables
        .users
        .get_mut(id)
        .ok_or_else(|| StoreError::not_found(EntityKind::User, id))?;
    apply(&mut user.name, patch.name);
    apply(&mut user.email, patch.email);
    apply(&mut user.age, patch.age);
    Ok(Committed::new(user.clone(), Effects::default()))
}

/// Remove a user, their posts, and every comment that was on one of those
/// posts or written by the user.
pub fn delete_user(tables: &mut Tables, id: UserId) -> StoreResult<Committed<User>> {
    let user = tables
        .users
        .remove(id)
        .ok_or_else(|| StoreError::not_found(EntityKind::User, id))?;

    let posts = tables.posts.remove_where(|p| p.author == id);
    let removed: HashSet<PostId> = posts.iter().map(|p| p.id).collect();
    let comments = tables
        .comments
        .remove_where(|c| c.author == id || removed.contains(&c.post));

    let effects = Effects {
        posts: posts.into_iter().map(Change::deleted).collect(),
        comments: comments.into_iter().map(Change::deleted).collect(),
    };
    Ok(Committed::new(user, effects))
}

/// Insert a post. The author must exist.
pub fn create_post(tables: &mut Tables, data: CreatePost) -> StoreResult<Committed<Post>> {
    require_user(tables, data.author)?;

    let post = data.into_post(PostId::new());
    tables.posts.insert(post.clone())?;
    Ok(Committed::new(post.clone(), Effects::post(Change::created(post))))
}

/// Patch a post's title, body or published flag.
pub fn update_post(
    tables: &mut Tables,
    id: PostId,
    patch: PostPatch,
) -> StoreResult<Committed<Post>> {
    let post = tables
        .posts
        .get_mut(id)
        .ok_or_else(|| StoreError::not_found(EntityKind::Post, id))?;

    let before = post.clone();
    apply(&mut post.title, patch.title);
    apply(&mut post.body, patch.body);
    apply(&mut post.published, patch.published);
    let after = post.clone();

    Ok(Committed::new(
        after.clone(),
        Effects::post(Change::updated(before, after)),
    ))
}

/// Remove a post and its comments.
pub fn delete_post(tables: &mut Tables, id: PostId) -> StoreResult<Committed<Post>> {
    let post = tables
        .posts
        .remove(id)
        .ok_or_else(|| StoreError::not_found(EntityKind::Post, id))?;

    let comments = tables.comments.remove_where(|c| c.post == id);

    let effects = Effects {
        posts: vec![Change::deleted(post.clone())],
        comments: comments.into_iter().map(Change::deleted).collect(),
    };
    Ok(Committed::new(post, effects))
}

/// Insert a comment. The author must exist and the post must exist and be
/// published.
pub fn create_comment(
    tables: &mut Tables,
    data: CreateComment,
) -> StoreResult<Committed<Comment>> {
    require_user(tables, data.author)?;
    let commentable = tables.posts.get(data.post).is_some_and(|p| p.published);
    if !commentable {
        return Err(StoreError::not_found(EntityKind::Post, data.post));
    }

    let comment = data.into_comment(CommentId::new());
    tables.comments.insert(comment.clone())?;
    Ok(Committed::new(
        comment.clone(),
        Effects::comment(Change::created(comment)),
    ))
}

/// Patch a comment's text.
pub fn update_comment(
    tables: &mut Tables,
    id: CommentId,
    patch: CommentPatch,
) -> StoreResult<Committed<Comment>> {
    let comment = tables
        .comments
        .get_mut(id)
        .ok_or_else(|| StoreError::not_found(EntityKind::Comment, id))?;

    let before = comment.clone();
    apply(&mut comment.text, patch.text);
    let after = comment.clone();

    Ok(Committed::new(
        after.clone(),
        Effects::comment(Change::updated(before, after)),
    ))
}

/// Remove a comment.
pub fn delete_comment(tables: &mut Tables, id: CommentId) -> StoreResult<Committed<Comment>> {
    let comment = tables
        .comments
        .remove(id)
        .ok_or_else(|| StoreError::not_found(EntityKind::Comment, id))?;

    Ok(Committed::new(
        comment.clone(),
        Effects::comment(Change::deleted(comment)),
    ))
}
