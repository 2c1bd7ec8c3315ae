//! Execution engine for postql.
//!
//! `PostqlEngine` owns the store and the notification bus. Every mutation
//! takes the store's write lock, validates, commits its cascades and
//! publishes the resulting events before releasing it, so mutations form a
//! single queue and subscribers see events in commit order. Queries take the
//! read lock and never publish.

use std::sync::Arc;

use tracing::debug;

use crate::comment::{Comment, CommentId, CommentPatch, CreateComment};
use crate::config::EngineConfig;
use crate::error::{StoreError, StoreResult};
use crate::integrity::{self, Committed, Effects};
use crate::ir::{Operation, Request};
use crate::notify::{NotificationBus, Subscription, Topic};
use crate::post::{CreatePost, Post, PostId, PostPatch};
use crate::query::ReadView;
use crate::record::Record;
use crate::seed;
use crate::storage::{InMemoryStore, Tables};
use crate::user::{CreateUser, User, UserId, UserPatch};
use crate::visibility;

/// Result of executing a [`Request`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineResponse {
    User(User),
    Post(Post),
    Comment(Comment),
}

/// postql execution engine.
#[derive(Debug, Clone)]
pub struct PostqlEngine {
    store: Arc<InMemoryStore>,
    bus: NotificationBus,
    config: EngineConfig,
}

impl Default for PostqlEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PostqlEngine {
    /// Create an engine over an empty store with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()), EngineConfig::default())
    }

    /// Create an engine from configuration, seeding demo data if asked to.
    pub fn with_config(config: EngineConfig) -> StoreResult<Self> {
        let tables = if config.seed_demo_data {
            seed::demo_tables()?
        } else {
            Tables::new()
        };
        Ok(Self::with_store(
            Arc::new(InMemoryStore::with_tables(tables)),
            config,
        ))
    }

    /// Create an engine over an existing store.
    #[must_use]
    pub fn with_store(store: Arc<InMemoryStore>, config: EngineConfig) -> Self {
        let bus = NotificationBus::new(config.subscription_capacity);
        Self { store, bus, config }
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &Arc<InMemoryStore> {
        &self.store
    }

    /// Get a reference to the notification bus.
    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one mutation under the write lock and publish what it caused.
    fn mutate<R, F>(&self, op: &'static str, f: F) -> StoreResult<R>
    where
        R: Record,
        F: FnOnce(&mut Tables) -> StoreResult<Committed<R>>,
    {
        let mut tables = self.store.write()?;
        let committed = f(&mut *tables).map_err(|err| {
            debug!(op, error = %err, "mutation rejected");
            err
        })?;
        let kind = R::KIND;
        debug!(
            op,
            %kind,
            id = %committed.record.id(),
            post_changes = committed.effects.posts.len(),
            comment_changes = committed.effects.comments.len(),
            "mutation committed"
        );
        self.dispatch(&committed.effects);
        drop(tables);
        Ok(committed.record)
    }

    fn dispatch(&self, effects: &Effects) {
        for change in &effects.posts {
            if let Some(event) = visibility::detect_post(change) {
                self.bus.publish(event.into());
            }
        }
        for change in &effects.comments {
            if let Some(event) = visibility::detect_comment(change) {
                self.bus.publish(event.into());
            }
        }
    }

    // ---- users ----

    /// Create a user. Fails with `Conflict` if the email is taken.
    pub fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        self.mutate("create_user", |t| integrity::create_user(t, data))
    }

    /// Apply a partial update to a user.
    pub fn update_user(&self, id: UserId, patch: UserPatch) -> StoreResult<User> {
        self.mutate("update_user", |t| integrity::update_user(t, id, patch))
    }

    /// Delete a user with their posts and related comments. Returns the
    /// removed user.
    pub fn delete_user(&self, id: UserId) -> StoreResult<User> {
        self.mutate("delete_user", |t| integrity::delete_user(t, id))
    }

    // ---- posts ----

    /// Create a post. Publishes `CREATED` on the posts topic if it is
    /// published.
    pub fn create_post(&self, data: CreatePost) -> StoreResult<Post> {
        self.mutate("create_post", |t| integrity::create_post(t, data))
    }

    /// Apply a partial update to a post and publish its visibility
    /// transition, if any.
    pub fn update_post(&self, id: PostId, patch: PostPatch) -> StoreResult<Post> {
        self.mutate("update_post", |t| integrity::update_post(t, id, patch))
    }

    /// Delete a post and its comments. Returns the removed post.
    pub fn delete_post(&self, id: PostId) -> StoreResult<Post> {
        self.mutate("delete_post", |t| integrity::delete_post(t, id))
    }

    // ---- comments ----

    /// Create a comment on a published post.
    pub fn create_comment(&self, data: CreateComment) -> StoreResult<Comment> {
        self.mutate("create_comment", |t| integrity::create_comment(t, data))
    }

    /// Replace a comment's text.
    pub fn update_comment(&self, id: CommentId, patch: CommentPatch) -> StoreResult<Comment> {
        self.mutate("update_comment", |t| integrity::update_comment(t, id, patch))
    }

    /// Delete a comment. Returns the removed comment.
    pub fn delete_comment(&self, id: CommentId) -> StoreResult<Comment> {
        self.mutate("delete_comment", |t| integrity::delete_comment(t, id))
    }

    /// Execute a serialized mutation request.
    pub fn execute(&self, request: Request) -> StoreResult<EngineResponse> {
        if request.version != Request::CURRENT_VERSION {
            return Err(StoreError::internal(format!(
                "unsupported request version: {}",
                request.version
            )));
        }
        debug!(
            request_id = %request.request_id,
            op = request.operation.name(),
            "executing request"
        );

        match request.operation {
            Operation::CreateUser(data) => self.create_user(data).map(EngineResponse::User),
            Operation::UpdateUser(p) => self.update_user(p.id, p.data).map(EngineResponse::User),
            Operation::DeleteUser(p) => self.delete_user(p.id).map(EngineResponse::User),
            Operation::CreatePost(data) => self.create_post(data).map(EngineResponse::Post),
            Operation::UpdatePost(p) => self.update_post(p.id, p.data).map(EngineResponse::Post),
            Operation::DeletePost(p) => self.delete_post(p.id).map(EngineResponse::Post),
            Operation::CreateComment(data) => {
                self.create_comment(data).map(EngineResponse::Comment)
            }
            Operation::UpdateComment(p) => self
                .update_comment(p.id, p.data)
                .map(EngineResponse::Comment),
            Operation::DeleteComment(p) => self.delete_comment(p.id).map(EngineResponse::Comment),
        }
    }

    // ---- queries ----

    /// Open a consistent read view.
    pub fn read(&self) -> StoreResult<ReadView<'_>> {
        Ok(ReadView::new(self.store.read()?))
    }

    /// Owned listing of users matching `query` (see [`ReadView::users`]).
    pub fn users(&self, query: Option<&str>) -> StoreResult<Vec<User>> {
        Ok(self.read()?.users(query).into_iter().cloned().collect())
    }

    /// Owned listing of posts matching `query` (see [`ReadView::posts`]).
    pub fn posts(&self, query: Option<&str>) -> StoreResult<Vec<Post>> {
        Ok(self.read()?.posts(query).into_iter().cloned().collect())
    }

    /// Owned listing of every comment.
    pub fn comments(&self) -> StoreResult<Vec<Comment>> {
        Ok(self.read()?.comments().into_iter().cloned().collect())
    }

    // ---- subscriptions ----

    /// Subscribe to a topic.
    pub fn subscribe(&self, topic: Topic) -> StoreResult<Subscription> {
        self.bus.subscribe(topic)
    }

    /// Subscribe to post visibility events.
    pub fn subscribe_posts(&self) -> StoreResult<Subscription> {
        self.subscribe(Topic::AllPosts)
    }

    /// Subscribe to comment events under `post`.
    ///
    /// The post does not have to exist; the topic simply stays silent.
    pub fn subscribe_comments(&self, post: PostId) -> StoreResult<Subscription> {
        self.subscribe(Topic::CommentsForPost(post))
    }
}
