//! # postql - in-memory relational store with visibility-aware notifications
//!
//! postql keeps three linked collections (users, posts, comments) in
//! process memory, enforces referential integrity on every mutation, and
//! announces changes to subscribers in terms of what they can *see*: a post
//! flipping its published flag is reported as created or deleted even though
//! no row was inserted or removed.
//!
//! ## Core Concepts
//!
//! - **Integrity**: mutations validate references and uniqueness before
//!   writing; deletes cascade synchronously
//! - **Visibility transition**: the before/after published state of a post
//!   decides which event, if any, subscribers receive
//! - **Topic**: `AllPosts` or `CommentsForPost(id)`; each subscription is a
//!   live stream of events published after it attached
//!
//! ## Usage
//!
//! ```rust,ignore
//! use postql::{CreatePost, CreateUser, PostPatch, PostqlEngine};
//!
//! let engine = PostqlEngine::new();
//! let feed = engine.subscribe_posts()?;
//!
//! let author = engine.create_user(CreateUser::new("A", "a@x.com"))?;
//! let draft = engine.create_post(CreatePost::new("T", "B", false, author.id))?;
//! engine.update_post(draft.id, PostPatch::published(true))?; // CREATED
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Records
pub mod comment;
pub mod error;
pub mod patch;
pub mod post;
pub mod record;
pub mod user;

// Storage, integrity and notification flow
pub mod integrity;
pub mod notify;
pub mod storage;
pub mod visibility;

// Engine surface
pub mod config;
pub mod engine;
pub mod ir;
pub mod query;
pub mod seed;

// Re-export primary types at crate root for convenience
pub use comment::{Comment, CommentId, CommentPatch, CreateComment};
pub use config::EngineConfig;
pub use engine::{EngineResponse, PostqlEngine};
pub use error::{StoreError, StoreResult};
pub use ir::{DeletePayload, Operation, Request, UpdatePayload};
pub use notify::{
    CommentEvent, EventPayload, MutationKind, Notification, NotificationBus, PostEvent,
    Subscription, SubscriptionId, Topic,
};
pub use post::{CreatePost, Post, PostId, PostPatch};
pub use query::ReadView;
pub use record::{EntityKind, Record};
pub use storage::{Collection, InMemoryStore, Tables};
pub use user::{CreateUser, User, UserId, UserPatch};
pub use visibility::{Change, ChangeKind};
