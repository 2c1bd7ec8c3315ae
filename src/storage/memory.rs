//! In-memory storage backend.
//!
//! The three collections share one `RwLock`: queries take the read side and
//! may run concurrently, mutations take the write side for their whole
//! duration, which serializes them into a single queue.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::comment::Comment;
use crate::error::{StoreError, StoreResult};
use crate::post::Post;
use crate::user::User;

use super::Collection;

fn lock_err(context: &'static str) -> StoreError {
    StoreError::internal(format!("poisoned lock: {context}"))
}

/// The users, posts and comments collections.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    /// Users in creation order.
    pub users: Collection<User>,
    /// Posts in creation order.
    pub posts: Collection<Post>,
    /// Comments in creation order.
    pub comments: Collection<Comment>,
}

impl Tables {
    /// Create empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Thread-safe owner of the [`Tables`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap pre-populated tables.
    #[must_use]
    pub fn with_tables(tables: Tables) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Shared access for queries.
    pub fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| lock_err("tables.read"))
    }

    /// Exclusive access for a mutation and its cascades.
    pub fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| lock_err("tables.write"))
    }
}
