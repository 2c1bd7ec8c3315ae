//! Shared record plumbing: collection kinds, typed identifiers and the
//! `Record` trait every stored type implements.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// The three collections held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Users.
    User,
    /// Posts.
    Post,
    /// Comments.
    Comment,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "User"),
            Self::Post => write!(f, "Post"),
            Self::Comment => write!(f, "Comment"),
        }
    }
}

/// A record that can live in a [`Collection`](crate::storage::Collection).
pub trait Record: Clone {
    /// Identifier type. Assigned once at creation, never changed or reused.
    type Id: Copy + Eq + Hash + fmt::Debug + fmt::Display;

    /// Which collection this record belongs to.
    const KIND: EntityKind;

    /// The record's identifier.
    fn id(&self) -> Self::Id;
}

/// Declares a UUID-backed identifier newtype.
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Wraps an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

pub(crate) use record_id;
