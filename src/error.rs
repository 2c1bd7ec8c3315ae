//! Error types for postql.
//!
//! All errors are strongly typed using thiserror so callers can match on the
//! failure kind and surface a readable message to their own callers.

use thiserror::Error;

use crate::record::EntityKind;

/// Errors returned by store mutations, queries and subscriptions.
///
/// `NotFound` and `Conflict` are raised during validation, before anything
/// in the store is touched, so a failed mutation never leaves a partial write
/// or a dispatched event behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A targeted or referenced record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Collection the lookup ran against.
        kind: EntityKind,
        /// Identifier that failed to resolve.
        id: String,
    },

    /// A uniqueness constraint would be violated.
    #[error("{field} already taken: {value}")]
    Conflict {
        /// The unique field.
        field: &'static str,
        /// The colliding value.
        value: String,
    },

    /// A subscription wait ran out of time.
    #[error("Operation timed out after {duration_ms}ms")]
    Timeout {
        /// The elapsed wait.
        duration_ms: u64,
    },

    /// The other end of a channel is gone.
    #[error("Disconnected: {path}")]
    Disconnected {
        /// Which channel closed.
        path: String,
    },

    /// Poisoned locks, serialization failures and other internal faults.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the fault.
        message: String,
    },
}

impl StoreError {
    /// Creates a not-found error for the given collection and id.
    #[must_use]
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Creates an email conflict error.
    #[must_use]
    pub fn email_taken(email: impl Into<String>) -> Self {
        Self::Conflict {
            field: "email",
            value: email.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a not-found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a uniqueness conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    /// Returns true if this error is retryable.
    ///
    /// Only a subscription timeout is: mutation failures are caused by the
    /// request relative to the current state and repeat on retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type alias for postql operations.
pub type StoreResult<T> = Result<T, StoreError>;
