//! Mutation requests and payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::comment::{CommentId, CommentPatch, CreateComment};
use crate::post::{CreatePost, PostId, PostPatch};
use crate::user::{CreateUser, UserId, UserPatch};

/// Envelope around a single mutation.
///
/// `execute` refuses any `version` other than [`Request::CURRENT_VERSION`].
/// The `request_id` shows up in the engine's debug log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Protocol version (e.g., "1.0").
    pub version: String,

    /// Caller-chosen or random request identifier.
    pub request_id: Uuid,

    /// When this request was created.
    pub timestamp: DateTime<Utc>,

    /// The operation to execute.
    pub operation: Operation,
}

impl Request {
    /// Current protocol version.
    pub const CURRENT_VERSION: &'static str = "1.0";

    /// Creates a new request with the given operation.
    #[must_use]
    pub fn new(operation: Operation) -> Self {
        Self {
            version: Self::CURRENT_VERSION.to_string(),
            request_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            operation,
        }
    }

    /// Sets a custom request ID (useful for correlation).
    #[must_use]
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }
}

/// Payload for update operations: target id plus patch.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePayload<I, P> {
    pub id: I,
    pub data: P,
}

/// Payload for delete operations.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePayload<I> {
    pub id: I,
}

/// All supported mutations.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "payload", rename_all = "snake_case")]
pub enum Operation {
    CreateUser(CreateUser),
    UpdateUser(UpdatePayload<UserId, UserPatch>),
    DeleteUser(DeletePayload<UserId>),

    CreatePost(CreatePost),
    UpdatePost(UpdatePayload<PostId, PostPatch>),
    DeletePost(DeletePayload<PostId>),

    CreateComment(CreateComment),
    UpdateComment(UpdatePayload<CommentId, CommentPatch>),
    DeleteComment(DeletePayload<CommentId>),
}

impl Operation {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateUser(_) => "create_user",
            Self::UpdateUser(_) => "update_user",
            Self::DeleteUser(_) => "delete_user",
            Self::CreatePost(_) => "create_post",
            Self::UpdatePost(_) => "update_post",
            Self::DeletePost(_) => "delete_post",
            Self::CreateComment(_) => "create_comment",
            Self::UpdateComment(_) => "update_comment",
            Self::DeleteComment(_) => "delete_comment",
        }
    }
}
