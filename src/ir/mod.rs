//! Request representation for postql mutations.
//!
//! A [`Request`] carries one of the nine mutations as plain data, so callers
//! that receive mutations as JSON can hand them to
//! [`PostqlEngine::execute`](crate::engine::PostqlEngine::execute) without
//! matching on them first. Queries and subscriptions are not requests; they
//! go straight through the engine.

mod operations;
mod serialization;

pub use operations::{DeletePayload, Operation, Request, UpdatePayload};
pub use serialization::{from_json, to_json_pretty};
