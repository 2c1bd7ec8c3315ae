//! In-process storage for postql.
//!
//! `Collection` is a keyed, creation-ordered table; `Tables` groups the three
//! collections and `InMemoryStore` guards them behind a single lock so a
//! mutation and its cascades commit as one unit.

mod collection;
mod memory;

pub use collection::Collection;
pub use memory::{InMemoryStore, Tables};
